use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use catalog_app::bootstrap;
use catalog_kernel::settings::{IdStrategy, ResponseMode, Settings};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let body = match body {
        Some(value) => Body::from(value.to_string()),
        None => Body::empty(),
    };
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body)
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

fn json_of(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes).unwrap()
}

fn course_ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|course| course["courseid"].as_str().unwrap().to_string())
        .collect()
}

async fn create_then_delete(router: &Router) {
    let (status, body) = call(
        router,
        "POST",
        "/course",
        Some(json!({"coursename": "Go Basics", "price": 99})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let created = json_of(&body);
    let new_id = created["courseid"].as_str().unwrap().to_string();
    let numeric: u32 = new_id.parse().unwrap();
    assert!(numeric < 100);
    assert_eq!(created["coursename"], "Go Basics");
    assert_eq!(created["price"], 99);

    let (_, body) = call(router, "GET", "/courses", None).await;
    assert_eq!(course_ids(&json_of(&body)).len(), 3);

    let (status, body) = call(router, "DELETE", "/course/2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!("Deleted Successfully"));

    let (_, body) = call(router, "GET", "/courses", None).await;
    assert_eq!(course_ids(&json_of(&body)), vec!["1".to_string(), new_id]);
}

#[tokio::test]
async fn seeded_catalog_create_and_delete_scenario() {
    let router = bootstrap::router(&Settings::default());
    create_then_delete(&router).await;
}

#[tokio::test]
async fn scenario_holds_with_random_ids() {
    let mut settings = Settings::default();
    settings.courses.id_strategy = IdStrategy::Random;
    let router = bootstrap::router(&settings);
    create_then_delete(&router).await;
}

#[tokio::test]
async fn updated_course_moves_to_the_end() {
    let router = bootstrap::router(&Settings::default());

    let (status, body) = call(
        &router,
        "PUT",
        "/course/1",
        Some(json!({"courseid": "77", "coursename": "DSA in C++", "price": 249})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body)["courseid"], "1");

    let (_, body) = call(&router, "GET", "/courses", None).await;
    let list = json_of(&body);
    assert_eq!(course_ids(&list), vec!["2", "1"]);
    assert_eq!(list[1]["coursename"], "DSA in C++");
}

#[tokio::test]
async fn legacy_mode_returns_message_payloads() {
    let mut settings = Settings::default();
    settings.courses.response_mode = ResponseMode::Legacy;
    let router = bootstrap::router(&settings);

    let (status, body) = call(&router, "GET", "/course/55", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!("No Course found with given id"));

    let (status, body) = call(&router, "POST", "/course", Some(json!({"price": 10}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json_of(&body), json!("Please send some data"));

    let (status, body) = call(&router, "DELETE", "/course/55", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());

    let (_, body) = call(&router, "GET", "/courses", None).await;
    assert_eq!(course_ids(&json_of(&body)), vec!["1", "2"]);
}

#[tokio::test]
async fn framework_routes_are_mounted_alongside_courses() {
    let router = bootstrap::router(&Settings::default());

    let (status, body) = call(&router, "GET", "/healthz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");

    let (status, body) = call(&router, "GET", "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    let spec = json_of(&body);
    assert!(spec["paths"].get("/course/{id}").is_some());
    assert!(spec["paths"].get("/courses").is_some());

    let (status, body) = call(&router, "GET", "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"<h1>This is home page of course backend api</h1>");
}
