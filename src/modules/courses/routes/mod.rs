//! HTTP handlers for the courses module.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use catalog_http::error::AppError;
use catalog_kernel::settings::ResponseMode;
use serde_json::json;

use super::models::CourseInput;
use super::store::{CourseStore, StoreError};

pub const HOME_PAGE: &str = "<h1>This is home page of course backend api</h1>";
pub const NOT_FOUND_MESSAGE: &str = "No Course found with given id";
pub const EMPTY_BODY_MESSAGE: &str = "Please send some data";
pub const DELETED_MESSAGE: &str = "Deleted Successfully";

#[derive(Clone)]
pub struct CoursesState {
    pub store: Arc<CourseStore>,
    pub mode: ResponseMode,
}

pub fn router(state: CoursesState) -> Router {
    Router::new()
        .route("/", get(serve_home))
        .route("/courses", get(list_courses))
        .route("/course", post(create_course))
        .route(
            "/course/{id}",
            get(get_course).put(update_course).delete(delete_course),
        )
        .with_state(state)
}

async fn serve_home() -> Html<&'static str> {
    Html(HOME_PAGE)
}

async fn list_courses(State(state): State<CoursesState>) -> Response {
    let courses = state.store.list().await;
    tracing::info!(count = courses.len(), "list courses");
    Json(courses).into_response()
}

async fn get_course(
    State(state): State<CoursesState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    tracing::info!(course_id = %id, "get one course");

    match state.store.get(&id).await {
        Some(course) => Ok(Json(course).into_response()),
        None => missing(state.mode, || Json(NOT_FOUND_MESSAGE).into_response()),
    }
}

async fn create_course(
    State(state): State<CoursesState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let input = decode_input(&body, state.mode)?;

    match state.store.create(input).await {
        Ok(course) => {
            tracing::info!(course_id = %course.id, name = %course.name, "created course");
            Ok(Json(course).into_response())
        }
        Err(StoreError::EmptyName) => match state.mode {
            ResponseMode::Strict => Err(AppError::validation(
                vec![json!({"field": "coursename", "error": "required"})],
                EMPTY_BODY_MESSAGE,
            )),
            ResponseMode::Legacy => Ok(Json(EMPTY_BODY_MESSAGE).into_response()),
        },
        Err(err @ StoreError::IdSpaceExhausted { .. }) => {
            tracing::warn!(error = %err, "cannot assign a course id");
            Err(AppError::conflict(
                vec![json!({"field": "courseid", "error": "exhausted"})],
                err.to_string(),
            ))
        }
    }
}

async fn update_course(
    State(state): State<CoursesState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let input = decode_input(&body, state.mode)?;

    match state.store.update(&id, input).await {
        Some(course) => {
            tracing::info!(course_id = %id, "updated course");
            Ok(Json(course).into_response())
        }
        None => missing(state.mode, empty_json),
    }
}

async fn delete_course(
    State(state): State<CoursesState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    if state.store.delete(&id).await {
        tracing::info!(course_id = %id, "deleted course");
        Ok(Json(DELETED_MESSAGE).into_response())
    } else {
        missing(state.mode, empty_json)
    }
}

/// Decode a course payload.
///
/// In strict mode a malformed body is rejected outright and an empty body is
/// a validation failure. In legacy mode any decode failure, including a single
/// mistyped field, yields a zero-valued input: create then reports missing
/// data and update stores the zero-valued record.
fn decode_input(body: &[u8], mode: ResponseMode) -> Result<CourseInput, AppError> {
    match (serde_json::from_slice::<CourseInput>(body), mode) {
        (Ok(input), _) => Ok(input),
        (Err(err), ResponseMode::Legacy) => {
            tracing::debug!(error = %err, "ignoring undecodable course payload");
            Ok(CourseInput::default())
        }
        (Err(_), ResponseMode::Strict) if body.iter().all(u8::is_ascii_whitespace) => Err(
            AppError::validation(vec![json!({"field": "body", "error": "required"})], EMPTY_BODY_MESSAGE),
        ),
        (Err(err), ResponseMode::Strict) => Err(AppError::bad_request(format!(
            "invalid course payload: {err}"
        ))),
    }
}

/// Report an unknown course id according to the response mode.
fn missing(mode: ResponseMode, legacy: impl FnOnce() -> Response) -> Result<Response, AppError> {
    tracing::info!("no course found with given id");
    match mode {
        ResponseMode::Strict => Err(AppError::not_found(NOT_FOUND_MESSAGE)),
        ResponseMode::Legacy => Ok(legacy()),
    }
}

fn empty_json() -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
    )
        .into_response()
}
