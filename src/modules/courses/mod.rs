pub mod models;
pub mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use catalog_kernel::{
    settings::{CourseSettings, ResponseMode},
    InitCtx, Module,
};
use serde_json::json;

use routes::CoursesState;
use store::CourseStore;

/// Course catalog served from process memory
pub struct CoursesModule {
    store: Arc<CourseStore>,
    mode: ResponseMode,
}

impl CoursesModule {
    pub fn new(settings: &CourseSettings) -> Self {
        Self {
            store: Arc::new(CourseStore::from_settings(settings)),
            mode: settings.response_mode,
        }
    }

    pub fn store(&self) -> &Arc<CourseStore> {
        &self.store
    }
}

#[async_trait]
impl Module for CoursesModule {
    fn name(&self) -> &'static str {
        "courses"
    }

    /// Served from the root: `/`, `/courses`, `/course/{id}`.
    fn mount_path(&self) -> String {
        String::new()
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let courses = self.store.len().await;
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            id_strategy = ?ctx.settings.courses.id_strategy,
            response_mode = ?self.mode,
            courses,
            "courses module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(CoursesState {
            store: self.store.clone(),
            mode: self.mode,
        })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let course_id = json!({
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "string" }
        });
        let course_body = json!({
            "required": true,
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/CourseInput" }
                }
            }
        });
        let course_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/Course" }
                    }
                }
            })
        };
        let error_response = |description: &str| {
            json!({
                "description": description,
                "content": {
                    "application/json": {
                        "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                    }
                }
            })
        };

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "Home page",
                        "tags": ["Courses"],
                        "responses": {
                            "200": {
                                "description": "HTML greeting",
                                "content": {
                                    "text/html": { "schema": { "type": "string" } }
                                }
                            }
                        }
                    }
                },
                "/courses": {
                    "get": {
                        "summary": "List courses",
                        "tags": ["Courses"],
                        "responses": {
                            "200": {
                                "description": "All courses in collection order",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Course" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/course": {
                    "post": {
                        "summary": "Create a course",
                        "tags": ["Courses"],
                        "requestBody": course_body.clone(),
                        "responses": {
                            "200": course_response("Created course with its assigned id"),
                            "400": error_response("Malformed payload"),
                            "409": error_response("No course id left to assign"),
                            "422": error_response("Missing course name")
                        }
                    }
                },
                "/course/{id}": {
                    "get": {
                        "summary": "Get a course",
                        "tags": ["Courses"],
                        "parameters": [course_id.clone()],
                        "responses": {
                            "200": course_response("The course"),
                            "404": error_response("No course with this id")
                        }
                    },
                    "put": {
                        "summary": "Replace a course",
                        "tags": ["Courses"],
                        "parameters": [course_id.clone()],
                        "requestBody": course_body,
                        "responses": {
                            "200": course_response("Replacement course, moved to the end of the list"),
                            "400": error_response("Malformed payload"),
                            "404": error_response("No course with this id")
                        }
                    },
                    "delete": {
                        "summary": "Delete a course",
                        "tags": ["Courses"],
                        "parameters": [course_id],
                        "responses": {
                            "200": {
                                "description": "Deleted",
                                "content": {
                                    "application/json": { "schema": { "type": "string" } }
                                }
                            },
                            "404": error_response("No course with this id")
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Author": {
                        "type": "object",
                        "properties": {
                            "fullname": { "type": "string" },
                            "website": { "type": "string" }
                        }
                    },
                    "Course": {
                        "type": "object",
                        "properties": {
                            "courseid": {
                                "type": "string",
                                "description": "Server-assigned identifier"
                            },
                            "coursename": { "type": "string" },
                            "price": { "type": "integer", "format": "int64" },
                            "author": {
                                "oneOf": [
                                    { "$ref": "#/components/schemas/Author" },
                                    { "type": "null" }
                                ]
                            }
                        },
                        "required": ["courseid", "coursename", "price", "author"]
                    },
                    "CourseInput": {
                        "type": "object",
                        "properties": {
                            "coursename": { "type": "string", "minLength": 1 },
                            "price": { "type": "integer", "format": "int64" },
                            "author": {
                                "oneOf": [
                                    { "$ref": "#/components/schemas/Author" },
                                    { "type": "null" }
                                ]
                            }
                        },
                        "required": ["coursename"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "courses module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        let discarded = self.store.len().await;
        tracing::info!(
            module = self.name(),
            discarded,
            "courses module stopped; in-memory courses discarded"
        );
        Ok(())
    }
}

/// Create a new instance of the courses module
pub fn create_module(settings: &CourseSettings) -> Arc<dyn Module> {
    Arc::new(CoursesModule::new(settings))
}
