//! Course catalog application
//!
//! An in-memory course catalog exposed over HTTP, built from the catalog
//! kernel, HTTP, and telemetry crates.

pub mod bootstrap;
pub mod modules;

/// Re-export commonly used types
pub use modules::courses::{
    models::{Author, Course, CourseInput},
    store::{CourseStore, StoreError},
};
