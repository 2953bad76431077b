//! API Documentation module
//!
//! Provides OpenAPI specification generation for the public API using utoipa.

mod openapi;

pub use openapi::ApiDoc;
