//! # wingman-api
//!
//! HTTP server for the Wingman video analysis pipeline: dual-mode
//! authentication, request validation, pipeline orchestration, and the
//! JSON surface the frontend consumes.

pub mod auth;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod validate;

pub use error::ApiError;
pub use pipeline::{Pipeline, PipelineState};
pub use routes::{router, AppState};
