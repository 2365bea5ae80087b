//! HTTP API handlers for survey-server

pub mod error;
pub mod health;
pub mod responses;

pub use error::ApiError;
pub use health::health_routes;
pub use responses::{export_csv, export_json, submit_response};
