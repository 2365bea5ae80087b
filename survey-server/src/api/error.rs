//! API error responses
//!
//! Every failure is reported as `{"message": ...}`. Storage errors are
//! logged in full but only a generic message reaches the client.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Body of every JSON reply from the submission and export routes
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Body was empty, `null`, `{}` or not a JSON object
    #[error("submission is empty")]
    EmptySubmission,

    /// Body could not be parsed as JSON
    #[error("invalid JSON body: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// Store rejected the insert
    #[error("failed to save response: {0}")]
    Save(#[source] survey_common::Error),

    /// Store failed to list, or the export could not be rendered
    #[error("failed to load responses: {0}")]
    Load(#[source] survey_common::Error),
}

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::EmptySubmission => (StatusCode::BAD_REQUEST, "Submission is empty."),
            ApiError::InvalidJson(_) => (StatusCode::BAD_REQUEST, "Invalid JSON body."),
            ApiError::Save(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to save response."),
            ApiError::Load(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Failed to load responses."),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("{}", self);
        }
        (status, Json(MessageResponse::new(message))).into_response()
    }
}
