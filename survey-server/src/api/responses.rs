//! Submission and export routes
//!
//! POST /api/responses      - store one survey response
//! GET  /api/responses.csv  - all responses as CSV
//! GET  /api/responses      - same CSV export
//! GET  /api/responses.json - all responses as label-keyed JSON objects

use axum::{
    body::Bytes,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use survey_common::normalize::sort_by_created_at;
use survey_common::schema::CREATED_AT;
use survey_common::value::submission_from_json;
use survey_common::{normalize, time, to_csv, to_labeled, FieldValue, NormalizedRecord, RawSubmission};
use tracing::{debug, info};

use super::error::{ApiError, MessageResponse};
use crate::AppState;

/// Parse a request body into a raw submission
///
/// Empty bodies, `null`, `{}` and non-object JSON all count as an empty
/// submission.
pub fn parse_submission(body: &[u8]) -> Result<RawSubmission, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(ApiError::EmptySubmission);
    }
    match serde_json::from_slice::<Value>(body).map_err(ApiError::InvalidJson)? {
        Value::Object(object) if !object.is_empty() => Ok(submission_from_json(object)),
        _ => Err(ApiError::EmptySubmission),
    }
}

/// POST /api/responses
///
/// Normalizes the submission with a server-side `created_at` (any
/// client-supplied value is overwritten) and stores it.
pub async fn submit_response(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let raw = parse_submission(&body)?;

    let mut extra = RawSubmission::new();
    extra.insert(
        CREATED_AT.to_string(),
        FieldValue::from(time::submission_timestamp()),
    );
    let record = normalize(&raw, &extra);

    state.store.insert(&record).await.map_err(ApiError::Save)?;
    info!("Response saved (created_at {})", record.created_at());

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Response saved.")),
    ))
}

/// All stored records, oldest first
async fn load_sorted(state: &AppState) -> Result<Vec<NormalizedRecord>, ApiError> {
    let mut records = state.store.list_all().await.map_err(ApiError::Load)?;
    sort_by_created_at(&mut records);
    debug!("Loaded {} responses for export", records.len());
    Ok(records)
}

/// GET /api/responses.csv and GET /api/responses
pub async fn export_csv(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = load_sorted(&state).await?;
    Ok((
        [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
        to_csv(&records),
    )
        .into_response())
}

/// GET /api/responses.json
pub async fn export_json(State(state): State<AppState>) -> Result<Response, ApiError> {
    let records = load_sorted(&state).await?;
    let labeled: Vec<_> = records.iter().map(to_labeled).collect();
    let body = serde_json::to_string(&labeled).map_err(|e| ApiError::Load(e.into()))?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}
