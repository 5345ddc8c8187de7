//! Detection endpoint — scores an image reference without persisting.
//!
//! `POST /api/detect` mirrors the original edge function: validate the
//! URL, probe it upstream, run the two-model ensemble and return the
//! verdict with processing time. Saving a scan is a separate operation
//! (`POST /api/scans`).

use std::time::Instant;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::detection::MODEL_LABEL;
use crate::models::Verdict;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectRequest {
    pub image_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectResponse {
    pub result: Verdict,
    pub confidence: f64,
    pub message: String,
    pub model_used: &'static str,
    /// Wall time of the analysis in milliseconds.
    pub processing_time: u64,
}

/// `POST /api/detect` — run the ensemble on one image reference.
pub async fn detect(
    State(ctx): State<ApiContext>,
    Json(request): Json<DetectRequest>,
) -> Result<Json<DetectResponse>, ApiError> {
    let image_url = request
        .image_url
        .ok_or_else(|| ApiError::BadRequest("Image URL is required".into()))?;

    let started = Instant::now();
    let outcome = ctx.detector.detect(&image_url).await?;
    let processing_time = started.elapsed().as_millis() as u64;

    tracing::info!(
        result = outcome.result.as_str(),
        confidence = outcome.confidence,
        processing_time,
        "detection complete"
    );

    Ok(Json(DetectResponse {
        result: outcome.result,
        confidence: outcome.confidence,
        message: outcome.message,
        model_used: MODEL_LABEL,
        processing_time,
    }))
}
