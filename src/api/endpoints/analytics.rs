//! Analytics endpoint.
//!
//! `GET /api/analytics` — counts, success rate, monthly trend and recent
//! activity, recomputed from the full scan log on every call.

use axum::extract::State;
use axum::Json;
use chrono::Utc;

use crate::analytics::{aggregate, AnalyticsData};
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;

/// `GET /api/analytics` — dashboard statistics.
pub async fn dashboard(State(ctx): State<ApiContext>) -> Result<Json<AnalyticsData>, ApiError> {
    let scans = {
        let conn = ctx.db()?;
        db::list_scans(&conn, None)?
    };
    Ok(Json(aggregate(&scans, Utc::now())))
}
