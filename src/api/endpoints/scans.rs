//! Scan submission and listing.
//!
//! `POST /api/scans` is the full pipeline of one user action: score the
//! image, persist the record, then optionally fire the analysis
//! notification. Notification failures are logged and swallowed — they
//! never fail the save.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{validate_patient_fields, NotificationChannel, NotificationKind, ScanRecord};
use crate::notify;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScanRequest {
    pub patient_name: String,
    pub patient_age: i64,
    pub image_url: String,
    pub notes: Option<String>,
    /// Address to notify once the analysis is stored.
    pub notify_email: Option<String>,
    /// Whose notification preferences gate the send; defaults to the
    /// notify address itself.
    pub user_id: Option<String>,
}

#[derive(Deserialize)]
pub struct ScansQuery {
    pub limit: Option<u32>,
}

/// `POST /api/scans` — score, persist, then notify.
pub async fn submit(
    State(ctx): State<ApiContext>,
    Json(request): Json<SubmitScanRequest>,
) -> Result<(StatusCode, Json<ScanRecord>), ApiError> {
    validate_patient_fields(&request.patient_name, request.patient_age)
        .map_err(ApiError::BadRequest)?;

    let outcome = ctx.detector.detect(&request.image_url).await?;

    let scan = ScanRecord::new(
        request.patient_name,
        request.patient_age,
        request.image_url,
        outcome.result,
        outcome.confidence,
        request.notes,
    );

    {
        let conn = ctx.db()?;
        db::insert_scan(&conn, &scan)?;
    }
    tracing::info!(
        scan_id = %scan.id,
        result = scan.result.as_str(),
        "scan stored"
    );

    if let Some(to) = &request.notify_email {
        let user_id = request.user_id.as_deref().unwrap_or(to);
        notify_analysis_complete(&ctx, user_id, to, &scan);
    }

    Ok((StatusCode::CREATED, Json(scan)))
}

/// Fire-and-forget analysis notification. Gate failures and dispatch
/// failures are logged, never propagated.
fn notify_analysis_complete(ctx: &ApiContext, user_id: &str, to: &str, scan: &ScanRecord) {
    let gate = match ctx.db() {
        Ok(conn) => notify::should_notify(&conn, user_id, NotificationChannel::Email),
        Err(e) => {
            tracing::warn!(error = %e, "notification gate unavailable");
            return;
        }
    };

    match gate {
        Ok(false) => {
            tracing::debug!(user_id, "email notifications disabled, skipping");
        }
        Ok(true) => {
            let (subject, body) =
                notify::analysis_message(&scan.patient_name, scan.result, scan.confidence);
            if let Err(e) = notify::send_notification(
                ctx.mailer.as_ref(),
                to,
                &subject,
                &body,
                NotificationKind::Analysis,
            ) {
                tracing::warn!(error = %e, to, "analysis notification failed");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, user_id, "preference lookup failed, skipping notification");
        }
    }
}

/// `GET /api/scans` — recent scan records, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScansQuery>,
) -> Result<Json<Vec<ScanRecord>>, ApiError> {
    let limit = query.limit.map(|l| l.min(500));
    let conn = ctx.db()?;
    let scans = db::list_scans(&conn, limit)?;
    Ok(Json(scans))
}
