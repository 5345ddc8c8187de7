//! Patient views derived from the scan log.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::{Patient, PatientStatus, ScanRecord};
use crate::patients::{derive_patients, search_patients};

#[derive(Deserialize)]
pub struct PatientsQuery {
    /// Optional case-insensitive name filter.
    pub q: Option<String>,
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub name: String,
    pub age: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateRequest {
    pub patient_name: String,
    pub patient_age: i64,
    pub status: PatientStatus,
}

/// `GET /api/patients` — derived patient list, most recently scanned first.
pub async fn list(
    State(ctx): State<ApiContext>,
    Query(query): Query<PatientsQuery>,
) -> Result<Json<Vec<Patient>>, ApiError> {
    let (scans, overrides) = {
        let conn = ctx.db()?;
        (
            db::list_scans_chronological(&conn)?,
            db::load_status_overrides(&conn)?,
        )
    };

    let mut patients = derive_patients(&scans, &overrides);
    if let Some(term) = query.q.as_deref().filter(|t| !t.trim().is_empty()) {
        patients = search_patients(patients, term.trim());
    }
    Ok(Json(patients))
}

/// `GET /api/patients/history?name=&age=` — one patient's scans, newest first.
pub async fn history(
    State(ctx): State<ApiContext>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<ScanRecord>>, ApiError> {
    let conn = ctx.db()?;
    let scans = db::patient_history(&conn, &query.name, query.age)?;
    Ok(Json(scans))
}

/// `PUT /api/patients/status` — store the Active/Inactive overlay.
pub async fn set_status(
    State(ctx): State<ApiContext>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.db()?;
    db::set_patient_status(
        &conn,
        &request.patient_name,
        request.patient_age,
        request.status,
    )?;
    Ok(StatusCode::NO_CONTENT)
}
