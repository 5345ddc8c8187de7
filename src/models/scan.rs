use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Verdict;

/// One persisted detection: a submitted image reference plus its verdict.
///
/// Records are append-only — nothing updates a scan after insert, which is
/// what lets the read side re-derive patients and analytics from scratch on
/// every query. `result` and `confidence` are pure functions of `image_ref`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanRecord {
    pub id: Uuid,
    pub patient_name: String,
    pub patient_age: i64,
    pub image_ref: String,
    pub result: Verdict,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl ScanRecord {
    /// Create a new scan record stamped with the current time.
    pub fn new(
        patient_name: String,
        patient_age: i64,
        image_ref: String,
        result: Verdict,
        confidence: f64,
        notes: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            patient_name,
            patient_age,
            image_ref,
            result,
            confidence,
            created_at: Utc::now(),
            notes,
        }
    }
}

/// Bounds accepted for a patient age at scan submission.
pub const MIN_PATIENT_AGE: i64 = 1;
pub const MAX_PATIENT_AGE: i64 = 120;

/// Validate the patient fields of a scan submission.
pub fn validate_patient_fields(name: &str, age: i64) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Patient name is required".to_string());
    }
    if !(MIN_PATIENT_AGE..=MAX_PATIENT_AGE).contains(&age) {
        return Err(format!(
            "Patient age must be between {MIN_PATIENT_AGE} and {MAX_PATIENT_AGE}"
        ));
    }
    Ok(())
}
