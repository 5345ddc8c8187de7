use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{PatientStatus, Verdict};

/// Patient view derived from the scan log — never stored as its own row.
///
/// Keyed by `(name, age)`; everything except `status` is recomputed from
/// the full scan set on each read. `status` is a UI-managed overlay kept in
/// a small override table and defaults to Active.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    /// Stable synthetic key, `"{name}-{age}"` like the dashboard uses.
    pub id: String,
    pub name: String,
    pub age: i64,
    pub total_scans: u32,
    pub last_scan: DateTime<Utc>,
    pub last_result: Verdict,
    pub status: PatientStatus,
}

impl Patient {
    pub fn key(name: &str, age: i64) -> String {
        format!("{name}-{age}")
    }
}
