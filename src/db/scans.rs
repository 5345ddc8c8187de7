//! Scan log repository — append-only rows in the `scans` table.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use uuid::Uuid;

use super::DatabaseError;
use crate::models::{ScanRecord, Verdict};

const SCAN_COLUMNS: &str =
    "id, patient_name, patient_age, image_ref, result, confidence, created_at, notes";

pub fn insert_scan(conn: &Connection, scan: &ScanRecord) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO scans (id, patient_name, patient_age, image_ref, result, confidence, created_at, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            scan.id.to_string(),
            scan.patient_name,
            scan.patient_age,
            scan.image_ref,
            scan.result.as_str(),
            scan.confidence,
            scan.created_at,
            scan.notes,
        ],
    )?;
    Ok(())
}

/// Newest scans first. Equal timestamps fall back to insertion order
/// (higher rowid first), so ordering stays total.
pub fn list_scans(conn: &Connection, limit: Option<u32>) -> Result<Vec<ScanRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {SCAN_COLUMNS} FROM scans
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let limit = limit.map(i64::from).unwrap_or(-1);
    let scans = collect_scans(stmt.query_map(params![limit], scan_row)?);
    scans
}

/// Oldest first, insertion order breaking timestamp ties. The patient
/// derivation folds over this so that a later-inserted scan wins when two
/// share the exact same `created_at`.
pub fn list_scans_chronological(conn: &Connection) -> Result<Vec<ScanRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {SCAN_COLUMNS} FROM scans
         ORDER BY created_at ASC, rowid ASC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let scans = collect_scans(stmt.query_map([], scan_row)?);
    scans
}

/// Scan history of one patient, newest first.
pub fn patient_history(
    conn: &Connection,
    name: &str,
    age: i64,
) -> Result<Vec<ScanRecord>, DatabaseError> {
    let sql = format!(
        "SELECT {SCAN_COLUMNS} FROM scans
         WHERE patient_name = ?1 AND patient_age = ?2
         ORDER BY created_at DESC, rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let scans = collect_scans(stmt.query_map(params![name, age], scan_row)?);
    scans
}

pub fn count_scans(conn: &Connection) -> Result<i64, DatabaseError> {
    let count = conn.query_row("SELECT COUNT(*) FROM scans", [], |row| row.get(0))?;
    Ok(count)
}

// Internal row type for scan mapping — enum parsing happens after the
// rusqlite closure so DatabaseError stays out of rusqlite::Result.
struct ScanRow {
    id: String,
    patient_name: String,
    patient_age: i64,
    image_ref: String,
    result: String,
    confidence: f64,
    created_at: DateTime<Utc>,
    notes: Option<String>,
}

fn scan_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ScanRow> {
    Ok(ScanRow {
        id: row.get(0)?,
        patient_name: row.get(1)?,
        patient_age: row.get(2)?,
        image_ref: row.get(3)?,
        result: row.get(4)?,
        confidence: row.get(5)?,
        created_at: row.get(6)?,
        notes: row.get(7)?,
    })
}

fn scan_from_row(row: ScanRow) -> Result<ScanRecord, DatabaseError> {
    Ok(ScanRecord {
        id: Uuid::parse_str(&row.id).map_err(|_| DatabaseError::InvalidEnum {
            field: "id".into(),
            value: row.id,
        })?,
        patient_name: row.patient_name,
        patient_age: row.patient_age,
        image_ref: row.image_ref,
        result: Verdict::from_str(&row.result)?,
        confidence: row.confidence,
        created_at: row.created_at,
        notes: row.notes,
    })
}

fn collect_scans(
    rows: impl Iterator<Item = rusqlite::Result<ScanRow>>,
) -> Result<Vec<ScanRecord>, DatabaseError> {
    rows.map(|r| scan_from_row(r?)).collect()
}
