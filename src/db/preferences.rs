//! Settings stores: per-user notification switches and the per-patient
//! Active/Inactive overlay.
//!
//! The dashboard originally kept notification settings in browser-local
//! storage; here they live in an explicit keyed table so the gate can be
//! consulted server-side.

use std::collections::HashMap;
use std::str::FromStr;

use rusqlite::{params, Connection};

use super::DatabaseError;
use crate::models::{NotificationPreference, PatientStatus};

/// Read a user's notification preferences, defaulting to `{true, true}`
/// when no row exists.
pub fn get_preferences(
    conn: &Connection,
    user_id: &str,
) -> Result<NotificationPreference, DatabaseError> {
    let result = conn.query_row(
        "SELECT email_notifications, report_notifications
         FROM notification_preferences WHERE user_id = ?1",
        params![user_id],
        |row| {
            Ok(NotificationPreference {
                email_notifications: row.get::<_, i64>(0)? != 0,
                report_notifications: row.get::<_, i64>(1)? != 0,
            })
        },
    );

    match result {
        Ok(prefs) => Ok(prefs),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(NotificationPreference::default()),
        Err(e) => Err(e.into()),
    }
}

/// Upsert a user's notification preferences.
pub fn set_preferences(
    conn: &Connection,
    user_id: &str,
    prefs: &NotificationPreference,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO notification_preferences (user_id, email_notifications, report_notifications)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id) DO UPDATE SET
             email_notifications = excluded.email_notifications,
             report_notifications = excluded.report_notifications",
        params![
            user_id,
            prefs.email_notifications as i64,
            prefs.report_notifications as i64,
        ],
    )?;
    Ok(())
}

/// Upsert the status overlay for one derived patient.
pub fn set_patient_status(
    conn: &Connection,
    name: &str,
    age: i64,
    status: PatientStatus,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patient_status (patient_name, patient_age, status)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(patient_name, patient_age) DO UPDATE SET
             status = excluded.status",
        params![name, age, status.as_str()],
    )?;
    Ok(())
}

/// All stored status overrides, keyed by `(name, age)`. Patients without a
/// row are Active.
pub fn load_status_overrides(
    conn: &Connection,
) -> Result<HashMap<(String, i64), PatientStatus>, DatabaseError> {
    let mut stmt =
        conn.prepare("SELECT patient_name, patient_age, status FROM patient_status")?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
        ))
    })?;

    let mut map = HashMap::new();
    for row in rows {
        let (name, age, status) = row?;
        map.insert((name, age), PatientStatus::from_str(&status)?);
    }
    Ok(map)
}
