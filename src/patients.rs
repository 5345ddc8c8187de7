//! Patient derivation — groups the scan log by `(name, age)`.
//!
//! Patients are never stored as rows; every read folds the full scan set
//! into per-patient summaries. Only the Active/Inactive status survives
//! outside the log, as an override table applied on top.

use std::collections::HashMap;

use crate::models::{Patient, PatientStatus, ScanRecord};

/// Fold scans into patients.
///
/// `scans` must be in chronological insertion order (the repository's
/// `list_scans_chronological`): when two scans share the exact same
/// `created_at`, the later-inserted one supplies `last_result`. The output
/// is sorted by most recent scan first.
pub fn derive_patients(
    scans: &[ScanRecord],
    status_overrides: &HashMap<(String, i64), PatientStatus>,
) -> Vec<Patient> {
    let mut by_key: HashMap<(String, i64), Patient> = HashMap::new();

    for scan in scans {
        let key = (scan.patient_name.clone(), scan.patient_age);
        match by_key.get_mut(&key) {
            Some(patient) => {
                patient.total_scans += 1;
                // >= so equal timestamps resolve to insertion order
                if scan.created_at >= patient.last_scan {
                    patient.last_scan = scan.created_at;
                    patient.last_result = scan.result;
                }
            }
            None => {
                let status = status_overrides
                    .get(&key)
                    .copied()
                    .unwrap_or(PatientStatus::Active);
                by_key.insert(
                    key,
                    Patient {
                        id: Patient::key(&scan.patient_name, scan.patient_age),
                        name: scan.patient_name.clone(),
                        age: scan.patient_age,
                        total_scans: 1,
                        last_scan: scan.created_at,
                        last_result: scan.result,
                        status,
                    },
                );
            }
        }
    }

    let mut patients: Vec<Patient> = by_key.into_values().collect();
    patients.sort_by(|a, b| b.last_scan.cmp(&a.last_scan).then(a.id.cmp(&b.id)));
    patients
}

/// Case-insensitive substring filter on the patient name.
pub fn search_patients(patients: Vec<Patient>, term: &str) -> Vec<Patient> {
    let needle = term.to_lowercase();
    patients
        .into_iter()
        .filter(|p| p.name.to_lowercase().contains(&needle))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Verdict;
    use chrono::{DateTime, NaiveDateTime, Utc};
    use uuid::Uuid;

    fn ts(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }

    fn scan(name: &str, age: i64, result: Verdict, created: &str) -> ScanRecord {
        ScanRecord {
            id: Uuid::new_v4(),
            patient_name: name.into(),
            patient_age: age,
            image_ref: "https://x/img.png".into(),
            result,
            confidence: 0.9,
            created_at: ts(created),
            notes: None,
        }
    }

    #[test]
    fn same_name_and_age_collapse_into_one_patient() {
        let scans = vec![
            scan("Ana", 60, Verdict::Negative, "2025-01-01 10:00:00"),
            scan("Ana", 60, Verdict::Positive, "2025-02-01 10:00:00"),
        ];
        let patients = derive_patients(&scans, &HashMap::new());
        assert_eq!(patients.len(), 1);
        assert_eq!(patients[0].total_scans, 2);
        assert_eq!(patients[0].last_result, Verdict::Positive);
        assert_eq!(patients[0].last_scan, ts("2025-02-01 10:00:00"));
    }

    #[test]
    fn same_name_different_age_stays_separate() {
        let scans = vec![
            scan("Ana", 60, Verdict::Negative, "2025-01-01 10:00:00"),
            scan("Ana", 61, Verdict::Negative, "2025-01-02 10:00:00"),
        ];
        let patients = derive_patients(&scans, &HashMap::new());
        assert_eq!(patients.len(), 2);
    }

    #[test]
    fn equal_timestamps_resolve_to_insertion_order() {
        let scans = vec![
            scan("Ana", 60, Verdict::Negative, "2025-01-01 10:00:00"),
            scan("Ana", 60, Verdict::Positive, "2025-01-01 10:00:00"),
        ];
        let patients = derive_patients(&scans, &HashMap::new());
        assert_eq!(patients[0].last_result, Verdict::Positive);
    }

    #[test]
    fn out_of_order_history_still_finds_latest() {
        // Chronological input is the contract, but a stale last_result must
        // not win even if an older scan appears later in the slice
        let scans = vec![
            scan("Ana", 60, Verdict::Positive, "2025-03-01 10:00:00"),
            scan("Ana", 60, Verdict::Negative, "2025-01-01 10:00:00"),
        ];
        let patients = derive_patients(&scans, &HashMap::new());
        assert_eq!(patients[0].last_result, Verdict::Positive);
    }

    #[test]
    fn status_override_applies() {
        let scans = vec![scan("Ana", 60, Verdict::Negative, "2025-01-01 10:00:00")];
        let mut overrides = HashMap::new();
        overrides.insert(("Ana".to_string(), 60), PatientStatus::Inactive);

        let patients = derive_patients(&scans, &overrides);
        assert_eq!(patients[0].status, PatientStatus::Inactive);

        let patients = derive_patients(&scans, &HashMap::new());
        assert_eq!(patients[0].status, PatientStatus::Active);
    }

    #[test]
    fn patients_sorted_by_most_recent_scan() {
        let scans = vec![
            scan("Old", 70, Verdict::Negative, "2025-01-01 10:00:00"),
            scan("New", 50, Verdict::Negative, "2025-03-01 10:00:00"),
        ];
        let patients = derive_patients(&scans, &HashMap::new());
        assert_eq!(patients[0].name, "New");
        assert_eq!(patients[1].name, "Old");
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let scans = vec![
            scan("Ana Flores", 60, Verdict::Negative, "2025-01-01 10:00:00"),
            scan("Ben Okafor", 50, Verdict::Negative, "2025-01-02 10:00:00"),
        ];
        let patients = derive_patients(&scans, &HashMap::new());
        let hits = search_patients(patients.clone(), "flor");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Ana Flores");
        assert!(search_patients(patients, "zzz").is_empty());
    }
}
