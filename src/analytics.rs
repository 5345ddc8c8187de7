//! Dashboard analytics — a pure read-side fold over the scan log.
//!
//! Nothing here is cached or incrementally maintained: every query
//! recomputes counts, the month-bucketed trend and the recent-activity
//! feed from the full record set, the same way the dashboard derived them
//! from its detections table.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::Serialize;

use crate::models::{ScanRecord, Verdict};

/// How many populated month buckets the trend keeps.
const TREND_MONTHS: usize = 6;

/// How many scans the recent-activity feed shows.
const RECENT_ACTIVITY_LIMIT: usize = 10;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsData {
    pub total_scans: u32,
    pub positive_cases: u32,
    pub negative_cases: u32,
    pub uncertain_cases: u32,
    pub success_rate: f64,
    pub monthly_trend: Vec<MonthlyBucket>,
    pub recent_activity: Vec<ActivityEntry>,
}

/// One calendar month with at least one scan.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyBucket {
    /// Display label, e.g. `"Jan 2025"`.
    pub month: String,
    pub scans: u32,
    pub positive: u32,
}

/// Recent-activity projection of one scan.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub patient: String,
    pub result: Verdict,
    /// Relative time, e.g. `"3 hours ago"`.
    pub time: String,
    /// Whole-percent confidence, e.g. `"87%"`.
    pub confidence: String,
}

/// Fold the scan log into the analytics payload.
///
/// `scans` must be ordered newest first (the repository's `list_scans`
/// order); the recent-activity feed is its head. `now` is injected so the
/// relative-time strings are testable.
pub fn aggregate(scans: &[ScanRecord], now: DateTime<Utc>) -> AnalyticsData {
    let total_scans = scans.len() as u32;
    let positive_cases = count_verdict(scans, Verdict::Positive);
    let negative_cases = count_verdict(scans, Verdict::Negative);
    let uncertain_cases = count_verdict(scans, Verdict::Uncertain);

    let success_rate = if total_scans > 0 {
        f64::from(negative_cases) / f64::from(total_scans) * 100.0
    } else {
        0.0
    };

    let recent_activity = scans
        .iter()
        .take(RECENT_ACTIVITY_LIMIT)
        .map(|scan| ActivityEntry {
            patient: scan.patient_name.clone(),
            result: scan.result,
            time: time_ago(scan.created_at, now),
            confidence: format!("{:.0}%", scan.confidence * 100.0),
        })
        .collect();

    AnalyticsData {
        total_scans,
        positive_cases,
        negative_cases,
        uncertain_cases,
        success_rate,
        monthly_trend: monthly_trend(scans),
        recent_activity,
    }
}

fn count_verdict(scans: &[ScanRecord], verdict: Verdict) -> u32 {
    scans.iter().filter(|s| s.result == verdict).count() as u32
}

/// Group scans by calendar month of `created_at`, ascending, keeping the
/// last 6 *populated* buckets — months without scans never appear, so this
/// is not a 6-calendar-month window.
pub fn monthly_trend(scans: &[ScanRecord]) -> Vec<MonthlyBucket> {
    let mut buckets: BTreeMap<(i32, u32), (u32, u32)> = BTreeMap::new();

    for scan in scans {
        let key = (scan.created_at.year(), scan.created_at.month());
        let entry = buckets.entry(key).or_insert((0, 0));
        entry.0 += 1;
        if scan.result == Verdict::Positive {
            entry.1 += 1;
        }
    }

    let mut trend: Vec<MonthlyBucket> = buckets
        .into_iter()
        .map(|((year, month), (scans, positive))| MonthlyBucket {
            month: month_label(year, month),
            scans,
            positive,
        })
        .collect();

    if trend.len() > TREND_MONTHS {
        trend.drain(..trend.len() - TREND_MONTHS);
    }
    trend
}

fn month_label(year: i32, month: u32) -> String {
    // First-of-month is always constructible for keys taken from real dates
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{year}-{month:02}"))
}

/// Relative-time formatting used by the recent-activity feed.
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let hours = (now - created_at).num_hours();

    if hours < 1 {
        return "Less than an hour ago".to_string();
    }
    if hours == 1 {
        return "1 hour ago".to_string();
    }
    if hours < 24 {
        return format!("{hours} hours ago");
    }

    let days = hours / 24;
    if days == 1 {
        return "1 day ago".to_string();
    }
    if days < 7 {
        return format!("{days} days ago");
    }

    // Older entries show a plain calendar date, US order like the dashboard
    created_at.format("%-m/%-d/%Y").to_string()
}
