use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Application-level constants
pub const APP_NAME: &str = "VisionAid";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,visionaid=debug".to_string()
}

/// Get the application data directory
/// ~/VisionAid/ on all platforms (user-visible, matches the desktop app)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("VisionAid")
}

/// Path of the scan database. Override with VISIONAID_DB_PATH.
pub fn db_path() -> PathBuf {
    std::env::var("VISIONAID_DB_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| app_data_dir().join("scans.db"))
}

/// Listen address for the HTTP server. Override with VISIONAID_BIND.
pub fn bind_addr() -> SocketAddr {
    std::env::var("VISIONAID_BIND")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8787)))
}

/// Overall bound on one detection call (image probe + both model passes).
/// On expiry the caller gets a retryable timeout error instead of a hang.
pub fn detect_timeout() -> Duration {
    let secs = std::env::var("VISIONAID_DETECT_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(30);
    Duration::from_secs(secs)
}

/// Extra per-model delay emulating real inference cost. Defaults to zero;
/// set VISIONAID_SIMULATE_LATENCY_MS to restore the original 1500/2000ms feel.
pub fn simulated_latency() -> Duration {
    let ms = std::env::var("VISIONAID_SIMULATE_LATENCY_MS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0);
    Duration::from_millis(ms)
}
