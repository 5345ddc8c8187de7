pub mod analytics; // Read-side fold over the scan log
pub mod api; // HTTP API router + server
pub mod config;
pub mod db;
pub mod detection; // Hash → simulated models → ensemble → verdict
pub mod models;
pub mod notify; // Preference gate + templates + mailer seam
pub mod patients; // (name, age) grouping of the scan log
