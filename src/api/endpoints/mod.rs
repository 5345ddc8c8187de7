pub mod analytics;
pub mod detect;
pub mod health;
pub mod notifications;
pub mod patients;
pub mod scans;
pub mod settings;
