//! Shared state for the API layer.

use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::detection::Detector;
use crate::notify::Mailer;

/// Shared context for all API routes: the scan database behind a mutex
/// (writes are single-row and cheap), the detection pipeline, and the
/// mailer collaborator.
#[derive(Clone)]
pub struct ApiContext {
    db: Arc<Mutex<Connection>>,
    pub detector: Detector,
    pub mailer: Arc<dyn Mailer>,
}

impl ApiContext {
    pub fn new(conn: Connection, detector: Detector, mailer: Arc<dyn Mailer>) -> Self {
        Self {
            db: Arc::new(Mutex::new(conn)),
            detector,
            mailer,
        }
    }

    /// Lock the database connection for one repository call.
    pub fn db(&self) -> Result<MutexGuard<'_, Connection>, ApiError> {
        self.db
            .lock()
            .map_err(|_| ApiError::Internal("database lock poisoned".into()))
    }
}
