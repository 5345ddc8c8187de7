use serde::{Deserialize, Serialize};

/// Per-user notification switches, persisted per user id.
///
/// Absent rows read as the default `{email: true, report: true}`, matching
/// the dashboard's behavior before the user ever opens settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreference {
    pub email_notifications: bool,
    pub report_notifications: bool,
}

impl Default for NotificationPreference {
    fn default() -> Self {
        Self {
            email_notifications: true,
            report_notifications: true,
        }
    }
}

/// Channel consulted by the notification gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationChannel {
    Email,
    Report,
}

impl NotificationPreference {
    /// Whether the given channel is enabled for this user.
    pub fn allows(&self, channel: NotificationChannel) -> bool {
        match channel {
            NotificationChannel::Email => self.email_notifications,
            NotificationChannel::Report => self.report_notifications,
        }
    }
}
