//! Notification gating, message templates and the mailer seam.
//!
//! Delivery is a stub by contract: `Mailer::send(to, subject, html)` is the
//! whole collaborator surface, and the shipped implementation only logs the
//! dispatch. Gate decisions come from the persisted per-user preferences
//! (default: everything enabled). Notification failures are always logged
//! and swallowed by callers — they must never fail a scan save.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rusqlite::Connection;
use thiserror::Error;

use crate::config;
use crate::db::{self, DatabaseError};
use crate::models::{NotificationChannel, NotificationKind, Verdict};

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Missing required fields: to, subject, message")]
    MissingFields,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Preference lookup failed: {0}")]
    Preferences(#[from] DatabaseError),

    #[error("Dispatch failed: {0}")]
    Dispatch(String),
}

/// Outbound mail collaborator. Swap this for a real provider integration;
/// nothing else in the crate knows how delivery works.
pub trait Mailer: Send + Sync {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotifyError>;
}

/// Default mailer: logs the dispatch instead of delivering.
#[derive(Debug, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    fn send(&self, to: &str, subject: &str, html_body: &str) -> Result<(), NotifyError> {
        tracing::info!(
            to,
            subject,
            body_bytes = html_body.len(),
            "email notification dispatched (log-only mailer)"
        );
        Ok(())
    }
}

/// Whether an outbound message on `channel` should be sent for `user_id`,
/// from stored preferences. Users without a stored row default to yes.
pub fn should_notify(
    conn: &Connection,
    user_id: &str,
    channel: NotificationChannel,
) -> Result<bool, DatabaseError> {
    let prefs = db::get_preferences(conn, user_id)?;
    Ok(prefs.allows(channel))
}

/// Standard email-shape check (`local@domain.tld`, no whitespace).
pub fn is_valid_email(address: &str) -> bool {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    let re = EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    });
    re.is_match(address)
}

/// Validate, render and dispatch one notification.
pub fn send_notification(
    mailer: &dyn Mailer,
    to: &str,
    subject: &str,
    message: &str,
    kind: NotificationKind,
) -> Result<(), NotifyError> {
    if to.is_empty() || subject.is_empty() || message.is_empty() {
        return Err(NotifyError::MissingFields);
    }
    if !is_valid_email(to) {
        return Err(NotifyError::InvalidEmail);
    }

    let html = render_email_html(subject, message);
    mailer.send(to, subject, &html)?;
    tracing::debug!(to, kind = kind.as_str(), "notification sent");
    Ok(())
}

/// Subject and body for the analysis-complete notification.
pub fn analysis_message(patient_name: &str, result: Verdict, confidence: f64) -> (String, String) {
    let subject = format!("Cataract Analysis Complete - {patient_name}");

    let result_line = match result {
        Verdict::Positive => "Cataract Detected",
        Verdict::Negative => "No Cataract Detected",
        Verdict::Uncertain => "Uncertain",
    };
    let recommendation = match result {
        Verdict::Positive => {
            "Immediate consultation with an ophthalmologist is recommended for further \
             evaluation and treatment planning."
        }
        Verdict::Negative => {
            "The eye appears healthy. Continue with routine eye care and regular examinations."
        }
        Verdict::Uncertain => {
            "Uncertain results detected. Consider retaking the scan or professional evaluation."
        }
    };

    let body = format!(
        "Dear Healthcare Professional,\n\n\
         The cataract detection analysis for patient {patient_name} has been completed.\n\n\
         Analysis Results:\n\
         - Result: {result_line}\n\
         - Confidence: {:.1}%\n\n\
         {recommendation}\n\n\
         Please log into {app} to view the complete analysis report.\n\n\
         Best regards,\n\
         {app} Team\n\n\
         ---\n\
         This is an automated notification from {app} Cataract Detection System.",
        confidence * 100.0,
        app = config::APP_NAME,
    );

    (subject, body)
}

/// Subject and body for the report-ready notification.
pub fn report_message(
    report_title: &str,
    report_type: &str,
    generated_at: DateTime<Utc>,
) -> (String, String) {
    let subject = format!("Report Generated - {report_title}");
    let body = format!(
        "Dear Healthcare Professional,\n\n\
         Your requested report has been generated and is ready for download.\n\n\
         Report Details:\n\
         - Title: {report_title}\n\
         - Type: {report_type}\n\
         - Generated: {}\n\n\
         Please log into {app} to download your report.\n\n\
         Best regards,\n\
         {app} Team\n\n\
         ---\n\
         This is an automated notification from {app} Cataract Detection System.",
        generated_at.format("%-m/%-d/%Y"),
        app = config::APP_NAME,
    );
    (subject, body)
}

/// Wrap a plain-text message in the branded HTML shell: header banner,
/// message block, call-to-action link, footer.
pub fn render_email_html(subject: &str, message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{subject}</title>
  <style>
    body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px; }}
    .header {{ background: linear-gradient(135deg, #3b82f6, #8b5cf6); color: white; padding: 20px; border-radius: 8px 8px 0 0; text-align: center; }}
    .content {{ background: #f9fafb; padding: 30px; border-radius: 0 0 8px 8px; border: 1px solid #e5e7eb; }}
    .footer {{ text-align: center; margin-top: 20px; padding: 20px; color: #6b7280; font-size: 12px; }}
    .logo {{ font-size: 24px; font-weight: bold; margin-bottom: 10px; }}
    .message {{ white-space: pre-line; margin: 20px 0; }}
    .button {{ display: inline-block; background: #3b82f6; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; margin: 20px 0; }}
  </style>
</head>
<body>
  <div class="header">
    <div class="logo">👁️ VisionAid</div>
    <div>AI-Powered Cataract Detection</div>
  </div>
  <div class="content">
    <h2>{subject}</h2>
    <div class="message">{message}</div>
    <a href="https://visionaid.app" class="button">Open VisionAid</a>
  </div>
  <div class="footer">
    <p>This email was sent by VisionAid Cataract Detection System.</p>
    <p>If you no longer wish to receive these notifications, please update your settings in the application.</p>
  </div>
</body>
</html>"#
    )
}
