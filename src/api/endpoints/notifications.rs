//! Outbound notification endpoint.
//!
//! `POST /api/notify` — validates the request, renders the branded HTML
//! shell and hands the message to the mailer. Delivery itself is a stub
//! collaborator (log-only by default).

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::NotificationKind;
use crate::notify;

#[derive(Deserialize)]
pub struct NotifyRequest {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<NotificationKind>,
}

#[derive(Serialize)]
pub struct NotifyResponse {
    pub success: bool,
    pub message: &'static str,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
}

/// `POST /api/notify` — send one email notification.
pub async fn send(
    State(ctx): State<ApiContext>,
    Json(request): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>, ApiError> {
    let to = request.to.unwrap_or_default();
    let subject = request.subject.unwrap_or_default();
    let message = request.message.unwrap_or_default();
    let kind = request.kind.unwrap_or(NotificationKind::General);

    notify::send_notification(ctx.mailer.as_ref(), &to, &subject, &message, kind)?;

    Ok(Json(NotifyResponse {
        success: true,
        message: "Notification sent successfully",
        kind,
    }))
}
