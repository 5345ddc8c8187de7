//! Notification preference settings.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db;
use crate::models::NotificationPreference;

/// `GET /api/settings/notifications/:user_id` — stored preferences, or the
/// defaults when the user has never saved any.
pub async fn get(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<NotificationPreference>, ApiError> {
    let conn = ctx.db()?;
    let prefs = db::get_preferences(&conn, &user_id)?;
    Ok(Json(prefs))
}

/// `PUT /api/settings/notifications/:user_id` — upsert preferences.
pub async fn put(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
    Json(prefs): Json<NotificationPreference>,
) -> Result<StatusCode, ApiError> {
    let conn = ctx.db()?;
    db::set_preferences(&conn, &user_id, &prefs)?;
    tracing::debug!(user_id, "notification preferences updated");
    Ok(StatusCode::NO_CONTENT)
}
