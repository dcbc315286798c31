// src/handlers/preferences.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::{SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    models::preferences::{UpdatePreferencesRequest, UserPreferences},
    utils::jwt::Claims,
};

/// Returns the caller's saved preferences, or the defaults if none exist.
pub async fn get_preferences(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let preferences = sqlx::query_as::<_, UserPreferences>(
        r#"
        SELECT user_id, preferred_difficulty, preferred_categories,
               daily_goal_minutes, email_reminders, updated_at
        FROM user_preferences
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .unwrap_or_else(|| UserPreferences::defaults(user_id));

    Ok(Json(json!({ "success": true, "preferences": preferences })))
}

/// Saves the caller's preferences. Upserts the single row per user.
pub async fn save_preferences(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let preferences = sqlx::query_as::<_, UserPreferences>(
        r#"
        INSERT INTO user_preferences
            (user_id, preferred_difficulty, preferred_categories,
             daily_goal_minutes, email_reminders, updated_at)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            preferred_difficulty = excluded.preferred_difficulty,
            preferred_categories = excluded.preferred_categories,
            daily_goal_minutes = excluded.daily_goal_minutes,
            email_reminders = excluded.email_reminders,
            updated_at = excluded.updated_at
        RETURNING user_id, preferred_difficulty, preferred_categories,
                  daily_goal_minutes, email_reminders, updated_at
        "#,
    )
    .bind(claims.user_id())
    .bind(&payload.preferred_difficulty)
    .bind(SqlJson(&payload.preferred_categories))
    .bind(payload.daily_goal_minutes)
    .bind(payload.email_reminders)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to save preferences: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({ "success": true, "preferences": preferences })))
}
