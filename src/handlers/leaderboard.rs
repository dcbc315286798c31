// src/handlers/leaderboard.rs

use axum::{Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{config::LEADERBOARD_SIZE, error::AppError, models::quiz_result::LeaderboardEntry};

/// Retrieves the top best percentage scores across all users.
/// One entry per user: their best result, with the category it came from.
pub async fn get_leaderboard(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let leaderboard = sqlx::query_as::<_, LeaderboardEntry>(
        r#"
        SELECT
            u.username,
            q.category,
            MAX(100.0 * q.score / q.total_questions) AS best_percentage,
            q.taken_at
        FROM quiz_results q
        JOIN users u ON q.user_id = u.id
        WHERE q.total_questions > 0
        GROUP BY q.user_id
        ORDER BY best_percentage DESC
        LIMIT ?
        "#,
    )
    .bind(LEADERBOARD_SIZE)
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to fetch leaderboard: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({ "success": true, "leaderboard": leaderboard })))
}
