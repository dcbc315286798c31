// src/handlers/profile.rs

use axum::{Extension, Json, extract::State, response::IntoResponse};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::user::{ProfileResponse, User},
    utils::jwt::Claims,
};

/// Get current user's profile and quiz statistics.
pub async fn get_me(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("User not found".to_string()))?;

    let (quizzes_taken, average_percentage, best_percentage) =
        sqlx::query_as::<_, (i64, Option<f64>, Option<f64>)>(
            r#"
            SELECT
                COUNT(*),
                AVG(100.0 * score / total_questions),
                MAX(100.0 * score / total_questions)
            FROM quiz_results
            WHERE user_id = ? AND total_questions > 0
            "#,
        )
        .bind(user_id)
        .fetch_one(&pool)
        .await?;

    let favorite_category = sqlx::query_scalar::<_, String>(
        r#"
        SELECT category
        FROM quiz_results
        WHERE user_id = ?
        GROUP BY category
        ORDER BY COUNT(*) DESC, category
        LIMIT 1
        "#,
    )
    .bind(user_id)
    .fetch_optional(&pool)
    .await?;

    Ok(Json(json!({
        "success": true,
        "profile": ProfileResponse {
            id: user.id,
            username: user.username,
            role: user.role,
            created_at: user.created_at,
            quizzes_taken,
            average_percentage: average_percentage.unwrap_or(0.0),
            best_percentage: best_percentage.unwrap_or(0.0),
            favorite_category,
        }
    })))
}
