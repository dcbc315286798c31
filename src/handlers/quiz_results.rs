// src/handlers/quiz_results.rs

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use sqlx::{SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    config::HISTORY_WINDOW,
    error::AppError,
    models::{
        quiz_result::{HistoryParams, QuizResult, SubmitQuizResultRequest},
        resource::LearningResource,
    },
    recommend,
    utils::jwt::Claims,
};

/// Exact message returned when the score invariant is violated.
const INVALID_SCORE_MESSAGE: &str =
    "Invalid score or totalQuestions: score must be between 0 and totalQuestions";

/// Submits a finished quiz.
///
/// Validates the payload, stores the immutable result row, then runs the
/// recommendation engine over the saved result, the user's recent history
/// and the resource catalog. A failure in the personalization path never
/// fails the request; the response degrades to a fixed fallback payload
/// flagged `personalized: false`.
pub async fn submit_quiz_result(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SubmitQuizResultRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.score < 0 || payload.total_questions < 0 || payload.score > payload.total_questions {
        return Err(AppError::BadRequest(INVALID_SCORE_MESSAGE.to_string()));
    }

    let user_id = claims.user_id();
    let taken_at = payload.date.unwrap_or_else(chrono::Utc::now);

    let saved = sqlx::query_as::<_, QuizResult>(
        r#"
        INSERT INTO quiz_results
            (user_id, category, difficulty, score, total_questions,
             time_spent_secs, taken_at, questions_answered, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, category, difficulty, score, total_questions,
                  time_spent_secs, taken_at, questions_answered, created_at
        "#,
    )
    .bind(user_id)
    .bind(&payload.category)
    .bind(&payload.difficulty)
    .bind(payload.score)
    .bind(payload.total_questions)
    .bind(payload.time_spent)
    .bind(taken_at)
    .bind(SqlJson(&payload.questions_answered))
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert quiz result: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    // Recent window including the result just saved.
    let history = fetch_history(&pool, user_id, HISTORY_WINDOW).await?;

    let catalog = sqlx::query_as::<_, LearningResource>(
        r#"
        SELECT id, title, type, difficulty, category, topic, tags, rating, url
        FROM learning_resources
        "#,
    )
    .fetch_all(&pool)
    .await?;

    let body = match recommend::build_recommendations(&saved, &history, catalog) {
        Ok(recommendations) => json!({
            "success": true,
            "personalized": true,
            "result": saved,
            "recommendations": recommendations,
        }),
        Err(e) => {
            tracing::warn!("Personalization failed, serving fallback: {}", e);
            let fallback = recommend::fallback(&saved.category);
            json!({
                "success": true,
                "personalized": false,
                "result": saved,
                "recommendations": fallback,
            })
        }
    };

    Ok((StatusCode::CREATED, Json(body)))
}

/// Lists the caller's quiz history, newest first.
pub async fn list_quiz_results(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<HistoryParams>,
) -> Result<impl IntoResponse, AppError> {
    let limit = params.limit.unwrap_or(20).clamp(1, 100);

    let results = fetch_history(&pool, claims.user_id(), limit).await?;

    Ok(Json(json!({ "success": true, "results": results })))
}

/// Retrieves a single quiz result owned by the caller.
/// Someone else's result is indistinguishable from a missing one.
pub async fn get_quiz_result(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let result = sqlx::query_as::<_, QuizResult>(
        r#"
        SELECT id, user_id, category, difficulty, score, total_questions,
               time_spent_secs, taken_at, questions_answered, created_at
        FROM quiz_results
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(id)
    .bind(claims.user_id())
    .fetch_optional(&pool)
    .await?
    .ok_or(AppError::NotFound("Quiz result not found".to_string()))?;

    Ok(Json(json!({ "success": true, "result": result })))
}

async fn fetch_history(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<QuizResult>, AppError> {
    let results = sqlx::query_as::<_, QuizResult>(
        r#"
        SELECT id, user_id, category, difficulty, score, total_questions,
               time_spent_secs, taken_at, questions_answered, created_at
        FROM quiz_results
        WHERE user_id = ?
        ORDER BY taken_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(results)
}
