// src/handlers/study_plans.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::{SqlitePool, types::Json as SqlJson};

use crate::{
    config::HISTORY_WINDOW,
    error::AppError,
    models::{
        quiz_result::{AnsweredQuestion, QuizResult},
        study_plan::{CreateStudyPlanRequest, StudyPlan},
    },
    recommend::{
        performance::{LearnerType, PerformanceLevel},
        study_plan::build_study_plan,
        topics,
    },
    utils::jwt::Claims,
};

/// Lists the caller's stored study plans, newest first.
pub async fn list_study_plans(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let plans = sqlx::query_as::<_, StudyPlan>(
        r#"
        SELECT id, user_id, learner_type, category, weeks, created_at
        FROM study_plans
        WHERE user_id = ?
        ORDER BY id DESC
        "#,
    )
    .bind(claims.user_id())
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "success": true, "studyPlans": plans })))
}

/// Builds and stores a study plan from the caller's recent quiz history.
///
/// The performance level comes from the mean percentage over the recent
/// window; weak areas are tallied across every answer sheet in it. The
/// category defaults to the most recent result's.
pub async fn create_study_plan(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateStudyPlanRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = claims.user_id();

    let history = sqlx::query_as::<_, QuizResult>(
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
    .bind(HISTORY_WINDOW)
    .fetch_all(&pool)
    .await?;

    if history.is_empty() {
        return Err(AppError::BadRequest(
            "No quiz history to build a study plan from".to_string(),
        ));
    }

    let category = payload
        .category
        .unwrap_or_else(|| history[0].category.clone());

    let average_percentage =
        history.iter().map(|r| r.percentage()).sum::<f64>() / history.len() as f64;
    let level = PerformanceLevel::from_percentage(average_percentage);
    let learner_type = LearnerType::from(level);

    let all_answers: Vec<AnsweredQuestion> = history
        .iter()
        .flat_map(|r| r.questions_answered.iter().cloned())
        .collect();
    let (weak_areas, _) = topics::weak_and_strong_areas(&all_answers);

    let weeks = build_study_plan(&category, level, &weak_areas, average_percentage);

    let plan = sqlx::query_as::<_, StudyPlan>(
        r#"
        INSERT INTO study_plans (user_id, learner_type, category, weeks, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, user_id, learner_type, category, weeks, created_at
        "#,
    )
    .bind(user_id)
    .bind(learner_type.as_str())
    .bind(&category)
    .bind(SqlJson(&weeks))
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert study plan: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "studyPlan": plan })),
    ))
}
