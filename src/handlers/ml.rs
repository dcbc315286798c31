// src/handlers/ml.rs
//
// The "prediction model" is a set of per-category score aggregates, stored
// as an append-only versioned record. Training recomputes the aggregates
// from every stored quiz result inside a transaction; predictions blend the
// caller's recent average with the trained category average.

use std::collections::HashMap;

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use sqlx::{SqlitePool, prelude::FromRow, types::Json as SqlJson};

use crate::{
    config::HISTORY_WINDOW,
    error::AppError,
    models::model_metrics::{CategoryAverage, ModelMetrics, PredictionRequest, PredictionResponse},
    recommend::performance::PerformanceLevel,
    utils::jwt::Claims,
};

/// Pseudo-count weight given to the trained category average when blending
/// it with a user's personal history.
const GLOBAL_PRIOR_WEIGHT: f64 = 2.0;

#[derive(FromRow)]
struct ScoreSample {
    category: String,
    score: i64,
    total_questions: i64,
}

/// Returns the latest trained model metrics.
pub async fn get_metrics(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let metrics = latest_metrics(&pool)
        .await?
        .ok_or(AppError::NotFound("Model has not been trained yet".to_string()))?;

    Ok(Json(json!({ "success": true, "metrics": metrics })))
}

/// Retrains the model: recomputes per-category aggregates over all quiz
/// results and appends them as the next metrics version.
///
/// The whole read-compute-insert runs in one transaction, so concurrent
/// retrains serialize on the database and each produces a distinct version.
pub async fn train(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, AppError> {
    let mut tx = pool.begin().await?;

    let samples = sqlx::query_as::<_, ScoreSample>(
        r#"
        SELECT category, score, total_questions
        FROM quiz_results
        WHERE total_questions > 0
        "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    let (overall_average, category_averages) = aggregate(&samples);

    let next_version: i64 =
        sqlx::query_scalar::<_, i64>("SELECT COALESCE(MAX(version), 0) + 1 FROM model_metrics")
            .fetch_one(&mut *tx)
            .await?;

    let metrics = sqlx::query_as::<_, ModelMetrics>(
        r#"
        INSERT INTO model_metrics
            (version, trained_at, sample_count, overall_average, category_averages)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, version, trained_at, sample_count, overall_average, category_averages
        "#,
    )
    .bind(next_version)
    .bind(chrono::Utc::now())
    .bind(samples.len() as i64)
    .bind(overall_average)
    .bind(SqlJson(&category_averages))
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(
        "Model retrained by user {}: version {} over {} samples",
        claims.user_id(),
        metrics.version,
        metrics.sample_count
    );

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "metrics": metrics }))))
}

/// Predicts the caller's next percentage score in a category.
pub async fn predict(
    State(pool): State<SqlitePool>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PredictionRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.category.trim().is_empty() {
        return Err(AppError::BadRequest("category must not be empty".to_string()));
    }

    let metrics = latest_metrics(&pool)
        .await?
        .ok_or(AppError::NotFound("Model has not been trained yet".to_string()))?;

    let personal = sqlx::query_as::<_, ScoreSample>(
        r#"
        SELECT category, score, total_questions
        FROM quiz_results
        WHERE user_id = ? AND category = ? AND total_questions > 0
        ORDER BY taken_at DESC, id DESC
        LIMIT ?
        "#,
    )
    .bind(claims.user_id())
    .bind(&payload.category)
    .bind(HISTORY_WINDOW)
    .fetch_all(&pool)
    .await?;

    let global_average = metrics
        .category_average(&payload.category)
        .map(|c| c.average_percentage)
        .unwrap_or(metrics.overall_average);

    let personal_percentages: Vec<f64> = personal.iter().map(|s| percentage(s)).collect();
    let (predicted_percentage, confidence) = blend_prediction(&personal_percentages, global_average);

    let predicted_level = PerformanceLevel::from_percentage(predicted_percentage);

    Ok(Json(json!({
        "success": true,
        "prediction": PredictionResponse {
            category: payload.category,
            predicted_percentage,
            predicted_level: predicted_level.as_str().to_string(),
            suggested_difficulty: predicted_level.difficulty_affinity().to_string(),
            confidence,
            model_version: metrics.version,
        }
    })))
}

async fn latest_metrics(pool: &SqlitePool) -> Result<Option<ModelMetrics>, AppError> {
    let metrics = sqlx::query_as::<_, ModelMetrics>(
        r#"
        SELECT id, version, trained_at, sample_count, overall_average, category_averages
        FROM model_metrics
        ORDER BY version DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(pool)
    .await?;

    Ok(metrics)
}

fn percentage(sample: &ScoreSample) -> f64 {
    100.0 * sample.score as f64 / sample.total_questions as f64
}

/// Computes the overall and per-category mean percentages of the training
/// set. Category order follows first occurrence in the input, keeping the
/// stored record deterministic.
fn aggregate(samples: &[ScoreSample]) -> (f64, Vec<CategoryAverage>) {
    if samples.is_empty() {
        return (0.0, Vec::new());
    }

    let overall = samples.iter().map(percentage).sum::<f64>() / samples.len() as f64;

    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (f64, i64)> = HashMap::new();
    for sample in samples {
        let entry = sums.entry(sample.category.clone()).or_insert_with(|| {
            order.push(sample.category.clone());
            (0.0, 0)
        });
        entry.0 += percentage(sample);
        entry.1 += 1;
    }

    let categories = order
        .into_iter()
        .map(|category| {
            let (sum, samples) = sums[&category];
            CategoryAverage {
                category,
                average_percentage: sum / samples as f64,
                samples,
            }
        })
        .collect();

    (overall, categories)
}

/// Blends the user's recent percentages with the trained category average.
///
/// The global average acts as a prior worth `GLOBAL_PRIOR_WEIGHT` samples,
/// so users with little history are pulled towards it. Confidence grows
/// with the amount of personal history, capped at 1.0.
fn blend_prediction(personal: &[f64], global_average: f64) -> (f64, f64) {
    let n = personal.len() as f64;
    if personal.is_empty() {
        return (global_average, 0.2);
    }

    let personal_average = personal.iter().sum::<f64>() / n;
    let predicted =
        (personal_average * n + global_average * GLOBAL_PRIOR_WEIGHT) / (n + GLOBAL_PRIOR_WEIGHT);
    let confidence = (n / HISTORY_WINDOW as f64).min(1.0);

    (predicted, confidence)
}
