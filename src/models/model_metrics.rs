// src/models/model_metrics.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// Per-category aggregate computed during training.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAverage {
    pub category: String,
    pub average_percentage: f64,
    pub samples: i64,
}

/// Represents the 'model_metrics' table in the database.
///
/// Append-only, versioned record of the prediction model's aggregates.
/// Every retrain inserts a new row with `version = max + 1` inside a
/// transaction; readers always take the highest version. Concurrent retrains
/// therefore serialize on the database instead of racing on shared memory.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelMetrics {
    pub id: i64,
    pub version: i64,
    pub trained_at: chrono::DateTime<chrono::Utc>,

    /// Number of quiz results the aggregates were computed from.
    pub sample_count: i64,

    /// Mean percentage score across all results.
    pub overall_average: f64,

    pub category_averages: Json<Vec<CategoryAverage>>,
}

impl ModelMetrics {
    /// Looks up the trained average for a category, if the category was
    /// present in the training set.
    pub fn category_average(&self, category: &str) -> Option<&CategoryAverage> {
        self.category_averages
            .iter()
            .find(|c| c.category.eq_ignore_ascii_case(category))
    }
}

/// DTO for requesting a prediction.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub category: String,
}

/// Predicted outcome for a user's next quiz in a category.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub category: String,
    pub predicted_percentage: f64,
    pub predicted_level: String,
    pub suggested_difficulty: String,
    /// 0.0 to 1.0, grows with the amount of personal history available.
    pub confidence: f64,
    pub model_version: i64,
}
