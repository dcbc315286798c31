// src/models/preferences.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// Represents the 'user_preferences' table in the database.
/// One row per user, upserted in place.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub user_id: i64,

    /// 'beginner', 'intermediate' or 'advanced'.
    pub preferred_difficulty: String,

    /// Categories the user wants quizzes and recommendations from.
    pub preferred_categories: Json<Vec<String>>,

    /// Daily study goal in minutes.
    pub daily_goal_minutes: i64,

    pub email_reminders: bool,

    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl UserPreferences {
    /// Defaults served when the user has never saved preferences.
    pub fn defaults(user_id: i64) -> Self {
        Self {
            user_id,
            preferred_difficulty: "beginner".to_string(),
            preferred_categories: Json(Vec::new()),
            daily_goal_minutes: 30,
            email_reminders: false,
            updated_at: None,
        }
    }
}

/// DTO for saving preferences.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePreferencesRequest {
    #[validate(custom(function = validate_difficulty))]
    pub preferred_difficulty: String,

    #[serde(default)]
    pub preferred_categories: Vec<String>,

    #[validate(range(min = 5, max = 600))]
    pub daily_goal_minutes: i64,

    #[serde(default)]
    pub email_reminders: bool,
}

fn validate_difficulty(value: &str) -> Result<(), validator::ValidationError> {
    match value {
        "beginner" | "intermediate" | "advanced" => Ok(()),
        _ => Err(validator::ValidationError::new("unknown_difficulty")),
    }
}
