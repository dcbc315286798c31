// src/models/quiz_result.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use validator::Validate;

/// One answered question inside a quiz attempt.
/// Embedded as a JSON array in the 'quiz_results' row; no table of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnsweredQuestion {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    /// Topic tag used for weak/strong area extraction. Optional; untagged
    /// answers are skipped by the tally.
    #[serde(default)]
    pub topic: Option<String>,
}

/// Represents the 'quiz_results' table in the database.
/// Rows are immutable after insertion; history queries only ever read them.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizResult {
    pub id: i64,
    pub user_id: i64,

    pub category: String,
    pub difficulty: String,

    /// Number of correctly answered questions. Invariant checked on
    /// submission: 0 <= score <= total_questions.
    pub score: i64,
    pub total_questions: i64,

    /// Time spent on the quiz, in seconds.
    pub time_spent_secs: i64,

    /// When the quiz was taken (client-reported).
    pub taken_at: chrono::DateTime<chrono::Utc>,

    /// Ordered answer sheet, stored as a JSON array.
    pub questions_answered: Json<Vec<AnsweredQuestion>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl QuizResult {
    /// Percentage score in [0, 100] given the submission invariant holds.
    pub fn percentage(&self) -> f64 {
        if self.total_questions == 0 {
            return 0.0;
        }
        100.0 * self.score as f64 / self.total_questions as f64
    }
}

/// DTO for submitting a finished quiz.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitQuizResultRequest {
    #[validate(length(min = 1, max = 50))]
    pub category: String,

    #[validate(length(min = 1, max = 20))]
    pub difficulty: String,

    pub score: i64,
    pub total_questions: i64,

    /// Seconds spent; clients occasionally omit this for untimed quizzes.
    #[serde(default)]
    pub time_spent: i64,

    /// When the quiz was taken. Defaults to submission time when absent.
    #[serde(default)]
    pub date: Option<chrono::DateTime<chrono::Utc>>,

    #[serde(default)]
    pub questions_answered: Vec<AnsweredQuestion>,
}

/// Query parameters for listing quiz history.
#[derive(Debug, Deserialize)]
pub struct HistoryParams {
    /// Number of items to return (default: 20, max: 100).
    pub limit: Option<i64>,
}

/// Aggregated struct for displaying the leaderboard.
/// Represents a row joined from `users` and `quiz_results`.
#[derive(Debug, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub category: String,
    /// Best percentage score the user has achieved.
    pub best_percentage: f64,
    pub taken_at: chrono::DateTime<chrono::Utc>,
}
