// src/models/study_plan.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};

/// The content of a single study week: what to focus on, which goals to
/// chase, which resources and quiz topics to work through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekPlan {
    pub focus: String,
    pub goals: Vec<String>,
    pub resources: Vec<String>,
    pub quiz_topics: Vec<String>,
}

/// A week in a study plan.
///
/// Supplementary weeks are extra weak-area drills appended after the regular
/// schedule; they carry no week number. The tag makes the distinction
/// explicit on the wire instead of encoding it in a sentinel week index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StudyWeek {
    Regular {
        week: u32,
        #[serde(flatten)]
        plan: WeekPlan,
    },
    Supplementary {
        #[serde(flatten)]
        plan: WeekPlan,
    },
}

impl StudyWeek {
    pub fn plan(&self) -> &WeekPlan {
        match self {
            StudyWeek::Regular { plan, .. } => plan,
            StudyWeek::Supplementary { plan } => plan,
        }
    }

    pub fn is_supplementary(&self) -> bool {
        matches!(self, StudyWeek::Supplementary { .. })
    }
}

/// Represents the 'study_plans' table in the database.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    pub id: i64,
    pub user_id: i64,

    /// Pacing classification the plan was built for ('slow', 'inBetween',
    /// 'fast').
    pub learner_type: String,

    pub category: String,

    /// The weekly schedule, stored as a JSON array.
    pub weeks: Json<Vec<StudyWeek>>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// DTO for requesting a new study plan.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudyPlanRequest {
    /// Restrict the plan to this category. Defaults to the category of the
    /// caller's most recent quiz result.
    #[serde(default)]
    pub category: Option<String>,
}
