// src/models/resource.rs

use serde::{Deserialize, Serialize};
use sqlx::{prelude::FromRow, types::Json};
use url::Url;
use validator::Validate;

/// Represents the 'learning_resources' table in the database.
/// A static catalog seeded by migrations; the recommendation path only
/// ever reads it, admins may curate it.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LearningResource {
    pub id: i64,

    pub title: String,

    /// Resource kind: 'video', 'article' or 'practice'.
    /// Mapped from the database column 'type' since `type` is a reserved
    /// keyword in Rust.
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub resource_type: String,

    /// 'beginner', 'intermediate' or 'advanced'.
    pub difficulty: String,

    pub category: String,

    pub topic: String,

    /// Free-form tags, stored as a JSON array.
    pub tags: Json<Vec<String>>,

    /// Average user rating, 0.0 to 5.0.
    pub rating: f64,

    /// Link to the actual content.
    pub url: String,
}

/// A catalog entry paired with the relevance score the ranker gave it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredResource {
    #[serde(flatten)]
    pub resource: LearningResource,
    pub relevance_score: i64,
}

/// Query parameters for listing the resource catalog.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceListParams {
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
}

/// DTO for creating a catalog entry. Admin only.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateResourceRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 20))]
    #[serde(rename = "type")]
    pub resource_type: String,
    #[validate(length(min = 1, max = 20))]
    pub difficulty: String,
    #[validate(length(min = 1, max = 50))]
    pub category: String,
    #[validate(length(min = 1, max = 100))]
    pub topic: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(range(min = 0.0, max = 5.0))]
    #[serde(default)]
    pub rating: f64,
    #[validate(length(min = 1, max = 500), custom(function = validate_url_string))]
    pub url: String,
}

/// DTO for updating a catalog entry. Fields are optional. Admin only.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResourceRequest {
    pub title: Option<String>,
    pub difficulty: Option<String>,
    pub rating: Option<f64>,
    pub url: Option<String>,
}

/// Validates that a string is a correctly formatted URL.
fn validate_url_string(url: &str) -> Result<(), validator::ValidationError> {
    if Url::parse(url).is_err() {
        return Err(validator::ValidationError::new("invalid_url"));
    }
    Ok(())
}
