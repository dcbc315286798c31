// src/handlers/resources.rs

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::resource::{LearningResource, ResourceListParams},
};

/// Lists the learning resource catalog, optionally filtered by category
/// and resource type. Best-rated entries first.
pub async fn list_resources(
    State(pool): State<SqlitePool>,
    Query(params): Query<ResourceListParams>,
) -> Result<impl IntoResponse, AppError> {
    let resources = sqlx::query_as::<_, LearningResource>(
        r#"
        SELECT id, title, type, difficulty, category, topic, tags, rating, url
        FROM learning_resources
        WHERE (? IS NULL OR category = ?)
          AND (? IS NULL OR type = ?)
        ORDER BY rating DESC, id
        "#,
    )
    .bind(&params.category)
    .bind(&params.category)
    .bind(&params.resource_type)
    .bind(&params.resource_type)
    .fetch_all(&pool)
    .await?;

    Ok(Json(json!({ "success": true, "resources": resources })))
}
