// src/handlers/admin.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use sqlx::{SqlitePool, types::Json as SqlJson};
use validator::Validate;

use crate::{
    error::AppError,
    models::{
        resource::{CreateResourceRequest, LearningResource, UpdateResourceRequest},
        user::User,
    },
    utils::hash::hash_password,
};

/// Lists all users in the system.
/// Admin only.
pub async fn list_users(State(pool): State<SqlitePool>) -> Result<impl IntoResponse, AppError> {
    let users = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, password, role, created_at
        FROM users
        ORDER BY id DESC
        "#,
    )
    .fetch_all(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to list users: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok(Json(json!({ "success": true, "users": users })))
}

/// DTO for Admin creating a user (can specify role).
#[derive(Debug, Deserialize, Validate)]
pub struct AdminCreateUserRequest {
    #[validate(length(
        min = 3,
        max = 50,
        message = "Username length must be between 3 and 50 characters."
    ))]
    pub username: String,
    #[validate(length(
        min = 4,
        max = 128,
        message = "Password length must be between 4 and 128 characters."
    ))]
    pub password: String,
    pub role: String, // 'user' or 'admin'
}

/// Creates a new user with specific role.
/// Admin only.
pub async fn create_user(
    State(pool): State<SqlitePool>,
    Json(payload): Json<AdminCreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    if payload.role != "user" && payload.role != "admin" {
        return Err(AppError::BadRequest("Role must be 'user' or 'admin'".to_string()));
    }

    let hashed_password = hash_password(&payload.password)?;

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (username, password, role, created_at)
        VALUES (?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&payload.username)
    .bind(&hashed_password)
    .bind(&payload.role)
    .bind(chrono::Utc::now())
    .fetch_one(&pool)
    .await
    .map_err(|e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(format!("Username '{}' already exists", payload.username))
        }
        _ => {
            tracing::error!("Failed to create user: {:?}", e);
            AppError::InternalServerError(e.to_string())
        }
    })?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": id }))))
}

/// DTO for updating a user. Fields are optional.
#[derive(Debug, Deserialize)]
pub struct AdminUpdateUserRequest {
    pub username: Option<String>,
    pub role: Option<String>,
    pub password: Option<String>,
}

/// Updates user information.
/// Admin only.
pub async fn update_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_exists(&pool, "users", id, "User not found").await?;

    // Perform updates sequentially if fields are present
    if let Some(new_username) = payload.username {
        sqlx::query("UPDATE users SET username = ? WHERE id = ?")
            .bind(new_username)
            .bind(id)
            .execute(&pool)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    }

    if let Some(new_role) = payload.role {
        if new_role != "user" && new_role != "admin" {
            return Err(AppError::BadRequest("Role must be 'user' or 'admin'".to_string()));
        }
        sqlx::query("UPDATE users SET role = ? WHERE id = ?")
            .bind(new_role)
            .bind(id)
            .execute(&pool)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    }

    if let Some(new_password) = payload.password {
        let hashed = hash_password(&new_password)?;
        sqlx::query("UPDATE users SET password = ? WHERE id = ?")
            .bind(hashed)
            .bind(id)
            .execute(&pool)
            .await
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
    }

    Ok(Json(json!({ "success": true })))
}

/// Deletes a user and their dependent rows.
/// Admin only.
pub async fn delete_user(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let affected = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(AppError::NotFound("User not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}

/// Adds a learning resource to the catalog.
/// Admin only.
pub async fn create_resource(
    State(pool): State<SqlitePool>,
    Json(payload): Json<CreateResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let resource = sqlx::query_as::<_, LearningResource>(
        r#"
        INSERT INTO learning_resources
            (title, type, difficulty, category, topic, tags, rating, url)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id, title, type, difficulty, category, topic, tags, rating, url
        "#,
    )
    .bind(&payload.title)
    .bind(&payload.resource_type)
    .bind(&payload.difficulty)
    .bind(&payload.category)
    .bind(&payload.topic)
    .bind(SqlJson(&payload.tags))
    .bind(payload.rating)
    .bind(&payload.url)
    .fetch_one(&pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to create resource: {:?}", e);
        AppError::InternalServerError(e.to_string())
    })?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "resource": resource })),
    ))
}

/// Updates a catalog entry.
/// Admin only.
pub async fn update_resource(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateResourceRequest>,
) -> Result<impl IntoResponse, AppError> {
    ensure_exists(&pool, "learning_resources", id, "Resource not found").await?;

    if let Some(title) = payload.title {
        sqlx::query("UPDATE learning_resources SET title = ? WHERE id = ?")
            .bind(title)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(difficulty) = payload.difficulty {
        sqlx::query("UPDATE learning_resources SET difficulty = ? WHERE id = ?")
            .bind(difficulty)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(rating) = payload.rating {
        sqlx::query("UPDATE learning_resources SET rating = ? WHERE id = ?")
            .bind(rating)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    if let Some(url) = payload.url {
        sqlx::query("UPDATE learning_resources SET url = ? WHERE id = ?")
            .bind(url)
            .bind(id)
            .execute(&pool)
            .await?;
    }

    Ok(Json(json!({ "success": true })))
}

/// Removes a catalog entry.
/// Admin only.
pub async fn delete_resource(
    State(pool): State<SqlitePool>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let affected = sqlx::query("DELETE FROM learning_resources WHERE id = ?")
        .bind(id)
        .execute(&pool)
        .await?
        .rows_affected();

    if affected == 0 {
        return Err(AppError::NotFound("Resource not found".to_string()));
    }

    Ok(Json(json!({ "success": true })))
}

async fn ensure_exists(
    pool: &SqlitePool,
    table: &str,
    id: i64,
    not_found: &str,
) -> Result<(), AppError> {
    // Table names come from call sites above, never from user input.
    let query = format!("SELECT id FROM {} WHERE id = ?", table);
    sqlx::query_scalar::<_, i64>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::NotFound(not_found.to_string()))?;

    Ok(())
}
