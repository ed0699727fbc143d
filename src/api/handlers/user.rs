use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::UpdateUserRequest;
use crate::api::dtos::responses::StatusResponse;
use crate::api::extractors::auth::{AdminUser, ApprovedUser};
use crate::domain::models::auth::UserProfile;
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
) -> Result<impl IntoResponse, AppError> {
    let users = state.user_repo.list().await?;
    let profiles: Vec<UserProfile> = users.into_iter().map(UserProfile::from).collect();

    Ok(Json(profiles))
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if id != claims.sub && !claims.is_admin() {
        return Err(AppError::Forbidden("Cannot view another user".into()));
    }

    let user = state
        .user_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(UserProfile::from(user)))
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    if id != claims.sub && !claims.is_admin() {
        return Err(AppError::Forbidden("Cannot update another user".into()));
    }

    let mut user = state
        .user_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    if let Some(username) = payload.username {
        if username.trim().is_empty() {
            return Err(AppError::Validation("Username cannot be empty".into()));
        }
        if username != user.username {
            if state.user_repo.find_by_username(&username).await?.is_some() {
                return Err(AppError::Conflict("Username already taken".into()));
            }
            user.username = username;
        }
    }
    if let Some(password) = payload.password {
        // Empty password on an update means "keep the current one".
        if !password.is_empty() {
            user.password_hash =
                bcrypt::hash(&password, bcrypt::DEFAULT_COST).map_err(|_| AppError::Internal)?;
        }
    }
    if let Some(first_name) = payload.first_name {
        user.first_name = first_name;
    }
    if let Some(last_name) = payload.last_name {
        user.last_name = last_name;
    }
    if let Some(date_of_birth) = payload.date_of_birth {
        user.date_of_birth = date_of_birth;
    }

    let updated = state.user_repo.update(&user).await?;

    info!("User updated: {}", updated.id);

    Ok(Json(UserProfile::from(updated)))
}

pub async fn approve_user(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.user_repo.approve(&id).await?;

    info!("User approved: {}", id);

    Ok(Json(StatusResponse {
        status: "approved".to_string(),
    }))
}

pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    AdminUser(claims): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    if id == claims.sub {
        return Err(AppError::Conflict("Cannot delete yourself".into()));
    }

    state.user_repo.delete(&id).await?;

    info!("User deleted: {}", id);

    Ok(Json(StatusResponse {
        status: "deleted".to_string(),
    }))
}
