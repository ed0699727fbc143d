use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{CreateChemicalRequest, UpdateChemicalRequest};
use crate::api::dtos::responses::StatusResponse;
use crate::api::extractors::auth::{AdminUser, ApprovedUser};
use crate::domain::models::chemical::{Chemical, NewChemicalParams};
use crate::error::AppError;
use crate::state::AppState;

pub async fn list_chemicals(
    State(state): State<Arc<AppState>>,
    ApprovedUser(_claims): ApprovedUser,
) -> Result<impl IntoResponse, AppError> {
    let chemicals = state.chemical_repo.list().await?;
    Ok(Json(chemicals))
}

pub async fn list_chemicals_by_category(
    State(state): State<Arc<AppState>>,
    ApprovedUser(_claims): ApprovedUser,
    Path(category): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let chemicals = state.chemical_repo.list_by_category(&category).await?;
    Ok(Json(chemicals))
}

pub async fn get_chemical(
    State(state): State<Arc<AppState>>,
    ApprovedUser(_claims): ApprovedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let chemical = state
        .chemical_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chemical not found".into()))?;

    Ok(Json(chemical))
}

pub async fn create_chemical(
    State(state): State<Arc<AppState>>,
    AdminUser(claims): AdminUser,
    Json(payload): Json<CreateChemicalRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.chemical_name.trim().is_empty() || payload.brand.trim().is_empty() {
        return Err(AppError::Validation(
            "brand and chemical_name are required".into(),
        ));
    }

    let chemical = Chemical::new(NewChemicalParams {
        category: payload.category,
        brand: payload.brand,
        chemical_name: payload.chemical_name,
        epa_registration: payload.epa_registration,
        recipe: payload.recipe,
        unit: payload.unit,
    });

    let created = state.chemical_repo.create(&chemical).await?;

    info!("Chemical created: {} by {}", created.id, claims.sub);

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update_chemical(
    State(state): State<Arc<AppState>>,
    AdminUser(claims): AdminUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateChemicalRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut chemical = state
        .chemical_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Chemical not found".into()))?;

    if let Some(v) = payload.category {
        chemical.category = v;
    }
    if let Some(v) = payload.brand {
        chemical.brand = v;
    }
    if let Some(v) = payload.chemical_name {
        chemical.chemical_name = v;
    }
    if let Some(v) = payload.epa_registration {
        chemical.epa_registration = v;
    }
    if let Some(v) = payload.recipe {
        chemical.recipe = v;
    }
    if let Some(v) = payload.unit {
        chemical.unit = v;
    }

    let updated = state.chemical_repo.update(&chemical).await?;

    info!("Chemical updated: {} by {}", updated.id, claims.sub);

    Ok(Json(updated))
}

pub async fn delete_chemical(
    State(state): State<Arc<AppState>>,
    AdminUser(claims): AdminUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.chemical_repo.delete(&id).await?;

    info!("Chemical deleted: {} by {}", id, claims.sub);

    Ok(Json(StatusResponse {
        status: "deleted".to_string(),
    }))
}
