use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tracing::info;

use crate::api::dtos::requests::{
    CreateLawnFormRequest, CreatePesticideFormRequest, CreateShrubFormRequest, FormListQuery,
    PestAppRequest, UpdateFormRequest,
};
use crate::api::dtos::responses::{FormCreatedResponse, FormListResponse, StatusResponse};
use crate::api::extractors::auth::{AdminUser, ApprovedUser};
use crate::domain::models::auth::Claims;
use crate::domain::models::form::{
    Form, FormDetails, FormListOptions, LawnDetails, NewFormParams, NewPestAppParams, PestApp,
    PesticideDetails, ShrubDetails,
};
use crate::error::AppError;
use crate::state::AppState;

/// Admins see every form; everyone else is scoped to their own rows.
fn owner_scope(claims: &Claims) -> Option<&str> {
    if claims.is_admin() {
        None
    } else {
        Some(&claims.sub)
    }
}

fn parse_date_bound(raw: &str, end_of_day: bool) -> Result<DateTime<Utc>, AppError> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid date: {}", raw)))?;
    let time = if end_of_day {
        date.and_hms_opt(23, 59, 59)
    } else {
        date.and_hms_opt(0, 0, 0)
    };
    // and_hms_opt only fails for out-of-range components, which these are not
    time.map(|t| t.and_utc())
        .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", raw)))
}

fn list_options(query: FormListQuery) -> Result<FormListOptions, AppError> {
    let date_low = query
        .date_low
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| parse_date_bound(s, false))
        .transpose()?;
    let date_high = query
        .date_high
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(|s| parse_date_bound(s, true))
        .transpose()?;

    let jewish_holiday = match query.jewish_holiday.as_deref() {
        Some("yes") => Some(true),
        Some("no") => Some(false),
        _ => None,
    };

    let chemical_ids = query
        .chemical_ids
        .as_deref()
        .map(|raw| {
            raw.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    Ok(FormListOptions {
        limit: query.limit.unwrap_or(0),
        offset: query.offset.unwrap_or(0),
        form_type: query.form_type,
        search_name: query.search,
        sort_by: query.sort_by,
        order: query.order,
        date_low,
        date_high,
        zip_code: query.zip_code,
        jewish_holiday,
        chemical_ids,
    })
}

fn build_apps(form_id: &str, requests: Vec<PestAppRequest>) -> Vec<PestApp> {
    requests
        .into_iter()
        .map(|req| {
            PestApp::new(NewPestAppParams {
                form_id: form_id.to_string(),
                chemical_id: req.chemical_id,
                applied_at: req.applied_at,
                rate: req.rate,
                amount: req.amount,
                location_code: req.location_code,
            })
        })
        .collect()
}

pub async fn list_forms(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Query(query): Query<FormListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let opts = list_options(query)?;
    let (forms, count) = state.form_repo.list(Some(&claims.sub), &opts).await?;

    Ok(Json(FormListResponse { forms, count }))
}

pub async fn admin_list_forms(
    State(state): State<Arc<AppState>>,
    AdminUser(_claims): AdminUser,
    Query(query): Query<FormListQuery>,
) -> Result<impl IntoResponse, AppError> {
    let opts = list_options(query)?;
    let (forms, count) = state.form_repo.list(None, &opts).await?;

    Ok(Json(FormListResponse { forms, count }))
}

pub async fn create_shrub_form(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Json(payload): Json<CreateShrubFormRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.shrub_count < 0 {
        return Err(AppError::Validation("shrub_count cannot be negative".into()));
    }

    let form = Form::new(NewFormParams {
        created_by: claims.sub.clone(),
        form_type: "shrub".to_string(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zip_code: payload.zip_code,
        jewish_holiday: payload.jewish_holiday,
    });
    let details = ShrubDetails {
        form_id: form.id.clone(),
        shrub_count: payload.shrub_count,
    };
    let apps = build_apps(&form.id, payload.applications.unwrap_or_default());

    state.form_repo.create_shrub(&form, &details, &apps).await?;

    info!("Shrub form created: {} by {}", form.id, claims.sub);

    Ok((StatusCode::CREATED, Json(FormCreatedResponse { id: form.id })))
}

pub async fn create_lawn_form(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Json(payload): Json<CreateLawnFormRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.area_sq_ft < 0.0 {
        return Err(AppError::Validation("area_sq_ft cannot be negative".into()));
    }

    let form = Form::new(NewFormParams {
        created_by: claims.sub.clone(),
        form_type: "lawn".to_string(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zip_code: payload.zip_code,
        jewish_holiday: payload.jewish_holiday,
    });
    let details = LawnDetails {
        form_id: form.id.clone(),
        area_sq_ft: payload.area_sq_ft,
    };
    let apps = build_apps(&form.id, payload.applications.unwrap_or_default());

    state.form_repo.create_lawn(&form, &details, &apps).await?;

    info!("Lawn form created: {} by {}", form.id, claims.sub);

    Ok((StatusCode::CREATED, Json(FormCreatedResponse { id: form.id })))
}

pub async fn create_pesticide_form(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Json(payload): Json<CreatePesticideFormRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.chemical_name.trim().is_empty() {
        return Err(AppError::Validation("chemical_name is required".into()));
    }

    let form = Form::new(NewFormParams {
        created_by: claims.sub.clone(),
        form_type: "pesticide".to_string(),
        first_name: payload.first_name,
        last_name: payload.last_name,
        phone: payload.phone,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zip_code: payload.zip_code,
        jewish_holiday: payload.jewish_holiday,
    });
    let details = PesticideDetails {
        form_id: form.id.clone(),
        chemical_name: payload.chemical_name,
    };

    state.form_repo.create_pesticide(&form, &details).await?;

    info!("Pesticide form created: {} by {}", form.id, claims.sub);

    Ok((StatusCode::CREATED, Json(FormCreatedResponse { id: form.id })))
}

pub async fn get_form(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let view = state
        .form_repo
        .find_by_id(&id, owner_scope(&claims))
        .await?
        .ok_or_else(|| AppError::NotFound("Form not found".into()))?;

    Ok(Json(view))
}

/// Typed fetch: the path segment must match the stored form's type, otherwise
/// the form is reported as missing.
pub async fn get_typed_form(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Path((form_type, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let view = state
        .form_repo
        .find_by_id(&id, owner_scope(&claims))
        .await?
        .ok_or_else(|| AppError::NotFound("Form not found".into()))?;

    if view.form.form_type != form_type {
        return Err(AppError::NotFound("Form not found".into()));
    }

    Ok(Json(view))
}

pub async fn update_form(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Path(id): Path<String>,
    Json(payload): Json<UpdateFormRequest>,
) -> Result<impl IntoResponse, AppError> {
    apply_update(&state, &claims, &id, None, payload).await
}

/// Typed update: the path segment must match the stored form's type.
pub async fn update_typed_form(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Path((form_type, id)): Path<(String, String)>,
    Json(payload): Json<UpdateFormRequest>,
) -> Result<impl IntoResponse, AppError> {
    apply_update(&state, &claims, &id, Some(&form_type), payload).await
}

async fn apply_update(
    state: &AppState,
    claims: &Claims,
    id: &str,
    expected_type: Option<&str>,
    payload: UpdateFormRequest,
) -> Result<Json<crate::domain::models::form::FormView>, AppError> {
    let owner = owner_scope(claims);
    let view = state
        .form_repo
        .find_by_id(id, owner)
        .await?
        .ok_or_else(|| AppError::NotFound("Form not found".into()))?;

    if let Some(expected) = expected_type {
        if view.form.form_type != expected {
            return Err(AppError::NotFound("Form not found".into()));
        }
    }

    let mut form = view.form;
    if let Some(v) = payload.first_name {
        form.first_name = v;
    }
    if let Some(v) = payload.last_name {
        form.last_name = v;
    }
    if let Some(v) = payload.phone {
        form.phone = v;
    }
    if let Some(v) = payload.address {
        form.address = v;
    }
    if let Some(v) = payload.city {
        form.city = v;
    }
    if let Some(v) = payload.state {
        form.state = v;
    }
    if let Some(v) = payload.zip_code {
        form.zip_code = v;
    }
    if let Some(v) = payload.jewish_holiday {
        form.jewish_holiday = v;
    }
    form.updated_at = Utc::now();

    match view.details {
        FormDetails::Shrub(mut details) => {
            if let Some(v) = payload.shrub_count {
                if v < 0 {
                    return Err(AppError::Validation("shrub_count cannot be negative".into()));
                }
                details.shrub_count = v;
            }
            state.form_repo.update_shrub(&form, &details, owner).await?;
        }
        FormDetails::Lawn(mut details) => {
            if let Some(v) = payload.area_sq_ft {
                if v < 0.0 {
                    return Err(AppError::Validation("area_sq_ft cannot be negative".into()));
                }
                details.area_sq_ft = v;
            }
            state.form_repo.update_lawn(&form, &details, owner).await?;
        }
        FormDetails::Pesticide(mut details) => {
            if let Some(v) = payload.chemical_name {
                if v.trim().is_empty() {
                    return Err(AppError::Validation("chemical_name is required".into()));
                }
                details.chemical_name = v;
            }
            state
                .form_repo
                .update_pesticide(&form, &details, owner)
                .await?;
        }
    }

    let updated = state
        .form_repo
        .find_by_id(id, owner)
        .await?
        .ok_or_else(|| AppError::NotFound("Form not found".into()))?;

    info!("Form updated: {} by {}", id, claims.sub);

    Ok(Json(updated))
}

pub async fn delete_form(
    State(state): State<Arc<AppState>>,
    ApprovedUser(claims): ApprovedUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.form_repo.delete(&id, owner_scope(&claims)).await?;

    info!("Form deleted: {} by {}", id, claims.sub);

    Ok(Json(StatusResponse {
        status: "deleted".to_string(),
    }))
}
