use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use time::Duration;
use tower_cookies::cookie::SameSite;
use tower_cookies::{Cookie, Cookies};
use tracing::info;

use crate::api::dtos::requests::{LoginRequest, RegisterRequest};
use crate::api::extractors::auth::{AuthUser, AUTH_COOKIE};
use crate::domain::models::auth::{AuthResponse, UserProfile};
use crate::domain::models::user::{NewUserParams, User};
use crate::domain::services::auth_service::TOKEN_VALIDITY_HOURS;
use crate::error::AppError;
use crate::state::AppState;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.username.trim().is_empty() || payload.password.is_empty() {
        return Err(AppError::Validation(
            "Username and password are required".into(),
        ));
    }

    if state
        .user_repo
        .find_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict("Username already taken".into()));
    }

    let password_hash =
        bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST).map_err(|_| AppError::Internal)?;

    let user = User::new(NewUserParams {
        username: payload.username,
        password_hash,
        first_name: payload.first_name,
        last_name: payload.last_name,
        date_of_birth: payload.date_of_birth,
    });

    let created = state.user_repo.create(&user).await?;

    info!("User registered (pending approval): {}", created.id);

    Ok((StatusCode::CREATED, Json(UserProfile::from(created))))
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    cookies: Cookies,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_username(&payload.username)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let valid =
        bcrypt::verify(&payload.password, &user.password_hash).map_err(|_| AppError::Internal)?;
    if !valid {
        return Err(AppError::Unauthorized);
    }

    if user.pending {
        return Err(AppError::Forbidden("Account pending approval".into()));
    }

    let token = state.auth_service.issue_token(&user)?;

    set_auth_cookie(&cookies, &token);

    info!("User logged in: {}", user.id);

    Ok(Json(AuthResponse {
        token,
        user: UserProfile::from(user),
    }))
}

pub async fn logout(cookies: Cookies) -> impl IntoResponse {
    cookies.remove(Cookie::build((AUTH_COOKIE, "")).path("/").into());

    info!("User logged out");

    StatusCode::OK
}

pub async fn me(
    State(state): State<Arc<AppState>>,
    AuthUser(claims): AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state
        .user_repo
        .find_by_id(&claims.sub)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".into()))?;

    Ok(Json(UserProfile::from(user)))
}

fn set_auth_cookie(cookies: &Cookies, token: &str) {
    let mut cookie = Cookie::new(AUTH_COOKIE, token.to_string());
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Strict);
    cookie.set_path("/");
    cookie.set_max_age(Duration::hours(TOKEN_VALIDITY_HOURS));
    cookies.add(cookie);
}
