use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
use tower_cookies::Cookies;
use tracing::Span;

use crate::domain::models::auth::Claims;
use crate::error::AppError;
use crate::state::AppState;

pub const AUTH_COOKIE: &str = "auth_token";

/// Any authenticated caller, including accounts still awaiting approval.
pub struct AuthUser(pub Claims);

/// An authenticated caller whose account has been approved by an admin.
pub struct ApprovedUser(pub Claims);

/// An authenticated caller with the admin role.
pub struct AdminUser(pub Claims);

fn extract_token(parts: &Parts) -> Result<String, AppError> {
    let cookies = parts
        .extensions
        .get::<Cookies>()
        .ok_or(AppError::Internal)?;

    if let Some(cookie) = cookies.get(AUTH_COOKIE) {
        return Ok(cookie.value().to_string());
    }

    // Fallback for API clients that send the token as a Bearer header.
    parts
        .headers
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.to_string())
        .ok_or(AppError::Unauthorized)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        let app_state = <Arc<AppState> as FromRef<S>>::from_ref(state);
        let claims = app_state.auth_service.verify_token(&token)?;

        Span::current().record("user_id", &claims.sub);

        Ok(AuthUser(claims))
    }
}

impl<S> FromRequestParts<S> for ApprovedUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;

        if claims.pending {
            return Err(AppError::Forbidden("Account pending approval".into()));
        }

        Ok(ApprovedUser(claims))
    }
}

impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
    Arc<AppState>: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ApprovedUser(claims) = ApprovedUser::from_request_parts(parts, state).await?;

        if !claims.is_admin() {
            return Err(AppError::Forbidden("Admin access required".into()));
        }

        Ok(AdminUser(claims))
    }
}
