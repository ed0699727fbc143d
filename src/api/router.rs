use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    catch_panic::CatchPanicLayer, classify::ServerErrorsFailureClass, cors::CorsLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, warn, Span};
use uuid::Uuid;

use crate::api::handlers::{auth, chemical, form, health, user};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = match state.config.frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_credentials(true)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        Err(_) => {
            warn!("Invalid FRONTEND_ORIGIN, CORS disabled");
            CorsLayer::new()
        }
    };

    Router::new()
        .route("/health", get(health::health_check))

        // Auth
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/auth/me", get(auth::me))

        // Users
        .route("/api/v1/users", get(user::list_users))
        .route("/api/v1/users/{id}", get(user::get_user).put(user::update_user).delete(user::delete_user))
        .route("/api/v1/users/{id}/approve", post(user::approve_user))

        // Forms
        .route("/api/v1/forms", get(form::list_forms))
        .route("/api/v1/forms/shrub", post(form::create_shrub_form))
        .route("/api/v1/forms/lawn", post(form::create_lawn_form))
        .route("/api/v1/forms/pesticide", post(form::create_pesticide_form))
        .route("/api/v1/forms/{id}", get(form::get_form).put(form::update_form).delete(form::delete_form))
        .route("/api/v1/forms/{form_type}/{id}", get(form::get_typed_form).put(form::update_typed_form))
        .route("/api/v1/admin/forms", get(form::admin_list_forms))

        // Chemicals
        .route("/api/v1/chemicals", get(chemical::list_chemicals))
        .route("/api/v1/chemicals/category/{category}", get(chemical::list_chemicals_by_category))
        .route("/api/v1/chemicals/{id}", get(chemical::get_chemical))
        .route("/api/v1/admin/chemicals", post(chemical::create_chemical))
        .route("/api/v1/admin/chemicals/{id}", put(chemical::update_chemical).delete(chemical::delete_chemical))

        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    let request_id = Uuid::new_v4().to_string();
                    info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = ?request.method(),
                        uri = ?request.uri(),
                        version = ?request.version(),
                        user_id = tracing::field::Empty,
                    )
                })
                .on_request(|request: &Request<Body>, _span: &Span| {
                    info!("started processing request: {} {}", request.method(), request.uri().path());
                })
                .on_response(|response: &axum::http::Response<Body>, latency: Duration, _span: &Span| {
                    info!(
                        status = response.status().as_u16(),
                        latency_ms = latency.as_millis(),
                        "finished processing request"
                    );
                })
                .on_failure(|error: ServerErrorsFailureClass, _latency: Duration, _span: &Span| {
                    error!("request failed: {:?}", error);
                })
        )
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
