use landscaping_backend::{
    api::router::create_router,
    config::Config,
    domain::models::user::User,
    domain::services::auth_service::AuthService,
    infra::repositories::{
        sqlite_chemical_repo::SqliteChemicalRepo, sqlite_form_repo::SqliteFormRepo,
        sqlite_user_repo::SqliteUserRepo,
    },
    state::AppState,
};

use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: Pool<Sqlite>,
    pub db_filename: String,
    pub state: Arc<AppState>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_filename = format!("test_{}.db", Uuid::new_v4());
        let db_url = format!("sqlite://{}?mode=rwc", db_filename);

        let connection_options = SqliteConnectOptions::from_str(&db_url)
            .unwrap()
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .connect_with(connection_options)
            .await
            .expect("Failed to connect to test db");

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .expect("Failed to migrate test db");

        let priv_key_pem = include_str!("keys/test_private.pem");
        let pub_key_pem = include_str!("keys/test_public.pem");

        let config = Config {
            database_url: db_url.clone(),
            port: 0,
            jwt_secret_key: priv_key_pem.to_string(),
            jwt_public_key: pub_key_pem.to_string(),
            auth_issuer: "test-issuer".to_string(),
            frontend_origin: "http://localhost:5173".to_string(),
        };

        let auth_service = Arc::new(AuthService::new(config.clone()));

        let state = Arc::new(AppState {
            config: config.clone(),
            user_repo: Arc::new(SqliteUserRepo::new(pool.clone())),
            form_repo: Arc::new(SqliteFormRepo::new(pool.clone())),
            chemical_repo: Arc::new(SqliteChemicalRepo::new(pool.clone())),
            auth_service,
        });

        let router = create_router(state.clone());

        Self {
            router,
            pool,
            db_filename,
            state,
        }
    }

    /// Inserts an approved admin directly through the repository and returns
    /// its id.
    pub async fn seed_admin(&self, username: &str, password: &str) -> String {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            password_hash: bcrypt::hash(password, 4).unwrap(),
            first_name: "Admin".to_string(),
            last_name: "User".to_string(),
            date_of_birth: chrono::NaiveDate::from_ymd_opt(1980, 1, 1).unwrap(),
            role: "admin".to_string(),
            pending: false,
            created_at: chrono::Utc::now(),
        };
        let created = self.state.user_repo.create(&user).await.unwrap();
        created.id
    }

    /// Registers an employee via the API and approves it through the
    /// repository so it can log in. Returns its id.
    pub async fn seed_employee(&self, username: &str, password: &str) -> String {
        let res = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/register")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        serde_json::json!({
                            "username": username,
                            "password": password,
                            "first_name": "Test",
                            "last_name": "Employee",
                            "date_of_birth": "1990-06-15"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(
            res.status().is_success(),
            "register failed in test helper: {}",
            res.status()
        );
        let body = parse_body(res).await;
        let id = body["id"].as_str().unwrap().to_string();

        self.state.user_repo.approve(&id).await.unwrap();
        id
    }

    pub async fn login(&self, username: &str, password: &str) -> String {
        let payload = serde_json::json!({
            "username": username,
            "password": password
        });

        let response = self
            .router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(payload.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        if !response.status().is_success() {
            panic!("Login failed in test helper: status {}", response.status());
        }

        let body = parse_body(response).await;
        body["token"].as_str().expect("No token in body").to_string()
    }

    pub async fn get(&self, uri: &str, token: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .header(header::COOKIE, format!("auth_token={}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn post(&self, uri: &str, token: &str, body: Value) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::COOKIE, format!("auth_token={}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn put(&self, uri: &str, token: &str, body: Value) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri(uri)
                    .header(header::COOKIE, format!("auth_token={}", token))
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub async fn delete(&self, uri: &str, token: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(uri)
                    .header(header::COOKIE, format!("auth_token={}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_filename);
    }
}

pub async fn parse_body(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
