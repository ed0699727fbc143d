use serde::Serialize;

use crate::domain::models::form::FormView;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub code: u16,
}

#[derive(Debug, Serialize)]
pub struct FormCreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct FormListResponse {
    pub forms: Vec<FormView>,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
}
