use axum::Json;

use crate::api::dtos::responses::HealthResponse;

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Landscaping service is running".to_string(),
        code: 200,
    })
}
