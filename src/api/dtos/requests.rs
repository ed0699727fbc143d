use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct PestAppRequest {
    pub chemical_id: String,
    pub applied_at: DateTime<Utc>,
    pub rate: f64,
    pub amount: f64,
    pub location_code: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateShrubFormRequest {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    #[serde(default)]
    pub jewish_holiday: bool,
    pub shrub_count: i32,
    pub applications: Option<Vec<PestAppRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLawnFormRequest {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    #[serde(default)]
    pub jewish_holiday: bool,
    pub area_sq_ft: f64,
    pub applications: Option<Vec<PestAppRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePesticideFormRequest {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone: String,
    #[serde(default)]
    pub jewish_holiday: bool,
    pub chemical_name: String,
}

/// Partial update for any form type. Subtype fields are ignored when they
/// do not match the stored form's type.
#[derive(Debug, Deserialize)]
pub struct UpdateFormRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone: Option<String>,
    pub jewish_holiday: Option<bool>,
    pub shrub_count: Option<i32>,
    pub area_sq_ft: Option<f64>,
    pub chemical_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateChemicalRequest {
    pub category: String,
    pub brand: String,
    pub chemical_name: String,
    pub epa_registration: String,
    pub recipe: String,
    pub unit: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateChemicalRequest {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub chemical_name: Option<String>,
    pub epa_registration: Option<String>,
    pub recipe: Option<String>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct FormListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    #[serde(rename = "type")]
    pub form_type: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub date_low: Option<String>,
    pub date_high: Option<String>,
    pub zip_code: Option<String>,
    pub jewish_holiday: Option<String>,
    pub chemical_ids: Option<String>,
}
