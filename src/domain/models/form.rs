use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Form {
    pub id: String,
    pub created_by: String,
    pub form_type: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub jewish_holiday: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewFormParams {
    pub created_by: String,
    pub form_type: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub jewish_holiday: bool,
}

impl Form {
    pub fn new(params: NewFormParams) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            created_by: params.created_by,
            form_type: params.form_type,
            first_name: params.first_name,
            last_name: params.last_name,
            phone: params.phone,
            address: params.address,
            city: params.city,
            state: params.state,
            zip_code: params.zip_code,
            jewish_holiday: params.jewish_holiday,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct ShrubDetails {
    pub form_id: String,
    pub shrub_count: i32,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct LawnDetails {
    pub form_id: String,
    pub area_sq_ft: f64,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PesticideDetails {
    pub form_id: String,
    pub chemical_name: String,
}

/// Exactly one subtype payload per form. The discriminant lives in
/// `Form::form_type`, so the payload serializes untagged.
#[derive(Debug, Serialize, Clone)]
#[serde(untagged)]
pub enum FormDetails {
    Shrub(ShrubDetails),
    Lawn(LawnDetails),
    Pesticide(PesticideDetails),
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct PestApp {
    pub id: String,
    pub form_id: String,
    pub chemical_id: String,
    pub applied_at: DateTime<Utc>,
    pub rate: f64,
    pub amount: f64,
    pub location_code: String,
}

pub struct NewPestAppParams {
    pub form_id: String,
    pub chemical_id: String,
    pub applied_at: DateTime<Utc>,
    pub rate: f64,
    pub amount: f64,
    pub location_code: String,
}

impl PestApp {
    pub fn new(params: NewPestAppParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            form_id: params.form_id,
            chemical_id: params.chemical_id,
            applied_at: params.applied_at,
            rate: params.rate,
            amount: params.amount,
            location_code: params.location_code,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub struct FormView {
    #[serde(flatten)]
    pub form: Form,
    pub details: FormDetails,
    pub applications: Vec<PestApp>,
}

#[derive(Debug, Default, Clone)]
pub struct FormListOptions {
    /// `<= 0` means unbounded.
    pub limit: i64,
    pub offset: i64,
    pub form_type: Option<String>,
    pub search_name: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub date_low: Option<DateTime<Utc>>,
    pub date_high: Option<DateTime<Utc>>,
    pub zip_code: Option<String>,
    pub jewish_holiday: Option<bool>,
    pub chemical_ids: Vec<String>,
}

const SORT_COLUMNS: [&str; 6] = [
    "first_name",
    "last_name",
    "zip_code",
    "form_type",
    "created_at",
    "updated_at",
];

impl FormListOptions {
    /// Sort column validated against the allow-list; anything unrecognized
    /// falls back to the default. Only values returned here may be
    /// interpolated into query text.
    pub fn sort_column(&self) -> &'static str {
        match self.sort_by.as_deref() {
            Some(requested) => SORT_COLUMNS
                .iter()
                .find(|col| **col == requested)
                .copied()
                .unwrap_or("created_at"),
            None => "created_at",
        }
    }

    pub fn sort_direction(&self) -> &'static str {
        match self.order.as_deref().map(|o| o.to_uppercase()) {
            Some(o) if o == "ASC" => "ASC",
            _ => "DESC",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_column_rejects_values_outside_allow_list() {
        let opts = FormListOptions {
            sort_by: Some("first_name; DROP TABLE forms".to_string()),
            ..Default::default()
        };
        assert_eq!(opts.sort_column(), "created_at");
    }

    #[test]
    fn sort_column_accepts_allow_listed_values() {
        let opts = FormListOptions {
            sort_by: Some("last_name".to_string()),
            ..Default::default()
        };
        assert_eq!(opts.sort_column(), "last_name");
    }

    #[test]
    fn sort_direction_defaults_to_desc() {
        let mut opts = FormListOptions::default();
        assert_eq!(opts.sort_direction(), "DESC");

        opts.order = Some("sideways".to_string());
        assert_eq!(opts.sort_direction(), "DESC");

        opts.order = Some("asc".to_string());
        assert_eq!(opts.sort_direction(), "ASC");
    }
}
