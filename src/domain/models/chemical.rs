use serde::{Deserialize, Serialize};
use uuid::Uuid;
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Chemical {
    pub id: String,
    pub category: String,
    pub brand: String,
    pub chemical_name: String,
    pub epa_registration: String,
    pub recipe: String,
    pub unit: String,
}

pub struct NewChemicalParams {
    pub category: String,
    pub brand: String,
    pub chemical_name: String,
    pub epa_registration: String,
    pub recipe: String,
    pub unit: String,
}

impl Chemical {
    pub fn new(params: NewChemicalParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            category: params.category,
            brand: params.brand,
            chemical_name: params.chemical_name,
            epa_registration: params.epa_registration,
            recipe: params.recipe,
            unit: params.unit,
        }
    }
}
