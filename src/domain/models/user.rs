use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub role: String,
    pub pending: bool,
    pub created_at: DateTime<Utc>,
}

pub struct NewUserParams {
    pub username: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
}

impl User {
    /// New registrations start as unapproved employees.
    pub fn new(params: NewUserParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: params.username,
            password_hash: params.password_hash,
            first_name: params.first_name,
            last_name: params.last_name,
            date_of_birth: params.date_of_birth,
            role: "employee".to_string(),
            pending: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}
