use crate::domain::models::{
    chemical::Chemical,
    form::{Form, FormListOptions, FormView, LawnDetails, PestApp, PesticideDetails, ShrubDetails},
    user::User,
};
use crate::error::AppError;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn update(&self, user: &User) -> Result<User, AppError>;
    async fn approve(&self, id: &str) -> Result<(), AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}

/// Owner scoping: `owner` is `None` for admin callers (no restriction) and
/// `Some(user_id)` otherwise. A row that exists but belongs to someone else
/// is reported exactly like a missing row.
#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn create_shrub(&self, form: &Form, details: &ShrubDetails, apps: &[PestApp]) -> Result<(), AppError>;
    async fn create_lawn(&self, form: &Form, details: &LawnDetails, apps: &[PestApp]) -> Result<(), AppError>;
    async fn create_pesticide(&self, form: &Form, details: &PesticideDetails) -> Result<(), AppError>;
    async fn find_by_id(&self, id: &str, owner: Option<&str>) -> Result<Option<FormView>, AppError>;
    async fn list(&self, owner: Option<&str>, opts: &FormListOptions) -> Result<(Vec<FormView>, i64), AppError>;
    async fn update_shrub(&self, form: &Form, details: &ShrubDetails, owner: Option<&str>) -> Result<(), AppError>;
    async fn update_lawn(&self, form: &Form, details: &LawnDetails, owner: Option<&str>) -> Result<(), AppError>;
    async fn update_pesticide(&self, form: &Form, details: &PesticideDetails, owner: Option<&str>) -> Result<(), AppError>;
    async fn delete(&self, id: &str, owner: Option<&str>) -> Result<(), AppError>;
}

#[async_trait]
pub trait ChemicalRepository: Send + Sync {
    async fn create(&self, chemical: &Chemical) -> Result<Chemical, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Chemical>, AppError>;
    async fn list(&self) -> Result<Vec<Chemical>, AppError>;
    async fn list_by_category(&self, category: &str) -> Result<Vec<Chemical>, AppError>;
    async fn update(&self, chemical: &Chemical) -> Result<Chemical, AppError>;
    async fn delete(&self, id: &str) -> Result<(), AppError>;
}
