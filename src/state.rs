use std::sync::Arc;
use crate::domain::ports::{ChemicalRepository, FormRepository, UserRepository};
use crate::domain::services::auth_service::AuthService;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub user_repo: Arc<dyn UserRepository>,
    pub form_repo: Arc<dyn FormRepository>,
    pub chemical_repo: Arc<dyn ChemicalRepository>,
    pub auth_service: Arc<AuthService>,
}
