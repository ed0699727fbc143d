pub mod postgres_chemical_repo;
pub mod postgres_form_repo;
pub mod postgres_user_repo;
pub mod sqlite_chemical_repo;
pub mod sqlite_form_repo;
pub mod sqlite_user_repo;
