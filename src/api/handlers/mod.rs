pub mod auth;
pub mod chemical;
pub mod form;
pub mod health;
pub mod user;
