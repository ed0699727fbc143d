pub mod auth;
pub mod chemical;
pub mod form;
pub mod user;
