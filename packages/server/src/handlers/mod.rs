pub mod actor;
pub mod auth;
pub mod genre;
pub mod movie;
