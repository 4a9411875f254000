pub mod actor;
pub mod genre;
pub mod movie;
pub mod movie_actor;
pub mod movie_genre;
pub mod role;
pub mod role_permission;
pub mod user;
