use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub use super::shared::{escape_like, parse_id_list};
use super::shared::{validate_id_set, validate_name};
use super::{actor::ActorResponse, genre::GenreResponse};

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateMovieRequest {
    #[schema(example = "Forrest Gump")]
    pub title: String,
    #[schema(example = "Life story")]
    pub description: String,
    /// Running time in minutes.
    #[schema(example = 140)]
    pub duration: i32,
    /// Genre IDs to associate; every ID must exist.
    #[serde(default)]
    #[schema(example = json!([1]))]
    pub genres: Vec<i32>,
    /// Actor IDs to associate; every ID must exist.
    #[serde(default)]
    #[schema(example = json!([1]))]
    pub actors: Vec<i32>,
}

pub fn validate_create_movie(req: &CreateMovieRequest) -> Result<(), AppError> {
    validate_name(&req.title, "Title")?;
    if req.description.trim().is_empty() || req.description.chars().count() > 4000 {
        return Err(AppError::Validation(
            "Description must be non-empty and at most 4000 characters".into(),
        ));
    }
    if !(1..=6000).contains(&req.duration) {
        return Err(AppError::Validation(
            "Duration must be 1-6000 minutes".into(),
        ));
    }
    validate_id_set(&req.genres, "genre")?;
    validate_id_set(&req.actors, "actor")?;
    Ok(())
}

/// Query parameters accepted by the movie listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct MovieListQuery {
    /// Case-insensitive title substring filter.
    pub title: Option<String>,
    /// Comma-separated genre IDs; a movie matches if it has any of them.
    pub genres: Option<String>,
    /// Comma-separated actor IDs; a movie matches if it has any of them.
    pub actors: Option<String>,
}

/// Summary representation used in list contexts.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MovieListItem {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Forrest Gump")]
    pub title: String,
    #[schema(example = "Life story")]
    pub description: String,
    #[schema(example = 140)]
    pub duration: i32,
    /// Genre names, flattened.
    #[schema(example = json!(["Action"]))]
    pub genres: Vec<String>,
    /// Actor full names, flattened.
    #[schema(example = json!(["Tom Hanks"]))]
    pub actors: Vec<String>,
    /// URL of the poster image, or null if none was uploaded.
    #[schema(example = "/api/v1/movies/1/image")]
    pub image: Option<String>,
}

/// Detail representation used in single-item contexts.
#[derive(Serialize, utoipa::ToSchema)]
pub struct MovieDetailResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Forrest Gump")]
    pub title: String,
    #[schema(example = "Life story")]
    pub description: String,
    #[schema(example = 140)]
    pub duration: i32,
    /// Expanded genre data.
    pub genres: Vec<GenreResponse>,
    /// Expanded actor data.
    pub actors: Vec<ActorResponse>,
    /// URL of the poster image, or null if none was uploaded.
    #[schema(example = "/api/v1/movies/1/image")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// URL under which a movie's uploaded image is served.
pub fn image_url(movie_id: i32, image: Option<&str>) -> Option<String> {
    image.map(|_| format!("/api/v1/movies/{movie_id}/image"))
}
