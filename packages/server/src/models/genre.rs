use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateGenreRequest {
    /// Genre name, unique across the catalog.
    #[schema(example = "Action")]
    pub name: String,
}

pub fn validate_create_genre(req: &CreateGenreRequest) -> Result<(), AppError> {
    validate_name(&req.name, "Name")
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct GenreResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Action")]
    pub name: String,
}

impl From<crate::entity::genre::Model> for GenreResponse {
    fn from(m: crate::entity::genre::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
        }
    }
}
