use serde::{Deserialize, Serialize};

use crate::error::AppError;

use super::shared::validate_name;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateActorRequest {
    #[schema(example = "Tom")]
    pub first_name: String,
    #[schema(example = "Hanks")]
    pub last_name: String,
}

pub fn validate_create_actor(req: &CreateActorRequest) -> Result<(), AppError> {
    validate_name(&req.first_name, "First name")?;
    validate_name(&req.last_name, "Last name")
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ActorResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Tom")]
    pub first_name: String,
    #[schema(example = "Hanks")]
    pub last_name: String,
    /// Convenience rendering of "first_name last_name".
    #[schema(example = "Tom Hanks")]
    pub full_name: String,
}

impl From<crate::entity::actor::Model> for ActorResponse {
    fn from(m: crate::entity::actor::Model) -> Self {
        let full_name = format!("{} {}", m.first_name, m.last_name);
        Self {
            id: m.id,
            first_name: m.first_name,
            last_name: m.last_name,
            full_name,
        }
    }
}
