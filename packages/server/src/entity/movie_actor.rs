use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movie_actor")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub movie_id: i32,
    #[sea_orm(primary_key)]
    pub actor_id: i32,
    #[sea_orm(belongs_to, from = "movie_id", to = "id")]
    pub movie: Option<super::movie::Entity>,
    #[sea_orm(belongs_to, from = "actor_id", to = "id")]
    pub actor: Option<super::actor::Entity>,
}

impl ActiveModelBehavior for ActiveModel {}
