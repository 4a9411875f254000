use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::actor;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::actor::{ActorResponse, CreateActorRequest, validate_create_actor};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Actors",
    operation_id = "listActors",
    summary = "List all actors",
    responses(
        (status = 200, description = "List of actors", body = Vec<ActorResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_actors(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<ActorResponse>>, AppError> {
    let rows = actor::Entity::find()
        .order_by_asc(actor::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(ActorResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Actors",
    operation_id = "createActor",
    summary = "Create a new actor",
    description = "Creates an actor. Requires `actor:create` permission.",
    request_body = CreateActorRequest,
    responses(
        (status = 201, description = "Actor created", body = ActorResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_actor(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateActorRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("actor:create")?;
    validate_create_actor(&payload)?;

    let new_actor = actor::ActiveModel {
        first_name: Set(payload.first_name.trim().to_string()),
        last_name: Set(payload.last_name.trim().to_string()),
        ..Default::default()
    };

    let model = new_actor.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(ActorResponse::from(model))))
}
