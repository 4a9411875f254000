use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::genre;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::genre::{CreateGenreRequest, GenreResponse, validate_create_genre};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Genres",
    operation_id = "listGenres",
    summary = "List all genres",
    responses(
        (status = 200, description = "List of genres", body = Vec<GenreResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_genres(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<GenreResponse>>, AppError> {
    let rows = genre::Entity::find()
        .order_by_asc(genre::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(rows.into_iter().map(GenreResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Genres",
    operation_id = "createGenre",
    summary = "Create a new genre",
    description = "Creates a genre. Requires `genre:create` permission.",
    request_body = CreateGenreRequest,
    responses(
        (status = 201, description = "Genre created", body = GenreResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 409, description = "Genre name already exists (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(name = %payload.name))]
pub async fn create_genre(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateGenreRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("genre:create")?;
    validate_create_genre(&payload)?;

    let new_genre = genre::ActiveModel {
        name: Set(payload.name.trim().to_string()),
        ..Default::default()
    };

    let model = new_genre
        .insert(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Genre name already exists".into())
            }
            _ => AppError::from(e),
        })?;

    Ok((StatusCode::CREATED, Json(GenreResponse::from(model))))
}
