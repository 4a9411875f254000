use std::collections::HashMap;

use axum::Json;
use axum::body::Body;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use sea_orm::prelude::Expr;
use sea_orm::sea_query::{Func, LikeExpr, Query as SeaQuery};
use sea_orm::*;
use tokio_util::io::ReaderStream;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{actor, genre, movie, movie_actor, movie_genre};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::actor::ActorResponse;
use crate::models::genre::GenreResponse;
use crate::models::movie::*;
use crate::state::AppState;

/// Body limit layer for the image upload route (16MB).
pub fn image_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(16 * 1024 * 1024)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Movies",
    operation_id = "listMovies",
    summary = "List movies with optional filters",
    description = "Returns all movies in the catalog, ordered by ID. `title` filters by \
        case-insensitive substring; `genres` and `actors` take comma-separated ID lists and \
        match movies having at least one of the listed IDs. Distinct filters combine with AND.",
    params(MovieListQuery),
    responses(
        (status = 200, description = "List of movies", body = Vec<MovieListItem>),
        (status = 400, description = "Malformed filter (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user, query))]
pub async fn list_movies(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<MovieListQuery>,
) -> Result<Json<Vec<MovieListItem>>, AppError> {
    let mut select = movie::Entity::find();

    if let Some(ref title) = query.title {
        let term = escape_like(title.trim());
        if !term.is_empty() {
            select = select.filter(
                Expr::expr(Func::lower(Expr::col(movie::Column::Title)))
                    .like(LikeExpr::new(format!("%{}%", term.to_lowercase())).escape('\\')),
            );
        }
    }

    if let Some(ref genres) = query.genres {
        let ids = parse_id_list(genres, "genre")?;
        if !ids.is_empty() {
            select = select.filter(
                movie::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(movie_genre::Column::MovieId)
                        .from(movie_genre::Entity)
                        .and_where(movie_genre::Column::GenreId.is_in(ids))
                        .to_owned(),
                ),
            );
        }
    }

    if let Some(ref actors) = query.actors {
        let ids = parse_id_list(actors, "actor")?;
        if !ids.is_empty() {
            select = select.filter(
                movie::Column::Id.in_subquery(
                    SeaQuery::select()
                        .column(movie_actor::Column::MovieId)
                        .from(movie_actor::Entity)
                        .and_where(movie_actor::Column::ActorId.is_in(ids))
                        .to_owned(),
                ),
            );
        }
    }

    let movies = select
        .order_by_asc(movie::Column::Id)
        .all(&state.db)
        .await?;

    let movie_ids: Vec<i32> = movies.iter().map(|m| m.id).collect();
    let (genre_names, actor_names) = load_flattened_names(&state.db, &movie_ids).await?;

    let items = movies
        .into_iter()
        .map(|m| {
            let image = image_url(m.id, m.image.as_deref());
            MovieListItem {
                id: m.id,
                title: m.title,
                description: m.description,
                duration: m.duration,
                genres: genre_names.get(&m.id).cloned().unwrap_or_default(),
                actors: actor_names.get(&m.id).cloned().unwrap_or_default(),
                image,
            }
        })
        .collect();

    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Movies",
    operation_id = "getMovie",
    summary = "Get a movie by ID",
    description = "Returns the full detail representation, including expanded genre and actor data.",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Movie details", body = MovieDetailResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Movie not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(id))]
pub async fn get_movie(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MovieDetailResponse>, AppError> {
    let model = find_movie(&state.db, id).await?;
    let detail = load_movie_detail(&state.db, model).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Movies",
    operation_id = "createMovie",
    summary = "Create a new movie",
    description = "Creates a movie with its genre and actor associations. Requires \
        `movie:create` permission. Unknown genre or actor IDs are a validation error; \
        the movie and its associations are written in one transaction.",
    request_body = CreateMovieRequest,
    responses(
        (status = 201, description = "Movie created", body = MovieDetailResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(title = %payload.title))]
pub async fn create_movie(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateMovieRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_permission("movie:create")?;
    validate_create_movie(&payload)?;

    let txn = state.db.begin().await?;

    ensure_genres_exist(&txn, &payload.genres).await?;
    ensure_actors_exist(&txn, &payload.actors).await?;

    let new_movie = movie::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        description: Set(payload.description),
        duration: Set(payload.duration),
        image: Set(None),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_movie.insert(&txn).await?;

    for genre_id in &payload.genres {
        let link = movie_genre::ActiveModel {
            movie_id: Set(model.id),
            genre_id: Set(*genre_id),
        };
        link.insert(&txn).await?;
    }
    for actor_id in &payload.actors {
        let link = movie_actor::ActiveModel {
            movie_id: Set(model.id),
            actor_id: Set(*actor_id),
        };
        link.insert(&txn).await?;
    }

    txn.commit().await?;

    let detail = load_movie_detail(&state.db, model).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

#[utoipa::path(
    post,
    path = "/{id}/upload-image",
    tag = "Movies",
    operation_id = "uploadMovieImage",
    summary = "Upload a poster image for a movie",
    description = "Accepts a multipart `image` field, validates that the payload decodes as a \
        raster image, and stores it, replacing any previous image. Requires `movie:edit` \
        permission. A payload that does not decode leaves the movie unchanged. Body limit: 16 MB.",
    params(("id" = i32, Path, description = "Movie ID")),
    request_body(content_type = "multipart/form-data", description = "Image file under field name `image`"),
    responses(
        (status = 200, description = "Image stored", body = MovieDetailResponse),
        (status = 400, description = "Missing field or undecodable payload (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Movie not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(movie_id))]
pub async fn upload_movie_image(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
    mut multipart: Multipart,
) -> Result<Json<MovieDetailResponse>, AppError> {
    auth_user.require_permission("movie:edit")?;

    let model = find_movie(&state.db, movie_id).await?;

    let mut image_bytes: Option<Vec<u8>> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() == Some("image") {
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("Failed to read image: {e}")))?;
            image_bytes = Some(data.to_vec());
            break;
        }
    }

    let image_bytes =
        image_bytes.ok_or_else(|| AppError::Validation("Missing 'image' field".into()))?;

    // Sniff the format first, then fully decode. Both must succeed before
    // anything is written; a bad payload leaves the movie untouched.
    let format = image::guess_format(&image_bytes)
        .map_err(|_| AppError::Validation("Payload is not a recognized image format".into()))?;
    image::load_from_memory(&image_bytes)
        .map_err(|e| AppError::Validation(format!("Image data does not decode: {e}")))?;

    let ext = format.extensions_str().first().copied().unwrap_or("bin");
    let filename = format!("{}.{ext}", Uuid::now_v7());
    let media_dir = &state.config.storage.media_dir;

    tokio::fs::create_dir_all(media_dir)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create media dir: {e}")))?;
    tokio::fs::write(media_dir.join(&filename), &image_bytes)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to write image: {e}")))?;

    let previous = model.image.clone();

    let mut active: movie::ActiveModel = model.into();
    active.image = Set(Some(filename.clone()));
    let model = match active.update(&state.db).await {
        Ok(model) => model,
        Err(e) => {
            // Don't leave an orphaned file if the row update fails.
            let _ = tokio::fs::remove_file(media_dir.join(&filename)).await;
            return Err(e.into());
        }
    };

    // Replaced images are removed best-effort; a leftover file is harmless.
    if let Some(old) = previous {
        let _ = tokio::fs::remove_file(media_dir.join(old)).await;
    }

    let detail = load_movie_detail(&state.db, model).await?;
    Ok(Json(detail))
}

#[utoipa::path(
    get,
    path = "/{id}/image",
    tag = "Movies",
    operation_id = "getMovieImage",
    summary = "Fetch a movie's poster image",
    description = "Streams the stored image bytes with the content type guessed from the filename.",
    params(("id" = i32, Path, description = "Movie ID")),
    responses(
        (status = 200, description = "Image content"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Movie or image not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user), fields(movie_id))]
pub async fn get_movie_image(
    _auth_user: AuthUser,
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
) -> Result<Response, AppError> {
    let model = find_movie(&state.db, movie_id).await?;
    let filename = model
        .image
        .ok_or_else(|| AppError::NotFound("Movie has no image".into()))?;

    let path = state.config.storage.media_dir.join(&filename);
    let file = tokio::fs::File::open(&path)
        .await
        .map_err(|_| AppError::NotFound("Image file not found".into()))?;

    let content_type = mime_guess::from_path(&filename)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let body = Body::from_stream(ReaderStream::new(file));
    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "private, max-age=3600")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}

async fn find_movie<C: ConnectionTrait>(db: &C, id: i32) -> Result<movie::Model, AppError> {
    movie::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".into()))
}

/// Verify that every referenced genre ID exists.
async fn ensure_genres_exist<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<i32> = genre::Entity::find()
        .filter(genre::Column::Id.is_in(ids.to_vec()))
        .select_only()
        .column(genre::Column::Id)
        .into_tuple::<i32>()
        .all(db)
        .await?;
    if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
        return Err(AppError::Validation(format!("Unknown genre ID: {missing}")));
    }
    Ok(())
}

/// Verify that every referenced actor ID exists.
async fn ensure_actors_exist<C: ConnectionTrait>(db: &C, ids: &[i32]) -> Result<(), AppError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<i32> = actor::Entity::find()
        .filter(actor::Column::Id.is_in(ids.to_vec()))
        .select_only()
        .column(actor::Column::Id)
        .into_tuple::<i32>()
        .all(db)
        .await?;
    if let Some(missing) = ids.iter().find(|id| !found.contains(id)) {
        return Err(AppError::Validation(format!("Unknown actor ID: {missing}")));
    }
    Ok(())
}

/// Expand a movie into its detail representation (genres and actors joined in).
async fn load_movie_detail<C: ConnectionTrait>(
    db: &C,
    model: movie::Model,
) -> Result<MovieDetailResponse, AppError> {
    let genre_rows = movie_genre::Entity::find()
        .filter(movie_genre::Column::MovieId.eq(model.id))
        .find_also_related(genre::Entity)
        .order_by_asc(movie_genre::Column::GenreId)
        .all(db)
        .await?;
    let genres = genre_rows
        .into_iter()
        .filter_map(|(_, g)| g.map(GenreResponse::from))
        .collect();

    let actor_rows = movie_actor::Entity::find()
        .filter(movie_actor::Column::MovieId.eq(model.id))
        .find_also_related(actor::Entity)
        .order_by_asc(movie_actor::Column::ActorId)
        .all(db)
        .await?;
    let actors = actor_rows
        .into_iter()
        .filter_map(|(_, a)| a.map(ActorResponse::from))
        .collect();

    let image = image_url(model.id, model.image.as_deref());

    Ok(MovieDetailResponse {
        id: model.id,
        title: model.title,
        description: model.description,
        duration: model.duration,
        genres,
        actors,
        image,
        created_at: model.created_at,
    })
}

/// Batch-load flattened genre/actor names for the listing (no per-movie queries).
async fn load_flattened_names<C: ConnectionTrait>(
    db: &C,
    movie_ids: &[i32],
) -> Result<(HashMap<i32, Vec<String>>, HashMap<i32, Vec<String>>), AppError> {
    let mut genre_names: HashMap<i32, Vec<String>> = HashMap::new();
    let mut actor_names: HashMap<i32, Vec<String>> = HashMap::new();
    if movie_ids.is_empty() {
        return Ok((genre_names, actor_names));
    }

    let genre_rows = movie_genre::Entity::find()
        .filter(movie_genre::Column::MovieId.is_in(movie_ids.to_vec()))
        .find_also_related(genre::Entity)
        .order_by_asc(movie_genre::Column::GenreId)
        .all(db)
        .await?;
    for (link, g) in genre_rows {
        if let Some(g) = g {
            genre_names.entry(link.movie_id).or_default().push(g.name);
        }
    }

    let actor_rows = movie_actor::Entity::find()
        .filter(movie_actor::Column::MovieId.is_in(movie_ids.to_vec()))
        .find_also_related(actor::Entity)
        .order_by_asc(movie_actor::Column::ActorId)
        .all(db)
        .await?;
    for (link, a) in actor_rows {
        if let Some(a) = a {
            actor_names
                .entry(link.movie_id)
                .or_default()
                .push(format!("{} {}", a.first_name, a.last_name));
        }
    }

    Ok((genre_names, actor_names))
}
