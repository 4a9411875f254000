use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/genres", genre_routes())
        .nest("/actors", actor_routes())
        .nest("/movies", movie_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn genre_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::genre::list_genres,
        handlers::genre::create_genre
    ))
}

fn actor_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(
        handlers::actor::list_actors,
        handlers::actor::create_actor
    ))
}

fn movie_routes() -> OpenApiRouter<AppState> {
    let crud = OpenApiRouter::new()
        .routes(routes!(
            handlers::movie::list_movies,
            handlers::movie::create_movie
        ))
        .routes(routes!(handlers::movie::get_movie))
        .routes(routes!(handlers::movie::get_movie_image));

    let upload = OpenApiRouter::new()
        .routes(routes!(handlers::movie::upload_movie_image))
        .layer(handlers::movie::image_upload_body_limit());

    crud.merge(upload)
}
