mod authors;
mod dashboard;
mod posts;
mod shared;
mod state;

pub use state::AdminState;

use axum::{
    Router,
    extract::State,
    middleware,
    response::Response,
    routing::{get, post},
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
};

pub fn build_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/", get(dashboard::admin_dashboard))
        .route("/authors", get(authors::admin_authors))
        .route("/authors/new", get(authors::admin_author_new))
        .route("/authors/create", post(authors::admin_author_create))
        .route(
            "/authors/{id}/edit",
            get(authors::admin_author_edit).post(authors::admin_author_update),
        )
        .route("/authors/{id}/delete", post(authors::admin_author_delete))
        .route("/posts", get(posts::admin_posts))
        .route("/posts/new", get(posts::admin_post_new))
        .route("/posts/create", post(posts::admin_post_create))
        .route(
            "/posts/{id}/edit",
            get(posts::admin_post_edit).post(posts::admin_post_update),
        )
        .route("/posts/{id}/delete", post(posts::admin_post_delete))
        .route("/_health/db", get(admin_health))
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn admin_health(State(state): State<AdminState>) -> Response {
    db_health_response(state.db.health_check().await)
}
