use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    extract::{Path, State},
    http::{Request, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono_tz::Tz;

use crate::{
    application::{
        blog::{BlogError, BlogService},
        chrome::ChromeService,
        error::HttpError,
    },
    infra::db::PostgresRepositories,
    presentation::views::{
        AuthorCard, AuthorDetailTemplate, AuthorDetailView, AuthorListTemplate, AuthorListView,
        HomeTemplate, LayoutChrome, LayoutContext, PostCard, PostDetailTemplate, PostDetailView,
        PostListTemplate, PostListView, render_not_found_response, render_template_response,
    },
};

use super::{
    db_health_response,
    middleware::{log_responses, set_request_context},
    parse_id,
};

#[derive(Clone)]
pub struct HttpState {
    pub blog: Arc<BlogService>,
    pub chrome: Arc<ChromeService>,
    pub db: Arc<PostgresRepositories>,
    pub timezone: Tz,
}

pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/posts", get(post_list))
        .route("/posts/{post_id}", get(post_detail))
        .route("/authors", get(author_list))
        .route("/authors/{author_id}", get(author_detail))
        .route("/_health/db", get(public_health))
        .fallback(fallback)
        .with_state(state)
        .layer(middleware::from_fn(log_responses))
        .layer(middleware::from_fn(set_request_context))
}

async fn home(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome.load("/");

    match state.blog.home().await {
        Ok(context) => {
            let content = PostListView {
                heading: "Latest posts".to_string(),
                posts: cards(&context.posts, state.timezone),
                show_all_link: true,
            };
            let view = LayoutContext::new(chrome, content);
            render_template_response(HomeTemplate { view }, StatusCode::OK)
        }
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn post_list(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome.load("/posts");

    match state.blog.post_list().await {
        Ok(context) => {
            let content = PostListView {
                heading: "All posts".to_string(),
                posts: cards(&context.posts, state.timezone),
                show_all_link: false,
            };
            let view = LayoutContext::new(chrome.with_title("Posts"), content);
            render_template_response(PostListTemplate { view }, StatusCode::OK)
        }
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn post_detail(State(state): State<HttpState>, Path(post_id): Path<String>) -> Response {
    let chrome = state.chrome.load("/posts");
    let Some(post_id) = parse_id(&post_id) else {
        return render_not_found_response(chrome);
    };

    match state.blog.post_detail(post_id).await {
        Ok(context) => {
            let content = PostDetailView::new(&context.post, state.timezone);
            let chrome = chrome.with_title(&content.title);
            let view = LayoutContext::new(chrome, content);
            render_template_response(PostDetailTemplate { view }, StatusCode::OK)
        }
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn author_list(State(state): State<HttpState>) -> Response {
    let chrome = state.chrome.load("/authors");

    match state.blog.author_list().await {
        Ok(context) => {
            let content = AuthorListView {
                authors: context.authors.iter().map(AuthorCard::from).collect(),
            };
            let view = LayoutContext::new(chrome.with_title("Authors"), content);
            render_template_response(AuthorListTemplate { view }, StatusCode::OK)
        }
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn author_detail(
    State(state): State<HttpState>,
    Path(author_id): Path<String>,
) -> Response {
    let chrome = state.chrome.load("/authors");
    let Some(author_id) = parse_id(&author_id) else {
        return render_not_found_response(chrome);
    };

    match state.blog.author_detail(author_id).await {
        Ok(context) => {
            let posts = context
                .posts
                .iter()
                .map(|post| PostCard::new(post, &context.author, state.timezone))
                .collect();
            let content = AuthorDetailView {
                author: AuthorCard::from(&context.author),
                posts,
            };
            let chrome = chrome.with_title(&content.author.name);
            let view = LayoutContext::new(chrome, content);
            render_template_response(AuthorDetailTemplate { view }, StatusCode::OK)
        }
        Err(err) => blog_error_to_response(err, chrome),
    }
}

async fn fallback(State(state): State<HttpState>, request: Request<Body>) -> Response {
    let chrome = state.chrome.load(request.uri().path());
    render_not_found_response(chrome)
}

async fn public_health(State(state): State<HttpState>) -> Response {
    db_health_response(state.db.health_check().await)
}

fn cards(posts: &[crate::domain::entities::PostWithAuthor], tz: Tz) -> Vec<PostCard> {
    posts
        .iter()
        .map(|entry| PostCard::from_joined(entry, tz))
        .collect()
}

fn blog_error_to_response(err: BlogError, chrome: LayoutChrome) -> Response {
    match err {
        BlogError::NotFound { .. } => render_not_found_response(chrome),
        other => HttpError::from(other).into_response(),
    }
}
