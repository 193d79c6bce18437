use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use sqlx::PgPool;
use time::{Duration, OffsetDateTime};
use tower::ServiceExt;

use jotter::application::blog::BlogService;
use jotter::application::chrome::ChromeService;
use jotter::application::repos::{
    AuthorsRepo, AuthorsWriteRepo, CreateAuthorParams, CreatePostParams, PostsRepo,
    PostsWriteRepo,
};
use jotter::config::SiteSettings;
use jotter::infra::db::PostgresRepositories;
use jotter::infra::http::{HttpState, build_router};

fn build_app(repos: Arc<PostgresRepositories>) -> Router {
    let posts_repo: Arc<dyn PostsRepo> = repos.clone();
    let authors_repo: Arc<dyn AuthorsRepo> = repos.clone();
    let site = SiteSettings::default();

    build_router(HttpState {
        blog: Arc::new(BlogService::new(posts_repo, authors_repo)),
        timezone: site.timezone,
        chrome: Arc::new(ChromeService::new(site)),
        db: repos,
    })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn seed_author(repos: &PostgresRepositories, username: &str, first: &str, last: &str) -> i64 {
    repos
        .create_author(CreateAuthorParams {
            username: username.into(),
            first_name: first.into(),
            last_name: last.into(),
            email: format!("{username}@example.com"),
            bio: format!("{first} writes here."),
        })
        .await
        .expect("create author")
        .author
        .id
}

/// Insert a post and pin its `created_at` to `days_ago` days before now.
async fn seed_post(
    pool: &PgPool,
    repos: &PostgresRepositories,
    author_id: i64,
    title: &str,
    published: bool,
    days_ago: i64,
) -> i64 {
    let post = repos
        .create_post(CreatePostParams {
            title: title.into(),
            content: format!("Body of {title}.\n\nSecond paragraph."),
            published,
            author_id,
        })
        .await
        .expect("create post");

    sqlx::query("UPDATE posts SET created_at = $2 WHERE id = $1")
        .bind(post.id)
        .bind(OffsetDateTime::now_utc() - Duration::days(days_ago))
        .execute(pool)
        .await
        .expect("pin created_at");

    post.id
}

fn position(body: &str, needle: &str) -> usize {
    body.find(needle)
        .unwrap_or_else(|| panic!("`{needle}` missing from page"))
}

#[sqlx::test(migrations = "./migrations")]
async fn home_shows_five_most_recent_published_posts(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool.clone()));
    let author = seed_author(&repos, "ada", "Ada", "Lovelace").await;
    for day in 1..=7 {
        seed_post(&pool, &repos, author, &format!("Entry {day:02}"), true, day).await;
    }
    seed_post(&pool, &repos, author, "Hidden draft", false, 0).await;
    let app = build_app(repos);

    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    for day in 1..=5 {
        assert!(body.contains(&format!("Entry {day:02}")), "entry {day} missing");
    }
    assert!(!body.contains("Entry 06"));
    assert!(!body.contains("Hidden draft"));
    assert!(position(&body, "Entry 01") < position(&body, "Entry 05"));
    assert!(body.contains("Ada Lovelace"));
}

#[sqlx::test(migrations = "./migrations")]
async fn post_list_contains_only_published_posts_newest_first(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool.clone()));
    let author = seed_author(&repos, "ada", "Ada", "Lovelace").await;
    seed_post(&pool, &repos, author, "First light", true, 1).await;
    seed_post(&pool, &repos, author, "Work in progress", false, 2).await;
    seed_post(&pool, &repos, author, "Early notes", true, 3).await;
    let app = build_app(repos);

    let (status, body) = get(&app, "/posts").await;

    assert_eq!(status, StatusCode::OK);
    assert!(position(&body, "First light") < position(&body, "Early notes"));
    assert!(!body.contains("Work in progress"));
}

#[sqlx::test(migrations = "./migrations")]
async fn empty_listings_render_successfully(pool: PgPool) {
    let app = build_app(Arc::new(PostgresRepositories::new(pool)));

    let (status, body) = get(&app, "/posts").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No posts have been published yet."));

    let (status, _) = get(&app, "/authors").await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn post_detail_hides_unpublished_and_missing_posts(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool.clone()));
    let author = seed_author(&repos, "ada", "Ada", "Lovelace").await;
    let published = seed_post(&pool, &repos, author, "Analytical engines", true, 1).await;
    let draft = seed_post(&pool, &repos, author, "Secret draft", false, 1).await;
    let app = build_app(repos);

    let (status, body) = get(&app, &format!("/posts/{published}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Analytical engines"));
    assert!(body.contains("<p>Second paragraph.</p>"));

    let (status, body) = get(&app, &format!("/posts/{draft}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page Not Found"));
    assert!(!body.contains("Secret draft"));

    let (status, _) = get(&app, "/posts/999999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = get(&app, "/posts/not-a-number").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn author_list_is_sorted_by_first_then_last_name(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool));
    seed_author(&repos, "grace", "Grace", "Hopper").await;
    seed_author(&repos, "ada_b", "Ada", "Byron").await;
    seed_author(&repos, "ada_l", "Ada", "Lovelace").await;
    let app = build_app(repos);

    let (status, body) = get(&app, "/authors").await;

    assert_eq!(status, StatusCode::OK);
    let byron = position(&body, "Ada Byron");
    let lovelace = position(&body, "Ada Lovelace");
    let hopper = position(&body, "Grace Hopper");
    assert!(byron < lovelace && lovelace < hopper);
}

#[sqlx::test(migrations = "./migrations")]
async fn author_detail_lists_published_posts_newest_first(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool.clone()));
    let ada = seed_author(&repos, "ada", "Ada", "Lovelace").await;
    let grace = seed_author(&repos, "grace", "Grace", "Hopper").await;
    seed_post(&pool, &repos, ada, "Note P1", true, 1).await;
    seed_post(&pool, &repos, ada, "Note P2", false, 2).await;
    seed_post(&pool, &repos, ada, "Note P3", true, 3).await;
    seed_post(&pool, &repos, grace, "Compilers", true, 1).await;
    let app = build_app(repos);

    let (status, body) = get(&app, &format!("/authors/{ada}")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(position(&body, "Note P1") < position(&body, "Note P3"));
    assert!(!body.contains("Note P2"));
    assert!(!body.contains("Compilers"));

    let (status, body) = get(&app, &format!("/authors/{grace}")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Compilers"));
}

#[sqlx::test(migrations = "./migrations")]
async fn author_without_posts_renders_empty_state(pool: PgPool) {
    let repos = Arc::new(PostgresRepositories::new(pool));
    let author = seed_author(&repos, "quiet", "Quiet", "Writer").await;
    let app = build_app(repos);

    let (status, body) = get(&app, &format!("/authors/{author}")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("has not published anything yet"));
}

#[sqlx::test(migrations = "./migrations")]
async fn missing_author_and_unknown_routes_are_not_found(pool: PgPool) {
    let app = build_app(Arc::new(PostgresRepositories::new(pool)));

    let (status, _) = get(&app, "/authors/424242").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/no/such/page").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("Page Not Found"));
}

#[sqlx::test(migrations = "./migrations")]
async fn health_endpoint_and_request_id(pool: PgPool) {
    let app = build_app(Arc::new(PostgresRepositories::new(pool)));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/_health/db")
                .header("x-request-id", "req-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|value| value.to_str().ok()),
        Some("req-1")
    );
}
