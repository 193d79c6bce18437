use std::sync::Arc;

use axum::http::StatusCode;

use crate::application::error::HttpError;
use crate::application::repos::{
    AuthorQueryFilter, AuthorsRepo, PostQueryFilter, PostsRepo, RepoError,
};
use crate::presentation::admin::views::{AdminDashboardView, AdminMetricView};

const SOURCE: &str = "application::admin::dashboard::AdminDashboardService";

#[derive(Clone)]
pub struct AdminDashboardService {
    posts: Arc<dyn PostsRepo>,
    authors: Arc<dyn AuthorsRepo>,
}

impl AdminDashboardService {
    pub fn new(posts: Arc<dyn PostsRepo>, authors: Arc<dyn AuthorsRepo>) -> Self {
        Self { posts, authors }
    }

    pub async fn overview(&self) -> Result<AdminDashboardView, HttpError> {
        let all_posts = PostQueryFilter::default();
        let published_posts = PostQueryFilter::published();
        let all_authors = AuthorQueryFilter::default();

        let (authors, posts, published) = tokio::try_join!(
            self.authors.count_authors(&all_authors),
            self.posts.count_posts(&all_posts),
            self.posts.count_posts(&published_posts),
        )
        .map_err(repo_failure)?;

        let metrics = vec![
            AdminMetricView {
                label: "Authors".to_string(),
                value: authors,
                href: "/authors".to_string(),
                hint: None,
            },
            AdminMetricView {
                label: "Posts".to_string(),
                value: posts,
                href: "/posts".to_string(),
                hint: None,
            },
            AdminMetricView {
                label: "Published".to_string(),
                value: published,
                href: "/posts?published=yes".to_string(),
                hint: Some(format!("{} unpublished", posts.saturating_sub(published))),
            },
        ];

        Ok(AdminDashboardView {
            title: "Dashboard".to_string(),
            metrics,
            public_site_hint: "Only published posts appear on the public site.".to_string(),
        })
    }
}

fn repo_failure(err: RepoError) -> HttpError {
    HttpError::new(
        SOURCE,
        StatusCode::INTERNAL_SERVER_ERROR,
        "Failed to compute dashboard metrics",
        err.to_string(),
    )
}
