//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use chrono_tz::Tz;
use thiserror::Error;
use time::Date;

use crate::domain::entities::{AuthorWithUser, PostRecord, PostWithAuthor};
use crate::domain::types::{DateGranularity, DateRange};

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("resource not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("integrity error: {message}")]
    Integrity { message: String },
    #[error("database timeout")]
    Timeout,
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// Narrowing applied to post listings. Results are always newest first.
#[derive(Debug, Clone, Default)]
pub struct PostQueryFilter {
    pub published: Option<bool>,
    pub author_id: Option<i64>,
    pub search: Option<String>,
    pub created: Option<DateRange>,
    pub limit: Option<u32>,
}

impl PostQueryFilter {
    /// Publicly visible posts only.
    pub fn published() -> Self {
        Self {
            published: Some(true),
            ..Self::default()
        }
    }
}

/// Narrowing applied to author listings. Results are ordered by first and last name.
#[derive(Debug, Clone, Default)]
pub struct AuthorQueryFilter {
    pub search: Option<String>,
    pub created: Option<DateRange>,
}

/// Post count for one `created_at` bucket of the date hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateBucket {
    pub date: Date,
    pub count: u64,
}

#[derive(Debug, Clone)]
pub struct CreateAuthorParams {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bio: String,
}

#[derive(Debug, Clone)]
pub struct UpdateAuthorParams {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bio: String,
}

#[derive(Debug, Clone)]
pub struct CreatePostParams {
    pub title: String,
    pub content: String,
    pub published: bool,
    pub author_id: i64,
}

#[derive(Debug, Clone)]
pub struct UpdatePostParams {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub author_id: i64,
}

#[async_trait]
pub trait PostsRepo: Send + Sync {
    /// Posts joined with their author and user in a single statement.
    async fn list_posts(&self, filter: &PostQueryFilter) -> Result<Vec<PostWithAuthor>, RepoError>;

    /// Post rows alone, for pages that already hold the author.
    async fn list_post_records(&self, filter: &PostQueryFilter)
    -> Result<Vec<PostRecord>, RepoError>;

    async fn count_posts(&self, filter: &PostQueryFilter) -> Result<u64, RepoError>;

    async fn list_date_buckets(
        &self,
        filter: &PostQueryFilter,
        granularity: DateGranularity,
        tz: Tz,
    ) -> Result<Vec<DateBucket>, RepoError>;

    async fn find_post(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError>;
}

#[async_trait]
pub trait PostsWriteRepo: Send + Sync {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError>;

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError>;

    async fn delete_post(&self, id: i64) -> Result<(), RepoError>;
}

#[async_trait]
pub trait AuthorsRepo: Send + Sync {
    async fn list_authors(
        &self,
        filter: &AuthorQueryFilter,
    ) -> Result<Vec<AuthorWithUser>, RepoError>;

    async fn count_authors(&self, filter: &AuthorQueryFilter) -> Result<u64, RepoError>;

    async fn find_author(&self, id: i64) -> Result<Option<AuthorWithUser>, RepoError>;
}

#[async_trait]
pub trait AuthorsWriteRepo: Send + Sync {
    /// Inserts the user identity and the author in one transaction.
    async fn create_author(&self, params: CreateAuthorParams)
    -> Result<AuthorWithUser, RepoError>;

    async fn update_author(&self, params: UpdateAuthorParams)
    -> Result<AuthorWithUser, RepoError>;

    /// Removes the user identity; the author and its posts cascade.
    async fn delete_author(&self, id: i64) -> Result<(), RepoError>;
}

/// Split a search query into lowercase terms; every term must match.
pub fn search_terms(search: Option<&str>) -> Vec<String> {
    search
        .map(|value| {
            value
                .split_whitespace()
                .map(|term| term.to_lowercase())
                .collect()
        })
        .unwrap_or_default()
}
