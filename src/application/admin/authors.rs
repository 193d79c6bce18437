use std::sync::Arc;

use chrono_tz::Tz;
use thiserror::Error;
use time::OffsetDateTime;

use crate::application::repos::{
    AuthorQueryFilter, AuthorsRepo, AuthorsWriteRepo, CreateAuthorParams, RepoError,
    UpdateAuthorParams,
};
use crate::domain::entities::AuthorWithUser;
use crate::domain::types::DateRangeFilter;

#[derive(Debug, Error)]
pub enum AdminAuthorError {
    #[error("{0} must not be empty")]
    ConstraintViolation(&'static str),
    #[error("username `{0}` is already taken")]
    DuplicateUsername(String),
    #[error("author not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// List-view state parsed from the query string.
#[derive(Debug, Clone, Default)]
pub struct AdminAuthorQuery {
    pub search: Option<String>,
    pub created: DateRangeFilter,
}

impl AdminAuthorQuery {
    pub fn to_filter(&self, now: OffsetDateTime, tz: Tz) -> AuthorQueryFilter {
        AuthorQueryFilter {
            search: self.search.clone(),
            created: self.created.resolve(now, tz),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminAuthorListing {
    pub authors: Vec<AuthorWithUser>,
    pub total: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AuthorCommand {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bio: String,
}

impl AuthorCommand {
    fn normalized(self) -> Result<Self, AdminAuthorError> {
        let username = self.username.trim().to_string();
        if username.is_empty() {
            return Err(AdminAuthorError::ConstraintViolation("username"));
        }

        Ok(Self {
            username,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            bio: self.bio,
        })
    }
}

#[derive(Clone)]
pub struct AdminAuthorService {
    reader: Arc<dyn AuthorsRepo>,
    writer: Arc<dyn AuthorsWriteRepo>,
    timezone: Tz,
}

impl AdminAuthorService {
    pub fn new(reader: Arc<dyn AuthorsRepo>, writer: Arc<dyn AuthorsWriteRepo>, timezone: Tz) -> Self {
        Self {
            reader,
            writer,
            timezone,
        }
    }

    pub async fn list(
        &self,
        query: &AdminAuthorQuery,
    ) -> Result<AdminAuthorListing, AdminAuthorError> {
        let filter = query.to_filter(OffsetDateTime::now_utc(), self.timezone);
        let unfiltered = AuthorQueryFilter::default();

        let (authors, total) = tokio::try_join!(
            self.reader.list_authors(&filter),
            self.reader.count_authors(&unfiltered)
        )?;

        Ok(AdminAuthorListing { authors, total })
    }

    pub async fn load_author(&self, id: i64) -> Result<AuthorWithUser, AdminAuthorError> {
        self.reader
            .find_author(id)
            .await?
            .ok_or(AdminAuthorError::NotFound)
    }

    pub async fn create_author(
        &self,
        command: AuthorCommand,
    ) -> Result<AuthorWithUser, AdminAuthorError> {
        let command = command.normalized()?;
        let username = command.username.clone();

        let params = CreateAuthorParams {
            username: command.username,
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            bio: command.bio,
        };

        let author = self
            .writer
            .create_author(params)
            .await
            .map_err(|err| write_failure(err, username))?;

        tracing::info!(
            target = "jotter::admin::authors",
            author_id = author.author.id,
            username = %author.user.username,
            "author created"
        );

        Ok(author)
    }

    pub async fn update_author(
        &self,
        id: i64,
        command: AuthorCommand,
    ) -> Result<AuthorWithUser, AdminAuthorError> {
        let command = command.normalized()?;
        let username = command.username.clone();

        let params = UpdateAuthorParams {
            id,
            username: command.username,
            first_name: command.first_name,
            last_name: command.last_name,
            email: command.email,
            bio: command.bio,
        };

        let author = self
            .writer
            .update_author(params)
            .await
            .map_err(|err| write_failure(err, username))?;

        tracing::info!(
            target = "jotter::admin::authors",
            author_id = author.author.id,
            "author updated"
        );

        Ok(author)
    }

    pub async fn delete_author(&self, id: i64) -> Result<(), AdminAuthorError> {
        self.writer.delete_author(id).await.map_err(|err| match err {
            RepoError::NotFound => AdminAuthorError::NotFound,
            other => AdminAuthorError::Repo(other),
        })?;

        tracing::info!(
            target = "jotter::admin::authors",
            author_id = id,
            "author deleted"
        );

        Ok(())
    }
}

fn write_failure(err: RepoError, username: String) -> AdminAuthorError {
    match err {
        RepoError::Duplicate { .. } => AdminAuthorError::DuplicateUsername(username),
        RepoError::NotFound => AdminAuthorError::NotFound,
        other => AdminAuthorError::Repo(other),
    }
}
