use std::sync::Arc;

use chrono_tz::Tz;
use thiserror::Error;
use time::OffsetDateTime;

use crate::application::repos::{
    AuthorQueryFilter, AuthorsRepo, CreatePostParams, DateBucket, PostQueryFilter, PostsRepo,
    PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::{AuthorWithUser, PostRecord, PostWithAuthor};
use crate::domain::types::{
    DateGranularity, DateHierarchySelection, DateRange, DateRangeFilter, PublishedFilter,
};

#[derive(Debug, Error)]
pub enum AdminPostError {
    #[error("author {0} does not exist")]
    UnknownAuthor(i64),
    #[error("post not found")]
    NotFound,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// List-view state parsed from the query string.
#[derive(Debug, Clone, Default)]
pub struct AdminPostQuery {
    pub search: Option<String>,
    pub published: PublishedFilter,
    pub created: DateRangeFilter,
    pub author_id: Option<i64>,
    pub hierarchy: DateHierarchySelection,
}

impl AdminPostQuery {
    /// The date-range filter and the hierarchy selection both narrow `created_at`.
    pub fn to_filter(&self, now: OffsetDateTime, tz: Tz) -> PostQueryFilter {
        PostQueryFilter {
            published: self.published.as_bool(),
            author_id: self.author_id,
            search: self.search.clone(),
            created: DateRange::intersect(self.created.resolve(now, tz), self.hierarchy.resolve(tz)),
            limit: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminPostListing {
    pub posts: Vec<PostWithAuthor>,
    pub total: u64,
    pub published: u64,
    /// Next drill-down level, `None` once a single day is selected.
    pub granularity: Option<DateGranularity>,
    pub buckets: Vec<DateBucket>,
    pub authors: Vec<AuthorWithUser>,
}

#[derive(Debug, Clone)]
pub struct PostCommand {
    pub title: String,
    pub content: String,
    pub published: bool,
    pub author_id: i64,
}

#[derive(Clone)]
pub struct AdminPostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    authors: Arc<dyn AuthorsRepo>,
    timezone: Tz,
}

impl AdminPostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        authors: Arc<dyn AuthorsRepo>,
        timezone: Tz,
    ) -> Self {
        Self {
            reader,
            writer,
            authors,
            timezone,
        }
    }

    pub async fn list(&self, query: &AdminPostQuery) -> Result<AdminPostListing, AdminPostError> {
        let filter = query.to_filter(OffsetDateTime::now_utc(), self.timezone);
        let granularity = query.hierarchy.next_granularity();
        let total_filter = PostQueryFilter::default();
        let published_filter = PostQueryFilter::published();
        let author_filter = AuthorQueryFilter::default();

        let buckets_fut = async {
            match granularity {
                Some(granularity) => {
                    self.reader
                        .list_date_buckets(&filter, granularity, self.timezone)
                        .await
                }
                None => Ok(Vec::new()),
            }
        };

        let (posts, total, published, buckets, authors) = tokio::try_join!(
            self.reader.list_posts(&filter),
            self.reader.count_posts(&total_filter),
            self.reader.count_posts(&published_filter),
            buckets_fut,
            self.authors.list_authors(&author_filter)
        )?;

        Ok(AdminPostListing {
            posts,
            total,
            published,
            granularity,
            buckets,
            authors,
        })
    }

    /// Authors offered by the post form's author select.
    pub async fn author_choices(&self) -> Result<Vec<AuthorWithUser>, AdminPostError> {
        self.authors
            .list_authors(&AuthorQueryFilter::default())
            .await
            .map_err(AdminPostError::from)
    }

    pub async fn load_post(&self, id: i64) -> Result<PostWithAuthor, AdminPostError> {
        self.reader
            .find_post(id)
            .await?
            .ok_or(AdminPostError::NotFound)
    }

    pub async fn create_post(&self, command: PostCommand) -> Result<PostRecord, AdminPostError> {
        self.ensure_author(command.author_id).await?;
        let author_id = command.author_id;

        let params = CreatePostParams {
            title: command.title,
            content: command.content,
            published: command.published,
            author_id,
        };

        let post = self
            .writer
            .create_post(params)
            .await
            .map_err(|err| write_failure(err, author_id))?;

        tracing::info!(
            target = "jotter::admin::posts",
            post_id = post.id,
            author_id = post.author_id,
            published = post.published,
            "post created"
        );

        Ok(post)
    }

    pub async fn update_post(
        &self,
        id: i64,
        command: PostCommand,
    ) -> Result<PostRecord, AdminPostError> {
        self.ensure_author(command.author_id).await?;
        let author_id = command.author_id;

        let params = UpdatePostParams {
            id,
            title: command.title,
            content: command.content,
            published: command.published,
            author_id,
        };

        let post = self
            .writer
            .update_post(params)
            .await
            .map_err(|err| write_failure(err, author_id))?;

        tracing::info!(
            target = "jotter::admin::posts",
            post_id = post.id,
            published = post.published,
            "post updated"
        );

        Ok(post)
    }

    pub async fn delete_post(&self, id: i64) -> Result<(), AdminPostError> {
        self.writer.delete_post(id).await.map_err(|err| match err {
            RepoError::NotFound => AdminPostError::NotFound,
            other => AdminPostError::Repo(other),
        })?;

        tracing::info!(target = "jotter::admin::posts", post_id = id, "post deleted");

        Ok(())
    }

    async fn ensure_author(&self, author_id: i64) -> Result<(), AdminPostError> {
        match self.authors.find_author(author_id).await? {
            Some(_) => Ok(()),
            None => Err(AdminPostError::UnknownAuthor(author_id)),
        }
    }
}

fn write_failure(err: RepoError, author_id: i64) -> AdminPostError {
    match err {
        RepoError::NotFound => AdminPostError::NotFound,
        // The author may vanish between the existence check and the write.
        RepoError::InvalidInput { .. } | RepoError::Integrity { .. } => {
            AdminPostError::UnknownAuthor(author_id)
        }
        other => AdminPostError::Repo(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use time::macros::datetime;

    use crate::domain::entities::{AuthorRecord, UserRecord};

    #[derive(Default)]
    struct StubRepo {
        authors: Vec<AuthorWithUser>,
        posts: Mutex<Vec<PostRecord>>,
        last_filter: Mutex<Option<PostQueryFilter>>,
        bucket_calls: Mutex<Vec<DateGranularity>>,
    }

    #[async_trait]
    impl PostsRepo for StubRepo {
        async fn list_posts(
            &self,
            filter: &PostQueryFilter,
        ) -> Result<Vec<PostWithAuthor>, RepoError> {
            *self.last_filter.lock().unwrap() = Some(filter.clone());
            Ok(Vec::new())
        }

        async fn list_post_records(
            &self,
            _filter: &PostQueryFilter,
        ) -> Result<Vec<PostRecord>, RepoError> {
            Ok(self.posts.lock().unwrap().clone())
        }

        async fn count_posts(&self, filter: &PostQueryFilter) -> Result<u64, RepoError> {
            let posts = self.posts.lock().unwrap();
            Ok(posts
                .iter()
                .filter(|post| filter.published.is_none_or(|flag| post.published == flag))
                .count() as u64)
        }

        async fn list_date_buckets(
            &self,
            _filter: &PostQueryFilter,
            granularity: DateGranularity,
            _tz: Tz,
        ) -> Result<Vec<DateBucket>, RepoError> {
            self.bucket_calls.lock().unwrap().push(granularity);
            Ok(Vec::new())
        }

        async fn find_post(&self, _id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
            Ok(None)
        }
    }

    #[async_trait]
    impl PostsWriteRepo for StubRepo {
        async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
            let mut posts = self.posts.lock().unwrap();
            let post = PostRecord {
                id: posts.len() as i64 + 1,
                title: params.title,
                content: params.content,
                published: params.published,
                created_at: OffsetDateTime::UNIX_EPOCH,
                author_id: params.author_id,
            };
            posts.push(post.clone());
            Ok(post)
        }

        async fn update_post(&self, _params: UpdatePostParams) -> Result<PostRecord, RepoError> {
            Err(RepoError::NotFound)
        }

        async fn delete_post(&self, _id: i64) -> Result<(), RepoError> {
            Err(RepoError::NotFound)
        }
    }

    #[async_trait]
    impl AuthorsRepo for StubRepo {
        async fn list_authors(
            &self,
            _filter: &AuthorQueryFilter,
        ) -> Result<Vec<AuthorWithUser>, RepoError> {
            Ok(self.authors.clone())
        }

        async fn count_authors(&self, _filter: &AuthorQueryFilter) -> Result<u64, RepoError> {
            Ok(self.authors.len() as u64)
        }

        async fn find_author(&self, id: i64) -> Result<Option<AuthorWithUser>, RepoError> {
            Ok(self
                .authors
                .iter()
                .find(|author| author.author.id == id)
                .cloned())
        }
    }

    fn author(id: i64) -> AuthorWithUser {
        AuthorWithUser {
            author: AuthorRecord {
                id,
                user_id: id,
                bio: String::new(),
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
            user: UserRecord {
                id,
                username: format!("author{id}"),
                first_name: String::new(),
                last_name: String::new(),
                email: String::new(),
                date_joined: OffsetDateTime::UNIX_EPOCH,
            },
        }
    }

    fn service() -> (AdminPostService, Arc<StubRepo>) {
        let repo = Arc::new(StubRepo {
            authors: vec![author(1)],
            ..StubRepo::default()
        });
        let service = AdminPostService::new(repo.clone(), repo.clone(), repo.clone(), Tz::UTC);
        (service, repo)
    }

    fn command(author_id: i64) -> PostCommand {
        PostCommand {
            title: "Hello".into(),
            content: "World".into(),
            published: true,
            author_id,
        }
    }

    #[tokio::test]
    async fn create_post_requires_existing_author() {
        let (service, repo) = service();

        let err = service.create_post(command(7)).await.unwrap_err();
        assert!(matches!(err, AdminPostError::UnknownAuthor(7)));
        assert!(repo.posts.lock().unwrap().is_empty());

        let post = service.create_post(command(1)).await.unwrap();
        assert_eq!(post.author_id, 1);
        assert!(post.published);
    }

    #[tokio::test]
    async fn update_and_delete_of_missing_post_are_not_found() {
        let (service, _) = service();

        assert!(matches!(
            service.update_post(3, command(1)).await.unwrap_err(),
            AdminPostError::NotFound
        ));
        assert!(matches!(
            service.delete_post(3).await.unwrap_err(),
            AdminPostError::NotFound
        ));
    }

    #[tokio::test]
    async fn list_reports_counts_and_next_granularity() {
        let (service, repo) = service();
        service.create_post(command(1)).await.unwrap();
        service
            .create_post(PostCommand {
                published: false,
                ..command(1)
            })
            .await
            .unwrap();

        let query = AdminPostQuery {
            hierarchy: DateHierarchySelection::from_parts(Some(2024), None, None),
            ..AdminPostQuery::default()
        };
        let listing = service.list(&query).await.unwrap();

        assert_eq!(listing.total, 2);
        assert_eq!(listing.published, 1);
        assert_eq!(listing.granularity, Some(DateGranularity::Month));
        assert_eq!(
            *repo.bucket_calls.lock().unwrap(),
            vec![DateGranularity::Month]
        );
    }

    #[tokio::test]
    async fn day_selection_skips_bucket_query() {
        let (service, repo) = service();
        let query = AdminPostQuery {
            hierarchy: DateHierarchySelection::from_parts(Some(2024), Some(5), Some(17)),
            ..AdminPostQuery::default()
        };

        let listing = service.list(&query).await.unwrap();

        assert!(listing.granularity.is_none());
        assert!(repo.bucket_calls.lock().unwrap().is_empty());
        let filter = repo.last_filter.lock().unwrap().clone().expect("filter");
        let range = filter.created.expect("range");
        assert_eq!(range.start, datetime!(2024-05-17 00:00 UTC));
        assert_eq!(range.end, datetime!(2024-05-18 00:00 UTC));
    }

    #[test]
    fn filters_combine_into_query() {
        let query = AdminPostQuery {
            search: Some("rust".into()),
            published: PublishedFilter::No,
            created: DateRangeFilter::ThisMonth,
            author_id: Some(4),
            hierarchy: DateHierarchySelection::from_parts(Some(2025), Some(6), None),
        };

        let now = datetime!(2025-06-20 10:00 UTC);
        let filter = query.to_filter(now, Tz::UTC);

        assert_eq!(filter.published, Some(false));
        assert_eq!(filter.author_id, Some(4));
        assert_eq!(filter.search.as_deref(), Some("rust"));
        let range = filter.created.expect("range");
        assert_eq!(range.start, datetime!(2025-06-01 00:00 UTC));
        assert_eq!(range.end, datetime!(2025-07-01 00:00 UTC));
    }

    #[test]
    fn disjoint_date_filters_yield_empty_range() {
        let query = AdminPostQuery {
            created: DateRangeFilter::Today,
            hierarchy: DateHierarchySelection::from_parts(Some(2020), None, None),
            ..AdminPostQuery::default()
        };

        let filter = query.to_filter(datetime!(2025-06-20 10:00 UTC), Tz::UTC);
        let range = filter.created.expect("range");
        assert!(range.start >= range.end);
    }
}
