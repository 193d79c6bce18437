//! Read-only blog operations backing the public site.

use std::sync::Arc;

use thiserror::Error;

use crate::application::repos::{
    AuthorQueryFilter, AuthorsRepo, PostQueryFilter, PostsRepo, RepoError,
};
use crate::domain::entities::{AuthorWithUser, PostRecord, PostWithAuthor};

/// Number of posts shown on the home page.
pub const HOME_POST_LIMIT: u32 = 5;

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("{entity} not found")]
    NotFound { entity: &'static str },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

#[derive(Debug, Clone)]
pub struct PostListContext {
    pub posts: Vec<PostWithAuthor>,
}

#[derive(Debug, Clone)]
pub struct PostDetailContext {
    pub post: PostWithAuthor,
}

#[derive(Debug, Clone)]
pub struct AuthorListContext {
    pub authors: Vec<AuthorWithUser>,
}

#[derive(Debug, Clone)]
pub struct AuthorDetailContext {
    pub author: AuthorWithUser,
    pub posts: Vec<PostRecord>,
}

#[derive(Clone)]
pub struct BlogService {
    posts: Arc<dyn PostsRepo>,
    authors: Arc<dyn AuthorsRepo>,
}

impl BlogService {
    pub fn new(posts: Arc<dyn PostsRepo>, authors: Arc<dyn AuthorsRepo>) -> Self {
        Self { posts, authors }
    }

    pub async fn home(&self) -> Result<PostListContext, BlogError> {
        let filter = PostQueryFilter {
            limit: Some(HOME_POST_LIMIT),
            ..PostQueryFilter::published()
        };
        let posts = self.posts.list_posts(&filter).await?;
        Ok(PostListContext { posts })
    }

    pub async fn post_list(&self) -> Result<PostListContext, BlogError> {
        let posts = self.posts.list_posts(&PostQueryFilter::published()).await?;
        Ok(PostListContext { posts })
    }

    /// Unpublished posts are indistinguishable from missing ones.
    pub async fn post_detail(&self, post_id: i64) -> Result<PostDetailContext, BlogError> {
        let post = self
            .posts
            .find_post(post_id)
            .await?
            .filter(|post| post.post.published)
            .ok_or(BlogError::NotFound { entity: "post" })?;

        Ok(PostDetailContext { post })
    }

    pub async fn author_list(&self) -> Result<AuthorListContext, BlogError> {
        let authors = self
            .authors
            .list_authors(&AuthorQueryFilter::default())
            .await?;
        Ok(AuthorListContext { authors })
    }

    pub async fn author_detail(&self, author_id: i64) -> Result<AuthorDetailContext, BlogError> {
        let author = self
            .authors
            .find_author(author_id)
            .await?
            .ok_or(BlogError::NotFound { entity: "author" })?;

        let filter = PostQueryFilter {
            author_id: Some(author.author.id),
            ..PostQueryFilter::published()
        };
        let posts = self.posts.list_post_records(&filter).await?;

        Ok(AuthorDetailContext { author, posts })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono_tz::Tz;
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::application::repos::DateBucket;
    use crate::domain::entities::{AuthorRecord, UserRecord};
    use crate::domain::types::DateGranularity;

    #[derive(Default)]
    struct StubStore {
        authors: Vec<AuthorWithUser>,
        posts: Vec<PostRecord>,
        author_lookups: Mutex<usize>,
        joined_listings: Mutex<usize>,
    }

    impl StubStore {
        fn joined(&self, post: &PostRecord) -> PostWithAuthor {
            let author = self
                .authors
                .iter()
                .find(|author| author.author.id == post.author_id)
                .cloned()
                .expect("author exists");
            PostWithAuthor {
                post: post.clone(),
                author,
            }
        }

        fn lookups(&self) -> usize {
            *self.author_lookups.lock().unwrap()
        }

        fn records(&self, filter: &PostQueryFilter) -> Vec<PostRecord> {
            let mut posts: Vec<_> = self
                .posts
                .iter()
                .filter(|post| filter.published.is_none_or(|flag| post.published == flag))
                .filter(|post| filter.author_id.is_none_or(|id| post.author_id == id))
                .cloned()
                .collect();
            posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
            if let Some(limit) = filter.limit {
                posts.truncate(limit as usize);
            }
            posts
        }
    }

    #[async_trait]
    impl PostsRepo for StubStore {
        async fn list_posts(
            &self,
            filter: &PostQueryFilter,
        ) -> Result<Vec<PostWithAuthor>, RepoError> {
            *self.joined_listings.lock().unwrap() += 1;
            Ok(self
                .records(filter)
                .iter()
                .map(|post| self.joined(post))
                .collect())
        }

        async fn list_post_records(
            &self,
            filter: &PostQueryFilter,
        ) -> Result<Vec<PostRecord>, RepoError> {
            Ok(self.records(filter))
        }

        async fn count_posts(&self, filter: &PostQueryFilter) -> Result<u64, RepoError> {
            Ok(self.records(filter).len() as u64)
        }

        async fn list_date_buckets(
            &self,
            _filter: &PostQueryFilter,
            _granularity: DateGranularity,
            _tz: Tz,
        ) -> Result<Vec<DateBucket>, RepoError> {
            Ok(Vec::new())
        }

        async fn find_post(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
            Ok(self
                .posts
                .iter()
                .find(|post| post.id == id)
                .map(|post| self.joined(post)))
        }
    }

    #[async_trait]
    impl AuthorsRepo for StubStore {
        async fn list_authors(
            &self,
            _filter: &AuthorQueryFilter,
        ) -> Result<Vec<AuthorWithUser>, RepoError> {
            let mut authors = self.authors.clone();
            authors.sort_by(|a, b| {
                (&a.user.first_name, &a.user.last_name, a.author.id).cmp(&(
                    &b.user.first_name,
                    &b.user.last_name,
                    b.author.id,
                ))
            });
            Ok(authors)
        }

        async fn count_authors(&self, _filter: &AuthorQueryFilter) -> Result<u64, RepoError> {
            Ok(self.authors.len() as u64)
        }

        async fn find_author(&self, id: i64) -> Result<Option<AuthorWithUser>, RepoError> {
            *self.author_lookups.lock().unwrap() += 1;
            Ok(self
                .authors
                .iter()
                .find(|author| author.author.id == id)
                .cloned())
        }
    }

    fn base_time() -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap()
    }

    fn author(id: i64, first: &str, last: &str) -> AuthorWithUser {
        AuthorWithUser {
            author: AuthorRecord {
                id,
                user_id: id * 10,
                bio: String::new(),
                created_at: base_time(),
            },
            user: UserRecord {
                id: id * 10,
                username: format!("user{id}"),
                first_name: first.into(),
                last_name: last.into(),
                email: String::new(),
                date_joined: base_time(),
            },
        }
    }

    fn post(id: i64, author_id: i64, published: bool, day: i64) -> PostRecord {
        PostRecord {
            id,
            title: format!("Post {id}"),
            content: String::new(),
            published,
            created_at: base_time() + Duration::days(day),
            author_id,
        }
    }

    fn service(store: StubStore) -> (BlogService, Arc<StubStore>) {
        let store = Arc::new(store);
        let service = BlogService::new(store.clone(), store.clone());
        (service, store)
    }

    fn scenario() -> StubStore {
        StubStore {
            authors: vec![author(1, "Ada", "Lovelace"), author(2, "Grace", "Hopper")],
            posts: vec![
                post(1, 1, true, 3),
                post(2, 1, false, 2),
                post(3, 1, true, 1),
                post(4, 2, true, 5),
                post(5, 2, false, 6),
            ],
            ..StubStore::default()
        }
    }

    fn ids(posts: &[PostWithAuthor]) -> Vec<i64> {
        posts.iter().map(|entry| entry.post.id).collect()
    }

    #[tokio::test]
    async fn post_list_returns_published_newest_first() {
        let (service, _) = service(scenario());

        let context = service.post_list().await.unwrap();
        assert_eq!(ids(&context.posts), vec![4, 1, 3]);
        assert!(context.posts.iter().all(|entry| entry.post.published));
    }

    #[tokio::test]
    async fn home_is_a_prefix_of_post_list() {
        let mut store = scenario();
        store
            .posts
            .extend((10..20).map(|id| post(id, 2, true, id)));
        let (service, _) = service(store);

        let home = service.home().await.unwrap();
        let list = service.post_list().await.unwrap();

        assert_eq!(home.posts.len(), HOME_POST_LIMIT as usize);
        assert_eq!(ids(&home.posts), ids(&list.posts[..home.posts.len()]));
    }

    #[tokio::test]
    async fn home_with_no_posts_is_empty() {
        let (service, _) = service(StubStore::default());
        assert!(service.home().await.unwrap().posts.is_empty());
    }

    #[tokio::test]
    async fn unpublished_post_detail_is_not_found() {
        let (service, _) = service(scenario());

        let err = service.post_detail(2).await.unwrap_err();
        assert!(matches!(err, BlogError::NotFound { entity: "post" }));

        let err = service.post_detail(999).await.unwrap_err();
        assert!(matches!(err, BlogError::NotFound { entity: "post" }));

        let detail = service.post_detail(1).await.unwrap();
        assert_eq!(detail.post.author.display_name(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn missing_author_is_not_found() {
        let (service, _) = service(scenario());

        let err = service.author_detail(42).await.unwrap_err();
        assert!(matches!(err, BlogError::NotFound { entity: "author" }));
    }

    #[tokio::test]
    async fn author_detail_lists_only_published_posts() {
        let (service, _) = service(scenario());

        let detail = service.author_detail(1).await.unwrap();
        let post_ids: Vec<_> = detail.posts.iter().map(|post| post.id).collect();
        assert_eq!(post_ids, vec![1, 3]);

        let list = service.post_list().await.unwrap();
        assert!(ids(&list.posts).contains(&1));
        assert!(ids(&list.posts).contains(&3));
        assert!(!ids(&list.posts).contains(&2));
    }

    #[tokio::test]
    async fn author_detail_reads_posts_without_rejoining_the_author() {
        let (service, store) = service(scenario());

        let detail = service.author_detail(2).await.unwrap();

        assert_eq!(detail.author.display_name(), "Grace Hopper");
        assert_eq!(detail.posts.iter().map(|post| post.id).collect::<Vec<_>>(), vec![4]);
        assert_eq!(store.lookups(), 1);
        assert_eq!(*store.joined_listings.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn author_without_posts_has_empty_list() {
        let mut store = scenario();
        store.authors.push(author(3, "Barbara", "Liskov"));
        let (service, _) = service(store);

        let detail = service.author_detail(3).await.unwrap();
        assert!(detail.posts.is_empty());
    }

    #[tokio::test]
    async fn author_list_is_sorted_by_name() {
        let mut store = scenario();
        store.authors.push(author(3, "Ada", "Byron"));
        let (service, _) = service(store);

        let context = service.author_list().await.unwrap();
        let names: Vec<_> = context
            .authors
            .iter()
            .map(AuthorWithUser::display_name)
            .collect();
        assert_eq!(names, vec!["Ada Byron", "Ada Lovelace", "Grace Hopper"]);
    }

    #[tokio::test]
    async fn listings_carry_authors_without_extra_lookups() {
        let (service, store) = service(scenario());

        let context = service.post_list().await.unwrap();
        service.home().await.unwrap();

        assert!(
            context
                .posts
                .iter()
                .all(|entry| entry.author.author.id == entry.post.author_id)
        );
        assert_eq!(store.lookups(), 0);
    }
}
