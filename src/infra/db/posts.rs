use async_trait::async_trait;
use chrono_tz::Tz;
use sqlx::QueryBuilder;

use crate::application::repos::{
    CreatePostParams, DateBucket, PostQueryFilter, PostsRepo, PostsWriteRepo, RepoError,
    UpdatePostParams,
};
use crate::domain::entities::{PostRecord, PostWithAuthor};
use crate::domain::types::DateGranularity;

use super::PostgresRepositories;
use super::map_sqlx_error;
use super::types::{
    DateBucketRow, JOINED_AUTHOR_COLUMNS, POST_COLUMNS, PostRow, PostWithAuthorRow,
};
use super::util::convert_count;

const POST_RETURNING: &str = "RETURNING id, title, content, published, created_at, author_id";

impl PostgresRepositories {
    fn joined_posts_query() -> QueryBuilder<'static, sqlx::Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(", ");
        qb.push(JOINED_AUTHOR_COLUMNS);
        qb.push(
            " FROM posts p \
             INNER JOIN authors a ON a.id = p.author_id \
             INNER JOIN users u ON u.id = a.user_id \
             WHERE 1=1",
        );
        qb
    }
}

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_posts(&self, filter: &PostQueryFilter) -> Result<Vec<PostWithAuthor>, RepoError> {
        let mut qb = Self::joined_posts_query();
        Self::apply_post_filter(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC");

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }

        let rows = qb
            .build_query_as::<PostWithAuthorRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostWithAuthor::from).collect())
    }

    async fn list_post_records(
        &self,
        filter: &PostQueryFilter,
    ) -> Result<Vec<PostRecord>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(POST_COLUMNS);
        qb.push(" FROM posts p WHERE 1=1");
        Self::apply_post_filter(&mut qb, filter);
        qb.push(" ORDER BY p.created_at DESC, p.id DESC");

        if let Some(limit) = filter.limit {
            qb.push(" LIMIT ");
            qb.push_bind(i64::from(limit));
        }

        let rows = qb
            .build_query_as::<PostRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn count_posts(&self, filter: &PostQueryFilter) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM posts p WHERE 1=1");
        Self::apply_post_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(count)
    }

    async fn list_date_buckets(
        &self,
        filter: &PostQueryFilter,
        granularity: DateGranularity,
        tz: Tz,
    ) -> Result<Vec<DateBucket>, RepoError> {
        let mut qb = QueryBuilder::new("SELECT date_trunc(");
        qb.push_bind(granularity.as_str());
        qb.push(", p.created_at AT TIME ZONE ");
        qb.push_bind(tz.name());
        qb.push(")::date AS bucket, COUNT(*) AS count FROM posts p WHERE 1=1");
        Self::apply_post_filter(&mut qb, filter);
        qb.push(" GROUP BY 1 ORDER BY 1");

        let rows = qb
            .build_query_as::<DateBucketRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(DateBucket::try_from).collect()
    }

    async fn find_post(&self, id: i64) -> Result<Option<PostWithAuthor>, RepoError> {
        let mut qb = Self::joined_posts_query();
        qb.push(" AND p.id = ");
        qb.push_bind(id);

        let row = qb
            .build_query_as::<PostWithAuthorRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(PostWithAuthor::from))
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            title,
            content,
            published,
            author_id,
        } = params;

        let sql = format!(
            "INSERT INTO posts (title, content, published, author_id) \
             VALUES ($1, $2, $3, $4) {POST_RETURNING}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(title)
            .bind(content)
            .bind(published)
            .bind(author_id)
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            content,
            published,
            author_id,
        } = params;

        let sql = format!(
            "UPDATE posts SET title = $2, content = $3, published = $4, author_id = $5 \
             WHERE id = $1 {POST_RETURNING}"
        );

        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(id)
            .bind(title)
            .bind(content)
            .bind(published)
            .bind(author_id)
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
