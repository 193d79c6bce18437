use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;

use crate::application::repos::{
    AuthorQueryFilter, AuthorsRepo, AuthorsWriteRepo, CreateAuthorParams, RepoError,
    UpdateAuthorParams,
};
use crate::domain::entities::{AuthorRecord, AuthorWithUser, UserRecord};

use super::PostgresRepositories;
use super::map_sqlx_error;
use super::types::{AUTHOR_COLUMNS, AuthorOnlyRow, AuthorRow, UserRow};
use super::util::convert_count;

const USER_RETURNING: &str = "RETURNING id, username, first_name, last_name, email, date_joined";
const AUTHOR_RETURNING: &str = "RETURNING id, user_id, bio, created_at";

impl PostgresRepositories {
    fn authors_query() -> QueryBuilder<'static, sqlx::Postgres> {
        let mut qb = QueryBuilder::new("SELECT ");
        qb.push(AUTHOR_COLUMNS);
        qb.push(" FROM authors a INNER JOIN users u ON u.id = a.user_id WHERE 1=1");
        qb
    }
}

#[async_trait]
impl AuthorsRepo for PostgresRepositories {
    async fn list_authors(
        &self,
        filter: &AuthorQueryFilter,
    ) -> Result<Vec<AuthorWithUser>, RepoError> {
        let mut qb = Self::authors_query();
        Self::apply_author_filter(&mut qb, filter);
        qb.push(" ORDER BY u.first_name ASC, u.last_name ASC, a.id ASC");

        let rows = qb
            .build_query_as::<AuthorRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(AuthorWithUser::from).collect())
    }

    async fn count_authors(&self, filter: &AuthorQueryFilter) -> Result<u64, RepoError> {
        let mut qb = QueryBuilder::new(
            "SELECT COUNT(*) FROM authors a INNER JOIN users u ON u.id = a.user_id WHERE 1=1",
        );
        Self::apply_author_filter(&mut qb, filter);

        let count: i64 = qb
            .build_query_scalar()
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        convert_count(count)
    }

    async fn find_author(&self, id: i64) -> Result<Option<AuthorWithUser>, RepoError> {
        let mut qb = Self::authors_query();
        qb.push(" AND a.id = ");
        qb.push_bind(id);

        let row = qb
            .build_query_as::<AuthorRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(AuthorWithUser::from))
    }
}

#[async_trait]
impl AuthorsWriteRepo for PostgresRepositories {
    async fn create_author(
        &self,
        params: CreateAuthorParams,
    ) -> Result<AuthorWithUser, RepoError> {
        let CreateAuthorParams {
            username,
            first_name,
            last_name,
            email,
            bio,
        } = params;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let user_sql = format!(
            "INSERT INTO users (username, first_name, last_name, email, date_joined) \
             VALUES ($1, $2, $3, $4, $5) {USER_RETURNING}"
        );
        let user = sqlx::query_as::<_, UserRow>(&user_sql)
            .bind(username)
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .bind(OffsetDateTime::now_utc())
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        let author_sql =
            format!("INSERT INTO authors (user_id, bio) VALUES ($1, $2) {AUTHOR_RETURNING}");
        let author = sqlx::query_as::<_, AuthorOnlyRow>(&author_sql)
            .bind(user.id)
            .bind(bio)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(AuthorWithUser {
            author: AuthorRecord::from(author),
            user: UserRecord::from(user),
        })
    }

    async fn update_author(
        &self,
        params: UpdateAuthorParams,
    ) -> Result<AuthorWithUser, RepoError> {
        let UpdateAuthorParams {
            id,
            username,
            first_name,
            last_name,
            email,
            bio,
        } = params;

        let mut tx = self.begin().await.map_err(map_sqlx_error)?;

        let author_sql = format!("UPDATE authors SET bio = $2 WHERE id = $1 {AUTHOR_RETURNING}");
        let author = sqlx::query_as::<_, AuthorOnlyRow>(&author_sql)
            .bind(id)
            .bind(bio)
            .fetch_optional(&mut *tx)
            .await
            .map_err(map_sqlx_error)?
            .ok_or(RepoError::NotFound)?;

        let user_sql = format!(
            "UPDATE users SET username = $2, first_name = $3, last_name = $4, email = $5 \
             WHERE id = $1 {USER_RETURNING}"
        );
        let user = sqlx::query_as::<_, UserRow>(&user_sql)
            .bind(author.user_id)
            .bind(username)
            .bind(first_name)
            .bind(last_name)
            .bind(email)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        Ok(AuthorWithUser {
            author: AuthorRecord::from(author),
            user: UserRecord::from(user),
        })
    }

    async fn delete_author(&self, id: i64) -> Result<(), RepoError> {
        let result =
            sqlx::query("DELETE FROM users WHERE id = (SELECT user_id FROM authors WHERE id = $1)")
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
