//! Postgres-backed repository implementations.

mod authors;
mod posts;
mod types;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use sqlx::{
    Postgres, QueryBuilder, Transaction,
    postgres::{PgPool, PgPoolOptions},
    query,
};

use crate::application::repos::{AuthorQueryFilter, PostQueryFilter, search_terms};
use crate::domain::types::DateRange;

use self::util::contains_pattern;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn begin(&self) -> Result<Transaction<'_, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(pool).await
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    fn apply_created_range(
        qb: &mut QueryBuilder<'_, Postgres>,
        column: &'static str,
        range: Option<DateRange>,
    ) {
        if let Some(range) = range {
            qb.push(" AND ");
            qb.push(column);
            qb.push(" >= ");
            qb.push_bind(range.start);
            qb.push(" AND ");
            qb.push(column);
            qb.push(" < ");
            qb.push_bind(range.end);
        }
    }

    /// Every search term has to match at least one of `columns`.
    fn apply_search_terms(
        qb: &mut QueryBuilder<'_, Postgres>,
        search: Option<&str>,
        columns: &[&'static str],
    ) {
        for term in search_terms(search) {
            let pattern = contains_pattern(&term);
            qb.push(" AND (");
            for (index, column) in columns.iter().enumerate() {
                if index > 0 {
                    qb.push(" OR ");
                }
                qb.push(*column);
                qb.push(" ILIKE ");
                qb.push_bind(pattern.clone());
            }
            qb.push(")");
        }
    }

    fn apply_post_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &PostQueryFilter) {
        if let Some(published) = filter.published {
            qb.push(" AND p.published = ");
            qb.push_bind(published);
        }

        if let Some(author_id) = filter.author_id {
            qb.push(" AND p.author_id = ");
            qb.push_bind(author_id);
        }

        Self::apply_created_range(qb, "p.created_at", filter.created);
        Self::apply_search_terms(qb, filter.search.as_deref(), &["p.title", "p.content"]);
    }

    fn apply_author_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &AuthorQueryFilter) {
        Self::apply_created_range(qb, "a.created_at", filter.created);
        Self::apply_search_terms(
            qb,
            filter.search.as_deref(),
            &["u.first_name", "u.last_name", "u.email"],
        );
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::*;

    #[test]
    fn post_filter_renders_every_condition() {
        let filter = PostQueryFilter {
            published: Some(true),
            author_id: Some(3),
            search: Some("rust async".into()),
            created: Some(DateRange {
                start: datetime!(2025-01-01 00:00 UTC),
                end: datetime!(2026-01-01 00:00 UTC),
            }),
            limit: None,
        };

        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM posts p WHERE 1=1");
        PostgresRepositories::apply_post_filter(&mut qb, &filter);

        assert_eq!(
            qb.sql(),
            "SELECT 1 FROM posts p WHERE 1=1 AND p.published = $1 AND p.author_id = $2 \
             AND p.created_at >= $3 AND p.created_at < $4 \
             AND (p.title ILIKE $5 OR p.content ILIKE $6) \
             AND (p.title ILIKE $7 OR p.content ILIKE $8)"
        );
    }

    #[test]
    fn empty_author_filter_adds_nothing() {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT 1 FROM authors a WHERE 1=1");
        PostgresRepositories::apply_author_filter(&mut qb, &AuthorQueryFilter::default());
        assert_eq!(qb.sql(), "SELECT 1 FROM authors a WHERE 1=1");
    }
}
