use std::collections::HashSet;

use sqlx::PgPool;

async fn index_names(pool: &PgPool, table: &str) -> HashSet<String> {
    let rows: Vec<String> = sqlx::query_scalar(
        "SELECT indexname FROM pg_indexes WHERE schemaname = 'public' AND tablename = $1",
    )
    .bind(table)
    .fetch_all(pool)
    .await
    .expect("fetch indexes");

    rows.into_iter().collect()
}

#[sqlx::test(migrations = "./migrations")]
async fn post_listing_indexes_exist(pool: PgPool) {
    let indexes = index_names(&pool, "posts").await;

    assert!(
        indexes.contains("posts_published_created_at_idx"),
        "missing posts_published_created_at_idx"
    );
    assert!(
        indexes.contains("posts_author_published_created_at_idx"),
        "missing posts_author_published_created_at_idx"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn author_ordering_index_exists(pool: PgPool) {
    let indexes = index_names(&pool, "users").await;

    assert!(
        indexes.contains("users_first_name_last_name_idx"),
        "missing users_first_name_last_name_idx"
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn deleting_a_user_cascades_to_posts(pool: PgPool) {
    let user_id: i64 =
        sqlx::query_scalar("INSERT INTO users (username) VALUES ('ada') RETURNING id")
            .fetch_one(&pool)
            .await
            .expect("insert user");
    let author_id: i64 =
        sqlx::query_scalar("INSERT INTO authors (user_id) VALUES ($1) RETURNING id")
            .bind(user_id)
            .fetch_one(&pool)
            .await
            .expect("insert author");
    sqlx::query("INSERT INTO posts (title, content, author_id) VALUES ('t', 'c', $1)")
        .bind(author_id)
        .execute(&pool)
        .await
        .expect("insert post");

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(&pool)
        .await
        .expect("delete user");

    let remaining: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
        .fetch_one(&pool)
        .await
        .expect("count posts");
    assert_eq!(remaining, 0);
}
