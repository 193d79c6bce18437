use time::{Date, OffsetDateTime};

use crate::application::repos::{DateBucket, RepoError};
use crate::domain::entities::{
    AuthorRecord, AuthorWithUser, PostRecord, PostWithAuthor, UserRecord,
};

use super::util::convert_count;

pub(crate) const POST_COLUMNS: &str =
    "p.id, p.title, p.content, p.published, p.created_at, p.author_id";

pub(crate) const AUTHOR_COLUMNS: &str = "a.id AS author_id, a.user_id, a.bio, \
     a.created_at AS author_created_at, u.username, u.first_name, u.last_name, u.email, \
     u.date_joined";

/// Author columns for rows that already carry `p.author_id`.
pub(crate) const JOINED_AUTHOR_COLUMNS: &str = "a.user_id, a.bio, \
     a.created_at AS author_created_at, u.username, u.first_name, u.last_name, u.email, \
     u.date_joined";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) published: bool,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) author_id: i64,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            content: row.content,
            published: row.published,
            created_at: row.created_at,
            author_id: row.author_id,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AuthorRow {
    pub(crate) author_id: i64,
    pub(crate) user_id: i64,
    pub(crate) bio: String,
    pub(crate) author_created_at: OffsetDateTime,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) date_joined: OffsetDateTime,
}

impl From<AuthorRow> for AuthorWithUser {
    fn from(row: AuthorRow) -> Self {
        Self {
            author: AuthorRecord {
                id: row.author_id,
                user_id: row.user_id,
                bio: row.bio,
                created_at: row.author_created_at,
            },
            user: UserRecord {
                id: row.user_id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                date_joined: row.date_joined,
            },
        }
    }
}

/// One row of `posts JOIN authors JOIN users`.
#[derive(sqlx::FromRow)]
pub(crate) struct PostWithAuthorRow {
    #[sqlx(flatten)]
    pub(crate) post: PostRow,
    pub(crate) user_id: i64,
    pub(crate) bio: String,
    pub(crate) author_created_at: OffsetDateTime,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) date_joined: OffsetDateTime,
}

impl From<PostWithAuthorRow> for PostWithAuthor {
    fn from(row: PostWithAuthorRow) -> Self {
        let author = AuthorWithUser::from(AuthorRow {
            author_id: row.post.author_id,
            user_id: row.user_id,
            bio: row.bio,
            author_created_at: row.author_created_at,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            date_joined: row.date_joined,
        });

        Self {
            post: PostRecord::from(row.post),
            author,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct DateBucketRow {
    pub(crate) bucket: Date,
    pub(crate) count: i64,
}

impl TryFrom<DateBucketRow> for DateBucket {
    type Error = RepoError;

    fn try_from(row: DateBucketRow) -> Result<Self, Self::Error> {
        Ok(Self {
            date: row.bucket,
            count: convert_count(row.count)?,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct UserRow {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) email: String,
    pub(crate) date_joined: OffsetDateTime,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            date_joined: row.date_joined,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct AuthorOnlyRow {
    pub(crate) id: i64,
    pub(crate) user_id: i64,
    pub(crate) bio: String,
    pub(crate) created_at: OffsetDateTime,
}

impl From<AuthorOnlyRow> for AuthorRecord {
    fn from(row: AuthorOnlyRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            bio: row.bio,
            created_at: row.created_at,
        }
    }
}
