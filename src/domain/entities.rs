//! Domain entities mirrored from persistent storage.

use serde::Serialize;
use time::OffsetDateTime;

/// The user identity an author wraps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub date_joined: OffsetDateTime,
}

impl UserRecord {
    /// Full name when present, otherwise the username.
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorRecord {
    pub id: i64,
    pub user_id: i64,
    pub bio: String,
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: OffsetDateTime,
    pub author_id: i64,
}

/// An author joined with its user identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthorWithUser {
    pub author: AuthorRecord,
    pub user: UserRecord,
}

impl AuthorWithUser {
    pub fn display_name(&self) -> String {
        self.user.display_name()
    }
}

/// A post loaded together with its author in the same query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostWithAuthor {
    pub post: PostRecord,
    pub author: AuthorWithUser,
}
