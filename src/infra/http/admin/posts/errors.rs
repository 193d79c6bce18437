use axum::http::StatusCode;

use crate::application::{admin::posts::AdminPostError, error::HttpError};
use crate::infra::http::repo_error_to_http;

pub(super) fn admin_post_error(source: &'static str, err: AdminPostError) -> HttpError {
    match err {
        AdminPostError::UnknownAuthor(author_id) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Post request could not be processed",
            format!("Author {author_id} does not exist"),
        ),
        AdminPostError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Not found",
            "post does not exist",
        ),
        AdminPostError::Repo(repo) => repo_error_to_http(source, repo),
    }
}

/// Message shown on the re-rendered form when the submitted author is unusable.
pub(super) fn form_rejection(err: &AdminPostError) -> Option<String> {
    match err {
        AdminPostError::UnknownAuthor(0) => Some("Choose an author for this post".to_string()),
        AdminPostError::UnknownAuthor(_) => Some(err.to_string()),
        _ => None,
    }
}
