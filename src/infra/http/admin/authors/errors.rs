use axum::http::StatusCode;

use crate::application::{admin::authors::AdminAuthorError, error::HttpError};
use crate::infra::http::repo_error_to_http;

pub(super) fn admin_author_error(source: &'static str, err: AdminAuthorError) -> HttpError {
    match err {
        AdminAuthorError::ConstraintViolation(field) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            "Author request could not be processed",
            format!("Invalid field `{field}`"),
        ),
        AdminAuthorError::DuplicateUsername(username) => HttpError::new(
            source,
            StatusCode::CONFLICT,
            "Author request could not be processed",
            format!("Username `{username}` is already taken"),
        ),
        AdminAuthorError::NotFound => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            "Not found",
            "author does not exist",
        ),
        AdminAuthorError::Repo(repo) => repo_error_to_http(source, repo),
    }
}

/// Validation failures are shown on the form instead of an error page.
pub(super) fn form_rejection(err: &AdminAuthorError) -> Option<StatusCode> {
    match err {
        AdminAuthorError::ConstraintViolation(_) => Some(StatusCode::BAD_REQUEST),
        AdminAuthorError::DuplicateUsername(_) => Some(StatusCode::CONFLICT),
        _ => None,
    }
}
