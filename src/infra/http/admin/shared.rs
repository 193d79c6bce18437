use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use url::form_urlencoded;

use crate::{application::error::HttpError, presentation::admin::views as admin_views};

pub(super) fn blank_to_none_opt(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// HTML checkboxes are only submitted when ticked.
pub(super) fn parse_checkbox_flag(input: &Option<String>) -> bool {
    matches!(input.as_deref(), Some("on") | Some("true") | Some("1"))
}

/// Positive integer query values; anything else is ignored.
pub(super) fn parse_positive<T>(value: Option<&str>) -> Option<T>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    value
        .map(str::trim)
        .and_then(|raw| raw.parse::<T>().ok())
        .filter(|parsed| *parsed > T::default())
}

/// Query-string pairs describing a list view; empty pairs mean the defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(super) struct ListParams {
    pairs: Vec<(&'static str, String)>,
}

impl ListParams {
    pub(super) fn push(&mut self, key: &'static str, value: impl Into<String>) {
        self.pairs.push((key, value.into()));
    }

    pub(super) fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub(super) fn href(&self, path: &str) -> String {
        if self.pairs.is_empty() {
            return path.to_string();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        format!("{path}?{}", serializer.finish())
    }

    /// Every pair except `skip`, rendered as hidden inputs of the search form.
    pub(super) fn hidden_fields(&self, skip: &str) -> Vec<admin_views::AdminHiddenField> {
        self.pairs
            .iter()
            .filter(|(key, _)| *key != skip)
            .map(|(key, value)| admin_views::AdminHiddenField {
                name: (*key).to_string(),
                value: value.clone(),
            })
            .collect()
    }
}

pub(super) fn not_found(source: &'static str, entity: &'static str) -> Response {
    HttpError::new(
        source,
        StatusCode::NOT_FOUND,
        "Not found",
        format!("{entity} does not exist"),
    )
    .into_response()
}
