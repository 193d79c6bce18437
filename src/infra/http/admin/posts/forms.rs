use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminPostListQuery {
    pub(super) q: Option<String>,
    pub(super) published: Option<String>,
    pub(super) created: Option<String>,
    pub(super) author: Option<String>,
    pub(super) year: Option<String>,
    pub(super) month: Option<String>,
    pub(super) day: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminPostForm {
    pub(super) title: String,
    pub(super) content: String,
    pub(super) published: Option<String>,
    pub(super) author: Option<String>,
}
