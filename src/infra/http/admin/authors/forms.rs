use serde::Deserialize;

use crate::application::admin::authors::AuthorCommand;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminAuthorListQuery {
    pub(super) q: Option<String>,
    pub(super) created: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct AdminAuthorForm {
    pub(super) username: String,
    pub(super) first_name: String,
    pub(super) last_name: String,
    pub(super) email: String,
    pub(super) bio: String,
}

impl From<AdminAuthorForm> for AuthorCommand {
    fn from(form: AdminAuthorForm) -> Self {
        Self {
            username: form.username,
            first_name: form.first_name,
            last_name: form.last_name,
            email: form.email,
            bio: form.bio,
        }
    }
}
