use askama::Template;

use super::{AdminFilterGroupView, AdminHiddenField, AdminLayout};

#[derive(Clone)]
pub struct AdminAuthorRowView {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub bio: String,
    pub created_at: String,
    pub edit_href: String,
}

#[derive(Clone)]
pub struct AdminAuthorListView {
    pub heading: String,
    pub rows: Vec<AdminAuthorRowView>,
    pub filter_search: Option<String>,
    pub filter_groups: Vec<AdminFilterGroupView>,
    /// Filters other than search, resubmitted with the search form.
    pub hidden_fields: Vec<AdminHiddenField>,
    pub shown: usize,
    pub total: u64,
    pub clear_href: Option<String>,
    pub new_author_href: String,
}

#[derive(Template)]
#[template(path = "admin/authors.html")]
pub struct AdminAuthorsTemplate {
    pub view: AdminLayout<AdminAuthorListView>,
}

#[derive(Clone, Default)]
pub struct AdminAuthorFormView {
    pub heading: String,
    pub form_action: String,
    pub submit_label: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bio: String,
    pub error: Option<String>,
    pub delete_action: Option<String>,
    pub back_href: String,
}

#[derive(Template)]
#[template(path = "admin/author_form.html")]
pub struct AdminAuthorFormTemplate {
    pub view: AdminLayout<AdminAuthorFormView>,
}
