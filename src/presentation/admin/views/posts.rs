use askama::Template;

use super::{AdminFilterGroupView, AdminFilterOptionView, AdminHiddenField, AdminLayout};

#[derive(Clone)]
pub struct AdminPostRowView {
    pub id: i64,
    pub title: String,
    pub author_name: String,
    pub author_href: String,
    pub published: bool,
    pub created_at: String,
    pub edit_href: String,
}

/// A drill-down link of the date hierarchy with the number of matching posts.
#[derive(Clone)]
pub struct AdminDateBucketView {
    pub label: String,
    pub href: String,
    pub count: u64,
}

#[derive(Clone)]
pub struct AdminPostListView {
    pub heading: String,
    pub rows: Vec<AdminPostRowView>,
    pub filter_search: Option<String>,
    pub filter_groups: Vec<AdminFilterGroupView>,
    pub hidden_fields: Vec<AdminHiddenField>,
    /// Breadcrumb of the date hierarchy, starting with "All dates".
    pub date_trail: Vec<AdminFilterOptionView>,
    pub date_buckets: Vec<AdminDateBucketView>,
    pub shown: usize,
    pub total: u64,
    pub published_total: u64,
    pub clear_href: Option<String>,
    pub new_post_href: String,
}

#[derive(Template)]
#[template(path = "admin/posts.html")]
pub struct AdminPostsTemplate {
    pub view: AdminLayout<AdminPostListView>,
}

#[derive(Clone)]
pub struct AdminAuthorOptionView {
    pub id: i64,
    pub label: String,
    pub selected: bool,
}

#[derive(Clone, Default)]
pub struct AdminPostFormView {
    pub heading: String,
    pub form_action: String,
    pub submit_label: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub authors: Vec<AdminAuthorOptionView>,
    pub error: Option<String>,
    pub delete_action: Option<String>,
    pub back_href: String,
}

impl AdminPostFormView {
    pub fn has_authors(&self) -> bool {
        !self.authors.is_empty()
    }
}

#[derive(Template)]
#[template(path = "admin/post_form.html")]
pub struct AdminPostFormTemplate {
    pub view: AdminLayout<AdminPostFormView>,
}
