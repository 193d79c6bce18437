use crate::util::timezone;
use chrono_tz::Tz;
use time::OffsetDateTime;

mod authors;
mod dashboard;
mod posts;

pub use authors::{
    AdminAuthorFormTemplate, AdminAuthorFormView, AdminAuthorListView, AdminAuthorRowView,
    AdminAuthorsTemplate,
};
pub use dashboard::{AdminDashboardTemplate, AdminDashboardView, AdminMetricView};
pub use posts::{
    AdminAuthorOptionView, AdminDateBucketView, AdminPostFormTemplate, AdminPostFormView,
    AdminPostListView, AdminPostRowView, AdminPostsTemplate,
};

#[derive(Clone)]
pub struct AdminBrandView {
    pub title: String,
}

#[derive(Clone)]
pub struct AdminNavigationItemView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminNavigationView {
    pub items: Vec<AdminNavigationItemView>,
}

#[derive(Clone)]
pub struct AdminMetaView {
    pub title: String,
    pub description: String,
}

#[derive(Clone)]
pub struct AdminChrome {
    pub brand: AdminBrandView,
    pub navigation: AdminNavigationView,
    pub meta: AdminMetaView,
}

#[derive(Clone)]
pub struct AdminLayout<T> {
    pub chrome: AdminChrome,
    pub content: T,
}

impl<T> AdminLayout<T> {
    pub fn new(chrome: AdminChrome, content: T) -> Self {
        Self { chrome, content }
    }
}

/// One choice in a sidebar filter; `href` keeps every other active filter.
#[derive(Clone)]
pub struct AdminFilterOptionView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct AdminFilterGroupView {
    pub title: String,
    pub options: Vec<AdminFilterOptionView>,
}

#[derive(Clone)]
pub struct AdminHiddenField {
    pub name: String,
    pub value: String,
}

pub fn format_timestamp(time: OffsetDateTime, tz: Tz) -> String {
    let localized = timezone::localized_datetime(time, tz);
    localized.format("%Y/%m/%d %H:%M:%S").to_string()
}
