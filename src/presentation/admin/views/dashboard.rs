use askama::Template;

use super::AdminLayout;

#[derive(Clone)]
pub struct AdminMetricView {
    pub label: String,
    pub value: u64,
    pub href: String,
    pub hint: Option<String>,
}

#[derive(Clone)]
pub struct AdminDashboardView {
    pub title: String,
    pub metrics: Vec<AdminMetricView>,
    pub public_site_hint: String,
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardTemplate {
    pub view: AdminLayout<AdminDashboardView>,
}
