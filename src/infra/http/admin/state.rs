use std::sync::Arc;

use chrono_tz::Tz;

use crate::application::admin::{
    authors::AdminAuthorService, chrome::AdminChromeService, dashboard::AdminDashboardService,
    posts::AdminPostService,
};
use crate::infra::db::PostgresRepositories;

#[derive(Clone)]
pub struct AdminState {
    pub db: Arc<PostgresRepositories>,
    pub chrome: Arc<AdminChromeService>,
    pub dashboard: Arc<AdminDashboardService>,
    pub authors: Arc<AdminAuthorService>,
    pub posts: Arc<AdminPostService>,
    pub timezone: Tz,
}
