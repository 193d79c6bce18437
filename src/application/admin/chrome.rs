use crate::presentation::admin::views::{
    AdminBrandView, AdminChrome, AdminMetaView, AdminNavigationItemView, AdminNavigationView,
};

const NAV_ITEMS: &[(&str, &str)] = &[
    ("/", "Dashboard"),
    ("/authors", "Authors"),
    ("/posts", "Posts"),
];

#[derive(Clone)]
pub struct AdminChromeService {
    site_title: String,
}

impl AdminChromeService {
    pub fn new(site_title: impl Into<String>) -> Self {
        Self {
            site_title: site_title.into(),
        }
    }

    pub fn load(&self, active_path: &str) -> AdminChrome {
        let brand = AdminBrandView {
            title: format!("{} Admin", self.site_title),
        };

        let items: Vec<AdminNavigationItemView> = NAV_ITEMS
            .iter()
            .map(|(href, label)| AdminNavigationItemView {
                label: (*label).to_string(),
                href: (*href).to_string(),
                is_active: is_active(href, active_path),
            })
            .collect();

        let active_label = items
            .iter()
            .find(|item| item.is_active)
            .map(|item| item.label.clone())
            .unwrap_or_else(|| "Dashboard".to_string());

        let meta = AdminMetaView {
            title: format!("{} · {}", brand.title, active_label),
            description: "Site administration".to_string(),
        };

        AdminChrome {
            brand,
            navigation: AdminNavigationView { items },
            meta,
        }
    }
}

fn is_active(href: &str, active_path: &str) -> bool {
    if href == "/" {
        return active_path == "/";
    }
    active_path == href || active_path.starts_with(&format!("{href}/"))
}
