use crate::config::SiteSettings;
use crate::presentation::views::{
    BrandView, FooterView, LayoutChrome, NavigationLinkView, NavigationView, PageMetaView,
};

const NAV_ITEMS: &[(&str, &str)] = &[("/", "Home"), ("/posts", "Posts"), ("/authors", "Authors")];

/// Builds the shared layout for public pages from site settings.
#[derive(Clone)]
pub struct ChromeService {
    site: SiteSettings,
}

impl ChromeService {
    pub fn new(site: SiteSettings) -> Self {
        Self { site }
    }

    pub fn load(&self, active_path: &str) -> LayoutChrome {
        let entries = NAV_ITEMS
            .iter()
            .map(|(href, label)| NavigationLinkView {
                label: (*label).to_string(),
                href: (*href).to_string(),
                is_active: is_active(href, active_path),
            })
            .collect();

        LayoutChrome {
            brand: BrandView {
                title: self.site.title.clone(),
                href: "/".to_string(),
            },
            navigation: NavigationView { entries },
            footer: FooterView {
                copy: format!("© {}", self.site.title),
            },
            meta: PageMetaView {
                title: self.site.title.clone(),
                description: format!("Latest writing from {}", self.site.title),
            },
        }
    }
}

fn is_active(href: &str, active_path: &str) -> bool {
    if href == "/" {
        return active_path == "/";
    }
    active_path == href || active_path.starts_with(&format!("{href}/"))
}
