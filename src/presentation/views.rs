use crate::application::error::{ErrorReport, HttpError};
use crate::domain::entities::{AuthorWithUser, PostRecord, PostWithAuthor};
use crate::util::timezone::localized_date;
use askama::{Error as AskamaError, Template};
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use chrono_tz::Tz;
use thiserror::Error;
use time::{OffsetDateTime, format_description::FormatItem, macros::format_description};

pub const HUMAN_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[month repr:long] [day padding:none], [year]");
pub const ISO_DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month padding:zero]-[day padding:zero]");

const EXCERPT_CHARS: usize = 240;

#[derive(Debug, Error)]
#[error("{public_message}")]
pub struct TemplateRenderError {
    pub(crate) source: &'static str,
    pub(crate) public_message: &'static str,
    #[source]
    pub(crate) error: AskamaError,
}

impl TemplateRenderError {
    pub fn new(source: &'static str, public_message: &'static str, error: AskamaError) -> Self {
        Self {
            source,
            public_message,
            error,
        }
    }
}

impl From<TemplateRenderError> for HttpError {
    fn from(err: TemplateRenderError) -> Self {
        let TemplateRenderError {
            source,
            public_message,
            error,
        } = err;

        HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            public_message,
            &error,
        )
    }
}

pub fn render_template<T: Template>(template: T) -> Result<Html<String>, HttpError> {
    template.render().map(Html).map_err(|err| {
        TemplateRenderError::new(
            "presentation::views::render_template",
            "Template rendering failed",
            err,
        )
        .into()
    })
}

pub fn render_template_response<T: Template>(template: T, status: StatusCode) -> Response {
    match render_template(template) {
        Ok(html) => (status, html).into_response(),
        Err(err) => err.into_response(),
    }
}

pub fn render_not_found_response(chrome: LayoutChrome) -> Response {
    let content = ErrorPageView::not_found();
    let view = LayoutContext::new(chrome.with_title("Not found"), content);
    let mut response = render_template_response(ErrorTemplate { view }, StatusCode::NOT_FOUND);
    ErrorReport::from_message(
        "presentation::views::render_not_found_response",
        StatusCode::NOT_FOUND,
        "Resource not found",
    )
    .attach(&mut response);
    response
}

#[derive(Clone)]
pub struct NavigationView {
    pub entries: Vec<NavigationLinkView>,
}

#[derive(Clone)]
pub struct BrandView {
    pub title: String,
    pub href: String,
}

#[derive(Clone)]
pub struct NavigationLinkView {
    pub label: String,
    pub href: String,
    pub is_active: bool,
}

#[derive(Clone)]
pub struct FooterView {
    pub copy: String,
}

#[derive(Clone)]
pub struct PageMetaView {
    pub title: String,
    pub description: String,
}

#[derive(Clone)]
pub struct LayoutChrome {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
}

impl LayoutChrome {
    /// Prefix the document title with the page title.
    pub fn with_title(self, page_title: &str) -> Self {
        let title = format!("{page_title} · {}", self.brand.title);
        Self {
            meta: PageMetaView {
                title,
                ..self.meta
            },
            ..self
        }
    }
}

#[derive(Clone)]
pub struct LayoutContext<T> {
    pub brand: BrandView,
    pub navigation: NavigationView,
    pub footer: FooterView,
    pub meta: PageMetaView,
    pub content: T,
}

impl<T> LayoutContext<T> {
    pub fn new(chrome: LayoutChrome, content: T) -> Self {
        Self {
            brand: chrome.brand,
            navigation: chrome.navigation,
            footer: chrome.footer,
            meta: chrome.meta,
            content,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PostCard {
    pub id: i64,
    pub href: String,
    pub title: String,
    pub excerpt: String,
    pub author_name: String,
    pub author_href: String,
    pub date: String,
    pub iso_date: String,
}

impl PostCard {
    pub fn from_joined(entry: &PostWithAuthor, tz: Tz) -> Self {
        Self::new(&entry.post, &entry.author, tz)
    }

    pub fn new(post: &PostRecord, author: &AuthorWithUser, tz: Tz) -> Self {
        let (date, iso_date) = format_dates(post.created_at, tz);
        Self {
            id: post.id,
            href: post_href(post.id),
            title: post.title.clone(),
            excerpt: excerpt(&post.content, EXCERPT_CHARS),
            author_name: author.display_name(),
            author_href: author_href(author.author.id),
            date,
            iso_date,
        }
    }
}

#[derive(Clone, Debug)]
pub struct AuthorCard {
    pub id: i64,
    pub href: String,
    pub name: String,
    pub username: String,
    pub bio: String,
}

impl From<&AuthorWithUser> for AuthorCard {
    fn from(author: &AuthorWithUser) -> Self {
        Self {
            id: author.author.id,
            href: author_href(author.author.id),
            name: author.display_name(),
            username: author.user.username.clone(),
            bio: author.author.bio.clone(),
        }
    }
}

pub struct PostListView {
    pub heading: String,
    pub posts: Vec<PostCard>,
    pub show_all_link: bool,
}

#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub view: LayoutContext<PostListView>,
}

#[derive(Template)]
#[template(path = "post_list.html")]
pub struct PostListTemplate {
    pub view: LayoutContext<PostListView>,
}

pub struct PostDetailView {
    pub title: String,
    pub paragraphs: Vec<String>,
    pub author_name: String,
    pub author_href: String,
    pub date: String,
    pub iso_date: String,
}

impl PostDetailView {
    pub fn new(entry: &PostWithAuthor, tz: Tz) -> Self {
        let (date, iso_date) = format_dates(entry.post.created_at, tz);
        Self {
            title: entry.post.title.clone(),
            paragraphs: paragraphs(&entry.post.content),
            author_name: entry.author.display_name(),
            author_href: author_href(entry.author.author.id),
            date,
            iso_date,
        }
    }
}

#[derive(Template)]
#[template(path = "post_detail.html")]
pub struct PostDetailTemplate {
    pub view: LayoutContext<PostDetailView>,
}

pub struct AuthorListView {
    pub authors: Vec<AuthorCard>,
}

#[derive(Template)]
#[template(path = "author_list.html")]
pub struct AuthorListTemplate {
    pub view: LayoutContext<AuthorListView>,
}

pub struct AuthorDetailView {
    pub author: AuthorCard,
    pub posts: Vec<PostCard>,
}

#[derive(Template)]
#[template(path = "author_detail.html")]
pub struct AuthorDetailTemplate {
    pub view: LayoutContext<AuthorDetailView>,
}

pub struct ErrorPageView {
    pub title: String,
    pub message: String,
    pub primary_action: Option<ErrorAction>,
}

impl ErrorPageView {
    pub fn not_found() -> Self {
        Self {
            title: "Page Not Found".to_string(),
            message: "The page you requested does not exist. Try returning to the homepage to keep reading.".to_string(),
            primary_action: Some(ErrorAction::home()),
        }
    }
}

pub struct ErrorAction {
    pub href: String,
    pub label: String,
}

impl ErrorAction {
    pub fn home() -> Self {
        Self {
            href: "/".to_string(),
            label: "Back to home".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub view: LayoutContext<ErrorPageView>,
}

pub fn post_href(id: i64) -> String {
    format!("/posts/{id}")
}

pub fn author_href(id: i64) -> String {
    format!("/authors/{id}")
}

/// Human and ISO renderings of `instant` on the site calendar.
pub fn format_dates(instant: OffsetDateTime, tz: Tz) -> (String, String) {
    let date = localized_date(instant, tz);
    let human = date.format(HUMAN_DATE_FORMAT).unwrap_or_default();
    let iso = date.format(ISO_DATE_FORMAT).unwrap_or_default();
    (human, iso)
}

/// Truncate on a char boundary and at the last word break.
pub fn excerpt(content: &str, max_chars: usize) -> String {
    let flattened = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= max_chars {
        return flattened;
    }

    let cut: String = flattened.chars().take(max_chars).collect();
    let trimmed = match cut.rfind(' ') {
        Some(index) if index > 0 => &cut[..index],
        _ => cut.as_str(),
    };
    format!("{}…", trimmed.trim_end_matches([',', '.', ';', ':']))
}

/// Split plain-text content into paragraphs on blank lines.
pub fn paragraphs(content: &str) -> Vec<String> {
    let normalized = content.replace("\r\n", "\n");
    normalized
        .split("\n\n")
        .map(|block| block.lines().map(str::trim).collect::<Vec<_>>().join(" "))
        .map(|block| block.trim().to_string())
        .filter(|block| !block.is_empty())
        .collect()
}
