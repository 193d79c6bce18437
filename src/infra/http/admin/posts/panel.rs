use chrono_tz::Tz;
use time::Date;

use crate::{
    application::{
        admin::posts::{AdminPostListing, AdminPostQuery, PostCommand},
        repos::DateBucket,
    },
    domain::{
        entities::{AuthorWithUser, PostWithAuthor},
        types::{DateGranularity, DateHierarchySelection, DateRangeFilter, PublishedFilter},
    },
    infra::http::admin::shared::{ListParams, blank_to_none_opt, parse_positive},
    presentation::admin::views as admin_views,
};

use super::forms::AdminPostListQuery;

const LIST_PATH: &str = "/posts";

pub(super) fn parse_post_query(raw: AdminPostListQuery) -> AdminPostQuery {
    AdminPostQuery {
        search: blank_to_none_opt(raw.q),
        published: raw
            .published
            .as_deref()
            .and_then(PublishedFilter::parse)
            .unwrap_or_default(),
        created: raw
            .created
            .as_deref()
            .and_then(DateRangeFilter::parse)
            .unwrap_or_default(),
        author_id: parse_positive(raw.author.as_deref()),
        hierarchy: DateHierarchySelection::from_parts(
            parse_positive(raw.year.as_deref()),
            parse_positive(raw.month.as_deref()),
            parse_positive(raw.day.as_deref()),
        ),
    }
}

fn list_params(query: &AdminPostQuery) -> ListParams {
    let mut params = ListParams::default();
    if let Some(search) = &query.search {
        params.push("q", search.clone());
    }
    if query.published != PublishedFilter::All {
        params.push("published", query.published.as_str());
    }
    if query.created != DateRangeFilter::Any {
        params.push("created", query.created.as_str());
    }
    if let Some(author_id) = query.author_id {
        params.push("author", author_id.to_string());
    }
    if let Some(year) = query.hierarchy.year {
        params.push("year", year.to_string());
    }
    if let Some(month) = query.hierarchy.month {
        params.push("month", u8::from(month).to_string());
    }
    if let Some(day) = query.hierarchy.day {
        params.push("day", day.to_string());
    }
    params
}

fn href_with(query: &AdminPostQuery, change: impl FnOnce(&mut AdminPostQuery)) -> String {
    let mut candidate = query.clone();
    change(&mut candidate);
    list_params(&candidate).href(LIST_PATH)
}

pub(super) fn build_post_list_view(
    listing: AdminPostListing,
    query: &AdminPostQuery,
    tz: Tz,
) -> admin_views::AdminPostListView {
    let params = list_params(query);

    let published_options = PublishedFilter::ALL
        .iter()
        .map(|choice| admin_views::AdminFilterOptionView {
            label: choice.label().to_string(),
            href: href_with(query, |q| q.published = *choice),
            is_active: *choice == query.published,
        })
        .collect();

    let created_options = DateRangeFilter::ALL
        .iter()
        .map(|choice| admin_views::AdminFilterOptionView {
            label: choice.label().to_string(),
            href: href_with(query, |q| q.created = *choice),
            is_active: *choice == query.created,
        })
        .collect();

    let mut author_options = vec![admin_views::AdminFilterOptionView {
        label: "All".to_string(),
        href: href_with(query, |q| q.author_id = None),
        is_active: query.author_id.is_none(),
    }];
    author_options.extend(listing.authors.iter().map(|author| {
        let id = author.author.id;
        admin_views::AdminFilterOptionView {
            label: author.display_name(),
            href: href_with(query, |q| q.author_id = Some(id)),
            is_active: query.author_id == Some(id),
        }
    }));

    let date_buckets = match listing.granularity {
        Some(granularity) => listing
            .buckets
            .iter()
            .map(|bucket| build_date_bucket(query, granularity, bucket))
            .collect(),
        None => Vec::new(),
    };

    let rows: Vec<_> = listing
        .posts
        .iter()
        .map(|entry| build_post_row(entry, tz))
        .collect();

    admin_views::AdminPostListView {
        heading: "Posts".to_string(),
        shown: rows.len(),
        rows,
        filter_search: query.search.clone(),
        filter_groups: vec![
            admin_views::AdminFilterGroupView {
                title: "By published".to_string(),
                options: published_options,
            },
            admin_views::AdminFilterGroupView {
                title: "By created".to_string(),
                options: created_options,
            },
            admin_views::AdminFilterGroupView {
                title: "By author".to_string(),
                options: author_options,
            },
        ],
        hidden_fields: params.hidden_fields("q"),
        date_trail: build_date_trail(query),
        date_buckets,
        total: listing.total,
        published_total: listing.published,
        clear_href: (!params.is_empty()).then(|| LIST_PATH.to_string()),
        new_post_href: "/posts/new".to_string(),
    }
}

fn build_date_bucket(
    query: &AdminPostQuery,
    granularity: DateGranularity,
    bucket: &DateBucket,
) -> admin_views::AdminDateBucketView {
    let selection = query.hierarchy.child(granularity, bucket.date);
    admin_views::AdminDateBucketView {
        label: bucket_label(granularity, bucket.date),
        href: href_with(query, |q| q.hierarchy = selection),
        count: bucket.count,
    }
}

fn bucket_label(granularity: DateGranularity, date: Date) -> String {
    match granularity {
        DateGranularity::Year => date.year().to_string(),
        DateGranularity::Month => format!("{} {}", date.month(), date.year()),
        DateGranularity::Day => format!("{} {}", date.month(), date.day()),
    }
}

/// Breadcrumb from "All dates" down to the current selection; empty when nothing is selected.
fn build_date_trail(query: &AdminPostQuery) -> Vec<admin_views::AdminFilterOptionView> {
    let selection = query.hierarchy;
    if selection.is_empty() {
        return Vec::new();
    }

    let mut levels = vec![selection];
    let mut current = selection;
    while !current.is_empty() {
        current = current.parent();
        levels.push(current);
    }
    levels.reverse();

    levels
        .into_iter()
        .map(|level| admin_views::AdminFilterOptionView {
            label: trail_label(&level),
            href: href_with(query, |q| q.hierarchy = level),
            is_active: level == selection,
        })
        .collect()
}

fn trail_label(selection: &DateHierarchySelection) -> String {
    match (selection.year, selection.month, selection.day) {
        (Some(year), Some(month), Some(day)) => format!("{month} {day}, {year}"),
        (Some(year), Some(month), None) => format!("{month} {year}"),
        (Some(year), None, _) => year.to_string(),
        (None, _, _) => "All dates".to_string(),
    }
}

fn build_post_row(entry: &PostWithAuthor, tz: Tz) -> admin_views::AdminPostRowView {
    admin_views::AdminPostRowView {
        id: entry.post.id,
        title: entry.post.title.clone(),
        author_name: entry.author.display_name(),
        author_href: format!("/authors/{}/edit", entry.author.author.id),
        published: entry.post.published,
        created_at: admin_views::format_timestamp(entry.post.created_at, tz),
        edit_href: format!("/posts/{}/edit", entry.post.id),
    }
}

fn author_options(
    authors: &[AuthorWithUser],
    selected: Option<i64>,
) -> Vec<admin_views::AdminAuthorOptionView> {
    authors
        .iter()
        .map(|author| admin_views::AdminAuthorOptionView {
            id: author.author.id,
            label: author.display_name(),
            selected: selected == Some(author.author.id),
        })
        .collect()
}

pub(super) fn build_new_post_view(authors: &[AuthorWithUser]) -> admin_views::AdminPostFormView {
    admin_views::AdminPostFormView {
        heading: "Add post".to_string(),
        form_action: "/posts/create".to_string(),
        submit_label: "Create post".to_string(),
        authors: author_options(authors, None),
        back_href: LIST_PATH.to_string(),
        ..Default::default()
    }
}

pub(super) fn build_post_edit_view(
    entry: &PostWithAuthor,
    authors: &[AuthorWithUser],
) -> admin_views::AdminPostFormView {
    admin_views::AdminPostFormView {
        heading: format!("Edit \u{201c}{}\u{201d}", entry.post.title),
        form_action: format!("/posts/{}/edit", entry.post.id),
        submit_label: "Save post".to_string(),
        title: entry.post.title.clone(),
        content: entry.post.content.clone(),
        published: entry.post.published,
        authors: author_options(authors, Some(entry.post.author_id)),
        error: None,
        delete_action: Some(format!("/posts/{}/delete", entry.post.id)),
        back_href: LIST_PATH.to_string(),
    }
}

/// Echo the submitted values back into the form next to an error message.
pub(super) fn refill_post_form(
    mut view: admin_views::AdminPostFormView,
    submitted: &PostCommand,
    error: String,
) -> admin_views::AdminPostFormView {
    view.title = submitted.title.clone();
    view.content = submitted.content.clone();
    view.published = submitted.published;
    for option in &mut view.authors {
        option.selected = option.id == submitted.author_id;
    }
    view.error = Some(error);
    view
}
