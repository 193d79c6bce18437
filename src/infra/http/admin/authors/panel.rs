use chrono_tz::Tz;

use crate::{
    application::admin::authors::{AdminAuthorListing, AdminAuthorQuery, AuthorCommand},
    domain::{entities::AuthorWithUser, types::DateRangeFilter},
    infra::http::admin::shared::{ListParams, blank_to_none_opt},
    presentation::admin::views as admin_views,
};

use super::forms::AdminAuthorListQuery;

const LIST_PATH: &str = "/authors";

pub(super) fn parse_author_query(raw: AdminAuthorListQuery) -> AdminAuthorQuery {
    AdminAuthorQuery {
        search: blank_to_none_opt(raw.q),
        created: raw
            .created
            .as_deref()
            .and_then(DateRangeFilter::parse)
            .unwrap_or_default(),
    }
}

fn list_params(query: &AdminAuthorQuery) -> ListParams {
    let mut params = ListParams::default();
    if let Some(search) = &query.search {
        params.push("q", search.clone());
    }
    if query.created != DateRangeFilter::Any {
        params.push("created", query.created.as_str());
    }
    params
}

pub(super) fn build_author_list_view(
    listing: AdminAuthorListing,
    query: &AdminAuthorQuery,
    tz: Tz,
) -> admin_views::AdminAuthorListView {
    let params = list_params(query);

    let created_options = DateRangeFilter::ALL
        .iter()
        .map(|choice| {
            let candidate = AdminAuthorQuery {
                created: *choice,
                ..query.clone()
            };
            admin_views::AdminFilterOptionView {
                label: choice.label().to_string(),
                href: list_params(&candidate).href(LIST_PATH),
                is_active: *choice == query.created,
            }
        })
        .collect();

    let rows: Vec<_> = listing
        .authors
        .iter()
        .map(|author| build_author_row(author, tz))
        .collect();

    admin_views::AdminAuthorListView {
        heading: "Authors".to_string(),
        shown: rows.len(),
        rows,
        filter_search: query.search.clone(),
        filter_groups: vec![admin_views::AdminFilterGroupView {
            title: "By created".to_string(),
            options: created_options,
        }],
        hidden_fields: params.hidden_fields("q"),
        total: listing.total,
        clear_href: (!params.is_empty()).then(|| LIST_PATH.to_string()),
        new_author_href: "/authors/new".to_string(),
    }
}

fn build_author_row(author: &AuthorWithUser, tz: Tz) -> admin_views::AdminAuthorRowView {
    admin_views::AdminAuthorRowView {
        id: author.author.id,
        name: author.display_name(),
        username: author.user.username.clone(),
        email: author.user.email.clone(),
        bio: author.author.bio.clone(),
        created_at: admin_views::format_timestamp(author.author.created_at, tz),
        edit_href: format!("/authors/{}/edit", author.author.id),
    }
}

pub(super) fn build_new_author_view() -> admin_views::AdminAuthorFormView {
    admin_views::AdminAuthorFormView {
        heading: "Add author".to_string(),
        form_action: "/authors/create".to_string(),
        submit_label: "Create author".to_string(),
        back_href: LIST_PATH.to_string(),
        ..Default::default()
    }
}

pub(super) fn build_author_edit_view(author: &AuthorWithUser) -> admin_views::AdminAuthorFormView {
    admin_views::AdminAuthorFormView {
        heading: format!("Edit {}", author.display_name()),
        form_action: format!("/authors/{}/edit", author.author.id),
        submit_label: "Save author".to_string(),
        username: author.user.username.clone(),
        first_name: author.user.first_name.clone(),
        last_name: author.user.last_name.clone(),
        email: author.user.email.clone(),
        bio: author.author.bio.clone(),
        error: None,
        delete_action: Some(format!("/authors/{}/delete", author.author.id)),
        back_href: LIST_PATH.to_string(),
    }
}

/// Echo the submitted values back into the form next to an error message.
pub(super) fn refill_author_form(
    mut view: admin_views::AdminAuthorFormView,
    submitted: &AuthorCommand,
    error: String,
) -> admin_views::AdminAuthorFormView {
    view.username = submitted.username.clone();
    view.first_name = submitted.first_name.clone();
    view.last_name = submitted.last_name.clone();
    view.email = submitted.email.clone();
    view.bio = submitted.bio.clone();
    view.error = Some(error);
    view
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_created_choice_falls_back_to_any() {
        let query = parse_author_query(AdminAuthorListQuery {
            q: Some("  ".into()),
            created: Some("last_decade".into()),
        });
        assert_eq!(query.search, None);
        assert_eq!(query.created, DateRangeFilter::Any);
    }

    #[test]
    fn created_options_keep_search() {
        let query = AdminAuthorQuery {
            search: Some("ada".into()),
            created: DateRangeFilter::Today,
        };
        let listing = AdminAuthorListing {
            authors: Vec::new(),
            total: 3,
        };

        let view = build_author_list_view(listing, &query, chrono_tz::UTC);
        let options = &view.filter_groups[0].options;

        assert_eq!(options[0].href, "/authors?q=ada");
        assert_eq!(options[1].href, "/authors?q=ada&created=today");
        assert!(options[1].is_active);
        assert_eq!(view.hidden_fields.len(), 1);
        assert_eq!(view.clear_href.as_deref(), Some("/authors"));
        assert_eq!(view.total, 3);
    }
}
