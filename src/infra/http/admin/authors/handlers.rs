use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    application::admin::authors::AuthorCommand,
    infra::http::{
        admin::{AdminState, shared::not_found},
        parse_id,
    },
    presentation::{admin::views as admin_views, views::render_template_response},
};

use super::{
    errors::{admin_author_error, form_rejection},
    forms::{AdminAuthorForm, AdminAuthorListQuery},
    panel::{
        build_author_edit_view, build_author_list_view, build_new_author_view, parse_author_query,
        refill_author_form,
    },
};

const LIST_PATH: &str = "/authors";

pub(crate) async fn admin_authors(
    State(state): State<AdminState>,
    Query(raw): Query<AdminAuthorListQuery>,
) -> Response {
    let chrome = state.chrome.load(LIST_PATH);
    let query = parse_author_query(raw);

    let listing = match state.authors.list(&query).await {
        Ok(listing) => listing,
        Err(err) => return admin_author_error("infra::http::admin_authors", err).into_response(),
    };

    let content = build_author_list_view(listing, &query, state.timezone);
    let view = admin_views::AdminLayout::new(chrome, content);
    render_template_response(admin_views::AdminAuthorsTemplate { view }, StatusCode::OK)
}

pub(crate) async fn admin_author_new(State(state): State<AdminState>) -> Response {
    let chrome = state.chrome.load(LIST_PATH);
    let view = admin_views::AdminLayout::new(chrome, build_new_author_view());
    render_template_response(admin_views::AdminAuthorFormTemplate { view }, StatusCode::OK)
}

pub(crate) async fn admin_author_create(
    State(state): State<AdminState>,
    Form(form): Form<AdminAuthorForm>,
) -> Response {
    let command = AuthorCommand::from(form);

    match state.authors.create_author(command.clone()).await {
        Ok(_) => Redirect::to(LIST_PATH).into_response(),
        Err(err) => match form_rejection(&err) {
            Some(status) => {
                let content = refill_author_form(build_new_author_view(), &command, err.to_string());
                render_author_form(&state, content, status)
            }
            None => admin_author_error("infra::http::admin_author_create", err).into_response(),
        },
    }
}

pub(crate) async fn admin_author_edit(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found("infra::http::admin_author_edit", "author");
    };

    let author = match state.authors.load_author(id).await {
        Ok(author) => author,
        Err(err) => return admin_author_error("infra::http::admin_author_edit", err).into_response(),
    };

    render_author_form(&state, build_author_edit_view(&author), StatusCode::OK)
}

pub(crate) async fn admin_author_update(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    Form(form): Form<AdminAuthorForm>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found("infra::http::admin_author_update", "author");
    };

    let command = AuthorCommand::from(form);

    match state.authors.update_author(id, command.clone()).await {
        Ok(_) => Redirect::to(LIST_PATH).into_response(),
        Err(err) => {
            let Some(status) = form_rejection(&err) else {
                return admin_author_error("infra::http::admin_author_update", err).into_response();
            };

            let current = match state.authors.load_author(id).await {
                Ok(author) => author,
                Err(load_err) => {
                    return admin_author_error("infra::http::admin_author_update", load_err)
                        .into_response();
                }
            };

            let content =
                refill_author_form(build_author_edit_view(&current), &command, err.to_string());
            render_author_form(&state, content, status)
        }
    }
}

pub(crate) async fn admin_author_delete(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found("infra::http::admin_author_delete", "author");
    };

    match state.authors.delete_author(id).await {
        Ok(()) => Redirect::to(LIST_PATH).into_response(),
        Err(err) => admin_author_error("infra::http::admin_author_delete", err).into_response(),
    }
}

fn render_author_form(
    state: &AdminState,
    content: admin_views::AdminAuthorFormView,
    status: StatusCode,
) -> Response {
    let chrome = state.chrome.load(LIST_PATH);
    let view = admin_views::AdminLayout::new(chrome, content);
    render_template_response(admin_views::AdminAuthorFormTemplate { view }, status)
}
