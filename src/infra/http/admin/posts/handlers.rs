use axum::{
    extract::{Form, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};

use crate::{
    application::admin::posts::PostCommand,
    infra::http::{
        admin::{
            AdminState,
            shared::{not_found, parse_checkbox_flag, parse_positive},
        },
        parse_id,
    },
    presentation::{admin::views as admin_views, views::render_template_response},
};

use super::{
    errors::{admin_post_error, form_rejection},
    forms::{AdminPostForm, AdminPostListQuery},
    panel::{
        build_new_post_view, build_post_edit_view, build_post_list_view, parse_post_query,
        refill_post_form,
    },
};

const LIST_PATH: &str = "/posts";

/// A missing or malformed author becomes id 0, which never exists.
fn post_command(form: AdminPostForm) -> PostCommand {
    PostCommand {
        title: form.title.trim().to_string(),
        content: form.content,
        published: parse_checkbox_flag(&form.published),
        author_id: parse_positive(form.author.as_deref()).unwrap_or_default(),
    }
}

pub(crate) async fn admin_posts(
    State(state): State<AdminState>,
    Query(raw): Query<AdminPostListQuery>,
) -> Response {
    let chrome = state.chrome.load(LIST_PATH);
    let query = parse_post_query(raw);

    let listing = match state.posts.list(&query).await {
        Ok(listing) => listing,
        Err(err) => return admin_post_error("infra::http::admin_posts", err).into_response(),
    };

    let content = build_post_list_view(listing, &query, state.timezone);
    let view = admin_views::AdminLayout::new(chrome, content);
    render_template_response(admin_views::AdminPostsTemplate { view }, StatusCode::OK)
}

pub(crate) async fn admin_post_new(State(state): State<AdminState>) -> Response {
    let authors = match state.posts.author_choices().await {
        Ok(authors) => authors,
        Err(err) => return admin_post_error("infra::http::admin_post_new", err).into_response(),
    };

    render_post_form(&state, build_new_post_view(&authors), StatusCode::OK)
}

pub(crate) async fn admin_post_create(
    State(state): State<AdminState>,
    Form(form): Form<AdminPostForm>,
) -> Response {
    let command = post_command(form);

    let err = match state.posts.create_post(command.clone()).await {
        Ok(_) => return Redirect::to(LIST_PATH).into_response(),
        Err(err) => err,
    };

    let Some(message) = form_rejection(&err) else {
        return admin_post_error("infra::http::admin_post_create", err).into_response();
    };

    let authors = match state.posts.author_choices().await {
        Ok(authors) => authors,
        Err(err) => return admin_post_error("infra::http::admin_post_create", err).into_response(),
    };

    let content = refill_post_form(build_new_post_view(&authors), &command, message);
    render_post_form(&state, content, StatusCode::BAD_REQUEST)
}

pub(crate) async fn admin_post_edit(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found("infra::http::admin_post_edit", "post");
    };

    let (entry, authors) = match tokio::try_join!(
        state.posts.load_post(id),
        state.posts.author_choices()
    ) {
        Ok(loaded) => loaded,
        Err(err) => return admin_post_error("infra::http::admin_post_edit", err).into_response(),
    };

    render_post_form(&state, build_post_edit_view(&entry, &authors), StatusCode::OK)
}

pub(crate) async fn admin_post_update(
    State(state): State<AdminState>,
    Path(id): Path<String>,
    Form(form): Form<AdminPostForm>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found("infra::http::admin_post_update", "post");
    };

    let command = post_command(form);

    let err = match state.posts.update_post(id, command.clone()).await {
        Ok(_) => return Redirect::to(LIST_PATH).into_response(),
        Err(err) => err,
    };

    let Some(message) = form_rejection(&err) else {
        return admin_post_error("infra::http::admin_post_update", err).into_response();
    };

    let (entry, authors) = match tokio::try_join!(
        state.posts.load_post(id),
        state.posts.author_choices()
    ) {
        Ok(loaded) => loaded,
        Err(err) => return admin_post_error("infra::http::admin_post_update", err).into_response(),
    };

    let content = refill_post_form(build_post_edit_view(&entry, &authors), &command, message);
    render_post_form(&state, content, StatusCode::BAD_REQUEST)
}

pub(crate) async fn admin_post_delete(
    State(state): State<AdminState>,
    Path(id): Path<String>,
) -> Response {
    let Some(id) = parse_id(&id) else {
        return not_found("infra::http::admin_post_delete", "post");
    };

    match state.posts.delete_post(id).await {
        Ok(()) => Redirect::to(LIST_PATH).into_response(),
        Err(err) => admin_post_error("infra::http::admin_post_delete", err).into_response(),
    }
}

fn render_post_form(
    state: &AdminState,
    content: admin_views::AdminPostFormView,
    status: StatusCode,
) -> Response {
    let chrome = state.chrome.load(LIST_PATH);
    let view = admin_views::AdminLayout::new(chrome, content);
    render_template_response(admin_views::AdminPostFormTemplate { view }, status)
}
