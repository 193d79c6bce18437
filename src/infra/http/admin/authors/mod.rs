mod errors;
mod forms;
mod handlers;
mod panel;

pub(super) use handlers::{
    admin_author_create, admin_author_delete, admin_author_edit, admin_author_new,
    admin_author_update, admin_authors,
};
