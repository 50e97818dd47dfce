//! Author pages

use axum::{
    extract::{Path, State},
    Form,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{Author, AuthorDraft, AuthorForm, AuthorView, Book, BookSummaryView, BookView},
    services::{Deletion, Submission, WithDependents},
    AppState,
};

use super::{form_context, Page, View};

fn delete_page(confirmation: WithDependents<Author, Book>) -> Page {
    let books: Vec<BookView> = confirmation.books.into_iter().map(BookView::from).collect();
    Page::render(
        "author_delete",
        "Delete Author",
        json!({
            "author": AuthorView::from(confirmation.record),
            "author_books": books,
        }),
    )
}

fn submission_page(title: &str, submission: Submission<AuthorDraft, Author>) -> Page {
    match submission {
        Submission::Rejected { draft, errors } => {
            Page::render("author_form", title, form_context("author", &draft, &errors))
        }
        Submission::Saved(author) | Submission::Existing(author) => Page::redirect(author.url()),
    }
}

/// List all authors
#[utoipa::path(
    get,
    path = "/catalog/authors",
    tag = "authors",
    responses(
        (status = 200, description = "`author_list` view", body = View)
    )
)]
pub async fn list_authors(State(state): State<AppState>) -> AppResult<Page> {
    let authors: Vec<AuthorView> = state
        .services
        .authors
        .list()
        .await?
        .into_iter()
        .map(AuthorView::from)
        .collect();
    Ok(Page::render("author_list", "Author List", json!({ "author_list": authors })))
}

/// Author detail with its books
#[utoipa::path(
    get,
    path = "/catalog/author/{id}",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "`author_detail` view; `author` is null when unknown", body = View)
    )
)]
pub async fn get_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page> {
    let (author, books) = state.services.authors.detail(id).await?;
    let books: Vec<BookSummaryView> = books.into_iter().map(BookSummaryView::from).collect();
    Ok(Page::render(
        "author_detail",
        "Author Detail",
        json!({
            "author": author.map(AuthorView::from),
            "author_books": books,
        }),
    ))
}

/// Empty author creation form
#[utoipa::path(
    get,
    path = "/catalog/author/create",
    tag = "authors",
    responses(
        (status = 200, description = "`author_form` view", body = View)
    )
)]
pub async fn create_author_form() -> Page {
    Page::render("author_form", "Create Author", json!({}))
}

/// Create an author
#[utoipa::path(
    post,
    path = "/catalog/author/create",
    tag = "authors",
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the new author"),
        (status = 200, description = "`author_form` view with field errors", body = View)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Page> {
    let submission = state.services.authors.create(&form).await?;
    Ok(submission_page("Create Author", submission))
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "`author_delete` view", body = View),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page> {
    let confirmation = state.services.authors.delete_confirmation(id).await?;
    Ok(delete_page(confirmation))
}

/// Delete an author that no book references
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/delete",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 303, description = "Deleted, redirect to the author list"),
        (status = 200, description = "Books still reference the author, `author_delete` view", body = View),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn delete_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page> {
    match state.services.authors.delete(id).await? {
        Deletion::Blocked(confirmation) => Ok(delete_page(confirmation)),
        Deletion::Removed => Ok(Page::redirect("/catalog/authors")),
    }
}

/// Author form pre-filled with the stored values
#[utoipa::path(
    get,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    responses(
        (status = 200, description = "`author_form` view", body = View),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page> {
    let author = state.services.authors.get(id).await?;
    Ok(Page::render(
        "author_form",
        "Update Author",
        json!({ "author": AuthorView::from(author) }),
    ))
}

/// Update an author
#[utoipa::path(
    post,
    path = "/catalog/author/{id}/update",
    tag = "authors",
    params(("id" = Uuid, Path, description = "Author ID")),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the updated author"),
        (status = 200, description = "`author_form` view with field errors", body = View),
        (status = 404, description = "Author not found", body = ErrorResponse)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<AuthorForm>,
) -> AppResult<Page> {
    let submission = state.services.authors.update(id, &form).await?;
    Ok(submission_page("Update Author", submission))
}
