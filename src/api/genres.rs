//! Genre pages

use axum::{
    extract::{Path, State},
    Form,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    error::{AppResult, ErrorResponse},
    models::{Book, BookSummaryView, BookView, Genre, GenreDraft, GenreForm, GenreView},
    services::{Deletion, Submission, WithDependents},
    AppState,
};

use super::{form_context, Page, View};

fn delete_page(confirmation: WithDependents<Genre, Book>) -> Page {
    let books: Vec<BookView> = confirmation.books.into_iter().map(BookView::from).collect();
    Page::render(
        "genre_delete",
        "Delete Genre",
        json!({
            "genre": GenreView::from(confirmation.record),
            "genre_books": books,
        }),
    )
}

fn submission_page(title: &str, submission: Submission<GenreDraft, Genre>) -> Page {
    match submission {
        Submission::Rejected { draft, errors } => {
            Page::render("genre_form", title, form_context("genre", &draft, &errors))
        }
        Submission::Saved(genre) | Submission::Existing(genre) => Page::redirect(genre.url()),
    }
}

/// List all genres
#[utoipa::path(
    get,
    path = "/catalog/genres",
    tag = "genres",
    responses(
        (status = 200, description = "`genre_list` view", body = View)
    )
)]
pub async fn list_genres(State(state): State<AppState>) -> AppResult<Page> {
    let genres: Vec<GenreView> = state
        .services
        .genres
        .list()
        .await?
        .into_iter()
        .map(GenreView::from)
        .collect();
    Ok(Page::render("genre_list", "Genre List", json!({ "genre_list": genres })))
}

/// Genre detail with its books
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "`genre_detail` view; `genre` is null when unknown", body = View)
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page> {
    let (genre, books) = state.services.genres.detail(id).await?;
    let books: Vec<BookSummaryView> = books.into_iter().map(BookSummaryView::from).collect();
    Ok(Page::render(
        "genre_detail",
        "Genre Details",
        json!({
            "genre": genre.map(GenreView::from),
            "genre_books": books,
        }),
    ))
}

/// Empty genre creation form
#[utoipa::path(
    get,
    path = "/catalog/genre/create",
    tag = "genres",
    responses(
        (status = 200, description = "`genre_form` view", body = View)
    )
)]
pub async fn create_genre_form() -> Page {
    Page::render("genre_form", "Create Genre", json!({}))
}

/// Create a genre, or reuse the one with the same name
#[utoipa::path(
    post,
    path = "/catalog/genre/create",
    tag = "genres",
    request_body(content = GenreForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the new or existing genre"),
        (status = 200, description = "`genre_form` view with field errors", body = View)
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    Form(form): Form<GenreForm>,
) -> AppResult<Page> {
    let submission = state.services.genres.create(&form).await?;
    Ok(submission_page("Create Genre", submission))
}

/// Delete confirmation
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "`genre_delete` view", body = View),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn delete_genre_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page> {
    let confirmation = state.services.genres.delete_confirmation(id).await?;
    Ok(delete_page(confirmation))
}

/// Delete a genre that no book references
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 303, description = "Deleted, redirect to the genre list"),
        (status = 200, description = "Books still reference the genre, `genre_delete` view", body = View),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page> {
    match state.services.genres.delete(id).await? {
        Deletion::Blocked(confirmation) => Ok(delete_page(confirmation)),
        Deletion::Removed => Ok(Page::redirect("/catalog/genres")),
    }
}

/// Genre form pre-filled with the stored values
#[utoipa::path(
    get,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "`genre_form` view", body = View),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn update_genre_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Page> {
    let genre = state.services.genres.get(id).await?;
    Ok(Page::render(
        "genre_form",
        "Update Genre",
        json!({ "genre": GenreView::from(genre) }),
    ))
}

/// Rename a genre
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update",
    tag = "genres",
    params(("id" = Uuid, Path, description = "Genre ID")),
    request_body(content = GenreForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Redirect to the updated genre"),
        (status = 200, description = "`genre_form` view with field errors", body = View),
        (status = 404, description = "Genre not found", body = ErrorResponse)
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<GenreForm>,
) -> AppResult<Page> {
    let submission = state.services.genres.update(id, &form).await?;
    Ok(submission_page("Update Genre", submission))
}
