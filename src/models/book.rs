//! Book records as seen from authors and genres.
//!
//! Books are only read here: they are the dependents that keep an author or
//! genre from being deleted.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Book record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author_id: Uuid,
}

/// Minimal book projection used on detail pages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookSummary {
    pub id: Uuid,
    pub title: String,
    pub summary: String,
}

/// What a book refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookReference {
    Author(Uuid),
    Genre(Uuid),
}

pub fn book_url(id: Uuid) -> String {
    format!("/catalog/book/{}", id)
}

/// Book projection as handed to views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookSummaryView {
    #[serde(flatten)]
    pub book: BookSummary,
    pub url: String,
}

impl From<BookSummary> for BookSummaryView {
    fn from(book: BookSummary) -> Self {
        Self {
            url: book_url(book.id),
            book,
        }
    }
}

/// Full book as handed to views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookView {
    #[serde(flatten)]
    pub book: Book,
    pub url: String,
}

impl From<Book> for BookView {
    fn from(book: Book) -> Self {
        Self {
            url: book_url(book.id),
            book,
        }
    }
}
