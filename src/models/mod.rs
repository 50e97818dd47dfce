//! Data models for the catalog

pub mod author;
pub mod book;
pub mod form;
pub mod genre;

// Re-export commonly used types
pub use author::{Author, AuthorDraft, AuthorForm, AuthorView};
pub use book::{Book, BookReference, BookSummary, BookSummaryView, BookView};
pub use form::{FieldError, FieldErrorKind, Validated};
pub use genre::{Genre, GenreDraft, GenreForm, GenreView};
