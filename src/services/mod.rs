//! Catalog workflows: list, detail, create, update and delete for authors
//! and genres.

pub mod authors;
pub mod genres;

use std::sync::Arc;

use crate::{
    models::FieldError,
    repository::{AuthorStore, BookStore, GenreStore, Repository},
};

/// Result of a create or update submission
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<D, E> {
    /// Validation failed; nothing was written
    Rejected { draft: D, errors: Vec<FieldError> },
    /// The record was written
    Saved(E),
    /// An equal record already existed and was reused
    Existing(E),
}

/// A record together with the books referencing it
#[derive(Debug, Clone, PartialEq)]
pub struct WithDependents<E, B> {
    pub record: E,
    pub books: Vec<B>,
}

/// Result of a delete submission
#[derive(Debug, Clone, PartialEq)]
pub enum Deletion<E, B> {
    /// Books still reference the record; it was left in place
    Blocked(WithDependents<E, B>),
    Removed,
}

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub genres: genres::GenresService,
}

impl Services {
    /// Create all services backed by the PostgreSQL repository
    pub fn new(repository: Repository) -> Self {
        let repository = Arc::new(repository);
        Self::from_stores(repository.clone(), repository.clone(), repository)
    }

    /// Create all services over arbitrary stores
    pub fn from_stores(
        authors: Arc<dyn AuthorStore>,
        genres: Arc<dyn GenreStore>,
        books: Arc<dyn BookStore>,
    ) -> Self {
        Self {
            authors: authors::AuthorsService::new(authors, books.clone()),
            genres: genres::GenresService::new(genres, books),
        }
    }
}
