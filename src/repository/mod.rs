//! Repository layer for database operations.
//!
//! The workflows only see the store traits below. [`Repository`] implements
//! them on PostgreSQL; any other backend must keep the same guarantees:
//! identities are assigned on insert and never change, and genre names are
//! unique (a violating write fails with [`AppError::Conflict`]).
//!
//! Referential integrity between books and authors/genres is checked by the
//! services before every delete, not left to the store.
//!
//! [`AppError::Conflict`]: crate::error::AppError::Conflict

pub mod authors;
pub mod books;
pub mod genres;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, AuthorDraft, Book, BookReference, BookSummary, Genre, GenreDraft},
};

/// Author entity store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// All authors ordered by family name
    async fn find_all(&self) -> AppResult<Vec<Author>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Author>>;
    /// Insert a new author, assigning its identity
    async fn insert(&self, draft: &AuthorDraft) -> AppResult<Author>;
    /// Replace the mutable fields of an author; `None` if it does not exist
    async fn update_by_id(&self, id: Uuid, draft: &AuthorDraft) -> AppResult<Option<Author>>;
    async fn remove_by_id(&self, id: Uuid) -> AppResult<()>;
}

/// Genre entity store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenreStore: Send + Sync {
    /// All genres ordered by name
    async fn find_all(&self) -> AppResult<Vec<Genre>>;
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Genre>>;
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Genre>>;
    async fn insert(&self, draft: &GenreDraft) -> AppResult<Genre>;
    async fn update_by_id(&self, id: Uuid, draft: &GenreDraft) -> AppResult<Option<Genre>>;
    async fn remove_by_id(&self, id: Uuid) -> AppResult<()>;
}

/// Read access to the books that reference authors and genres
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookStore: Send + Sync {
    async fn find_by_reference(&self, reference: BookReference) -> AppResult<Vec<Book>>;
    /// Same books, projected to id, title and summary
    async fn find_summaries_by_reference(
        &self,
        reference: BookReference,
    ) -> AppResult<Vec<BookSummary>>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}
