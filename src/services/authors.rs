//! Author workflows

use std::sync::Arc;

use uuid::Uuid;

use super::{Deletion, Submission, WithDependents};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorDraft, AuthorForm, Book, BookReference, BookSummary, Validated},
    repository::{AuthorStore, BookStore},
};

#[derive(Clone)]
pub struct AuthorsService {
    authors: Arc<dyn AuthorStore>,
    books: Arc<dyn BookStore>,
}

impl AuthorsService {
    pub fn new(authors: Arc<dyn AuthorStore>, books: Arc<dyn BookStore>) -> Self {
        Self { authors, books }
    }

    /// All authors, ordered by family name
    pub async fn list(&self) -> AppResult<Vec<Author>> {
        self.authors.find_all().await
    }

    /// Author and the summaries of its books, fetched concurrently.
    /// A missing author is not an error here.
    pub async fn detail(&self, id: Uuid) -> AppResult<(Option<Author>, Vec<BookSummary>)> {
        tokio::try_join!(
            self.authors.find_by_id(id),
            self.books.find_summaries_by_reference(BookReference::Author(id)),
        )
    }

    /// Get an author that must exist
    pub async fn get(&self, id: Uuid) -> AppResult<Author> {
        self.authors
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Validate and store a new author
    pub async fn create(&self, form: &AuthorForm) -> AppResult<Submission<AuthorDraft, Author>> {
        let draft = match form.validate(None) {
            Validated::Valid(draft) => draft,
            Validated::Invalid { draft, errors } => {
                tracing::debug!("Author creation rejected with {} field error(s)", errors.len());
                return Ok(Submission::Rejected { draft, errors });
            }
        };

        let author = self.authors.insert(&draft).await?;
        tracing::info!(author_id = %author.id, "Author created");
        Ok(Submission::Saved(author))
    }

    /// Validate and replace the fields of an existing author
    pub async fn update(
        &self,
        id: Uuid,
        form: &AuthorForm,
    ) -> AppResult<Submission<AuthorDraft, Author>> {
        let draft = match form.validate(Some(id)) {
            Validated::Valid(draft) => draft,
            Validated::Invalid { draft, errors } => {
                tracing::debug!(author_id = %id, "Author update rejected with {} field error(s)", errors.len());
                return Ok(Submission::Rejected { draft, errors });
            }
        };

        let author = self
            .authors
            .update_by_id(id, &draft)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
        tracing::info!(author_id = %author.id, "Author updated");
        Ok(Submission::Saved(author))
    }

    /// Author and every book referencing it, for the delete confirmation
    pub async fn delete_confirmation(&self, id: Uuid) -> AppResult<WithDependents<Author, Book>> {
        let (author, books) = tokio::try_join!(
            self.authors.find_by_id(id),
            self.books.find_by_reference(BookReference::Author(id)),
        )?;
        let record = author.ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))?;
        Ok(WithDependents { record, books })
    }

    /// Delete an author unless books still reference it.
    ///
    /// Dependents are always re-read from the store right before deciding.
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<Author, Book>> {
        let confirmation = self.delete_confirmation(id).await?;
        if !confirmation.books.is_empty() {
            tracing::info!(
                author_id = %id,
                "Author delete blocked by {} book(s)",
                confirmation.books.len()
            );
            return Ok(Deletion::Blocked(confirmation));
        }

        self.authors.remove_by_id(id).await?;
        tracing::info!(author_id = %id, "Author deleted");
        Ok(Deletion::Removed)
    }
}
