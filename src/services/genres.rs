//! Genre workflows

use std::sync::Arc;

use uuid::Uuid;

use super::{Deletion, Submission, WithDependents};
use crate::{
    error::{AppError, AppResult},
    models::{
        genre::duplicate_name_error, Book, BookReference, BookSummary, Genre, GenreDraft,
        GenreForm, Validated,
    },
    repository::{BookStore, GenreStore},
};

#[derive(Clone)]
pub struct GenresService {
    genres: Arc<dyn GenreStore>,
    books: Arc<dyn BookStore>,
}

impl GenresService {
    pub fn new(genres: Arc<dyn GenreStore>, books: Arc<dyn BookStore>) -> Self {
        Self { genres, books }
    }

    /// All genres, ordered by name
    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.genres.find_all().await
    }

    /// Genre and the summaries of its books, fetched concurrently
    pub async fn detail(&self, id: Uuid) -> AppResult<(Option<Genre>, Vec<BookSummary>)> {
        tokio::try_join!(
            self.genres.find_by_id(id),
            self.books.find_summaries_by_reference(BookReference::Genre(id)),
        )
    }

    /// Get a genre that must exist
    pub async fn get(&self, id: Uuid) -> AppResult<Genre> {
        self.genres
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))
    }

    /// Validate and store a new genre.
    ///
    /// Creation is idempotent by name: when a genre with the same name exists,
    /// that genre is returned instead. The store's uniqueness constraint covers
    /// two submissions racing past the lookup.
    pub async fn create(&self, form: &GenreForm) -> AppResult<Submission<GenreDraft, Genre>> {
        let draft = match form.validate(None) {
            Validated::Valid(draft) => draft,
            Validated::Invalid { draft, errors } => {
                tracing::debug!("Genre creation rejected with {} field error(s)", errors.len());
                return Ok(Submission::Rejected { draft, errors });
            }
        };

        if let Some(existing) = self.genres.find_by_name(&draft.name).await? {
            tracing::debug!(genre_id = %existing.id, "Genre already exists");
            return Ok(Submission::Existing(existing));
        }

        match self.genres.insert(&draft).await {
            Ok(genre) => {
                tracing::info!(genre_id = %genre.id, "Genre created");
                Ok(Submission::Saved(genre))
            }
            Err(AppError::Conflict(msg)) => {
                tracing::debug!("Genre insert lost a name race, reusing the winner");
                self.genres
                    .find_by_name(&draft.name)
                    .await?
                    .map(Submission::Existing)
                    .ok_or(AppError::Conflict(msg))
            }
            Err(e) => Err(e),
        }
    }

    /// Validate and rename an existing genre
    pub async fn update(
        &self,
        id: Uuid,
        form: &GenreForm,
    ) -> AppResult<Submission<GenreDraft, Genre>> {
        let draft = match form.validate(Some(id)) {
            Validated::Valid(draft) => draft,
            Validated::Invalid { draft, errors } => {
                tracing::debug!(genre_id = %id, "Genre update rejected with {} field error(s)", errors.len());
                return Ok(Submission::Rejected { draft, errors });
            }
        };

        if let Some(other) = self.genres.find_by_name(&draft.name).await? {
            if other.id != id {
                let errors = vec![duplicate_name_error(&draft.name)];
                return Ok(Submission::Rejected { draft, errors });
            }
        }

        match self.genres.update_by_id(id, &draft).await {
            Ok(Some(genre)) => {
                tracing::info!(genre_id = %genre.id, "Genre updated");
                Ok(Submission::Saved(genre))
            }
            Ok(None) => Err(AppError::NotFound(format!("Genre {} not found", id))),
            Err(AppError::Conflict(_)) => {
                let errors = vec![duplicate_name_error(&draft.name)];
                Ok(Submission::Rejected { draft, errors })
            }
            Err(e) => Err(e),
        }
    }

    /// Genre and every book referencing it, for the delete confirmation
    pub async fn delete_confirmation(&self, id: Uuid) -> AppResult<WithDependents<Genre, Book>> {
        let (genre, books) = tokio::try_join!(
            self.genres.find_by_id(id),
            self.books.find_by_reference(BookReference::Genre(id)),
        )?;
        let record = genre.ok_or_else(|| AppError::NotFound(format!("Genre {} not found", id)))?;
        Ok(WithDependents { record, books })
    }

    /// Delete a genre unless books still reference it
    pub async fn delete(&self, id: Uuid) -> AppResult<Deletion<Genre, Book>> {
        let confirmation = self.delete_confirmation(id).await?;
        if !confirmation.books.is_empty() {
            tracing::info!(
                genre_id = %id,
                "Genre delete blocked by {} book(s)",
                confirmation.books.len()
            );
            return Ok(Deletion::Blocked(confirmation));
        }

        self.genres.remove_by_id(id).await?;
        tracing::info!(genre_id = %id, "Genre deleted");
        Ok(Deletion::Removed)
    }
}
