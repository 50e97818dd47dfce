//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use super::form::{self, FieldError, FieldErrorKind, Validated};

/// Genre record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: Uuid,
    /// Unique genre name
    pub name: String,
}

impl Genre {
    pub fn url(&self) -> String {
        genre_url(self.id)
    }
}

pub fn genre_url(id: Uuid) -> String {
    format!("/catalog/genre/{}", id)
}

/// Genre as handed to views
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenreView {
    #[serde(flatten)]
    pub genre: Genre,
    pub url: String,
}

impl From<Genre> for GenreView {
    fn from(genre: Genre) -> Self {
        Self {
            url: genre.url(),
            genre,
        }
    }
}

/// Raw genre form submission
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct GenreForm {
    pub name: Option<String>,
}

/// Sanitized genre fields ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct GenreDraft {
    pub id: Option<Uuid>,
    pub name: String,
}

impl GenreForm {
    pub fn validate(&self, id: Option<Uuid>) -> Validated<GenreDraft> {
        let name = form::sanitize(self.name.as_deref());

        let errors: Vec<FieldError> = [
            form::require("name", &name, "Genre name required"),
            form::alphanumeric("name", &name, "Genre name must be alphanumeric text."),
        ]
        .into_iter()
        .flatten()
        .collect();

        Validated::from_errors(GenreDraft { id, name }, errors)
    }
}

impl From<&Genre> for GenreDraft {
    fn from(genre: &Genre) -> Self {
        Self {
            id: Some(genre.id),
            name: genre.name.clone(),
        }
    }
}

/// Error reported when a genre is renamed to a name another genre already has
pub fn duplicate_name_error(name: &str) -> FieldError {
    FieldError {
        field: "name".to_string(),
        kind: FieldErrorKind::DuplicateName,
        message: format!("A genre named '{}' already exists.", name),
    }
}
