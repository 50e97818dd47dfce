//! Author model and related types

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::form::{self, FieldError, Validated};

/// Full author record from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    /// Display name, `"{family_name}, {first_name}"`
    pub fn name(&self) -> String {
        format!("{}, {}", self.family_name, self.first_name)
    }

    /// Canonical URL of the author detail page
    pub fn url(&self) -> String {
        author_url(self.id)
    }

    pub fn date_of_birth_formatted(&self) -> Option<String> {
        self.date_of_birth.map(long_date)
    }

    pub fn date_of_death_formatted(&self) -> Option<String> {
        self.date_of_death.map(long_date)
    }

    /// Value for a `<input type="date">` field
    pub fn date_of_birth_input(&self) -> Option<String> {
        self.date_of_birth.map(input_date)
    }

    pub fn date_of_death_input(&self) -> Option<String> {
        self.date_of_death.map(input_date)
    }
}

pub fn author_url(id: Uuid) -> String {
    format!("/catalog/author/{}", id)
}

/// `December 16th, 1775`
fn long_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{} {}{}, {}", date.format("%B"), day, suffix, date.year())
}

fn input_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Author as handed to views, stored fields plus derived ones
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AuthorView {
    #[serde(flatten)]
    pub author: Author,
    pub name: String,
    pub url: String,
    pub date_of_birth_formatted: Option<String>,
    pub date_of_death_formatted: Option<String>,
    pub date_of_birth_input: Option<String>,
    pub date_of_death_input: Option<String>,
}

impl From<Author> for AuthorView {
    fn from(author: Author) -> Self {
        Self {
            name: author.name(),
            url: author.url(),
            date_of_birth_formatted: author.date_of_birth_formatted(),
            date_of_death_formatted: author.date_of_death_formatted(),
            date_of_birth_input: author.date_of_birth_input(),
            date_of_death_input: author.date_of_death_input(),
            author,
        }
    }
}

/// Raw author form submission
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AuthorForm {
    pub first_name: Option<String>,
    pub family_name: Option<String>,
    /// ISO-8601 date, may be empty
    pub date_of_birth: Option<String>,
    /// ISO-8601 date, may be empty
    pub date_of_death: Option<String>,
}

/// Sanitized author fields ready to be stored
#[derive(Debug, Clone, PartialEq, Serialize, Validate, ToSchema)]
pub struct AuthorDraft {
    /// Set when the draft replaces an existing author
    pub id: Option<Uuid>,
    #[validate(length(max = 100, message = "First name must be at most 100 characters once HTML-escaped."))]
    pub first_name: String,
    #[validate(length(max = 100, message = "Family name must be at most 100 characters once HTML-escaped."))]
    pub family_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

impl AuthorForm {
    /// Sanitize and validate the submission. `id` is carried into the draft
    /// for updates and is `None` for creation.
    pub fn validate(&self, id: Option<Uuid>) -> Validated<AuthorDraft> {
        let first_name = form::sanitize(self.first_name.as_deref());
        let family_name = form::sanitize(self.family_name.as_deref());

        let mut errors: Vec<FieldError> = [
            form::require("first_name", &first_name, "First name must be specified."),
            form::require("family_name", &family_name, "Family name must be specified."),
            form::alphanumeric(
                "family_name",
                &family_name,
                "Family name must be alphanumeric text.",
            ),
            form::optional_date("date_of_birth", self.date_of_birth.as_deref()),
            form::optional_date("date_of_death", self.date_of_death.as_deref()),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut draft = AuthorDraft {
            id,
            first_name,
            family_name,
            date_of_birth: None,
            date_of_death: None,
        };
        if let Err(e) = draft.validate() {
            errors.extend(form::length_errors(e));
        }

        // Dates are coerced only once every error has been collected
        draft.date_of_birth = form::coerce_date(self.date_of_birth.as_deref());
        draft.date_of_death = form::coerce_date(self.date_of_death.as_deref());

        Validated::from_errors(draft, errors)
    }
}

impl From<&Author> for AuthorDraft {
    fn from(author: &Author) -> Self {
        Self {
            id: Some(author.id),
            first_name: author.first_name.clone(),
            family_name: author.family_name.clone(),
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
        }
    }
}
