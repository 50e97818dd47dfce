//! Submitted form handling shared by the author and genre workflows.
//!
//! A submission goes through three stages, always in this order:
//! 1. string fields are sanitized (HTML-escaped, then trimmed),
//! 2. every rule runs and the field errors are collected,
//! 3. optional dates are coerced into calendar dates.
//!
//! Date rules inspect the raw submitted strings, so coercion can never
//! clear an error that was already reported.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use utoipa::ToSchema;
use validator::ValidationErrors;

static ALPHANUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9A-Za-z]+$").expect("alphanumeric pattern compiles"));

/// Calendar date with optional month and day, then an optional time of day
/// with optional seconds, fraction and UTC offset
static ISO_8601: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<year>[0-9]{4})(?:-(?P<month>[0-9]{2})(?:-(?P<day>[0-9]{2})(?:[T ](?P<hour>[0-9]{2}):(?P<minute>[0-9]{2})(?::(?P<second>[0-9]{2})(?:[.,][0-9]+)?)?(?:[Zz]|[+-](?P<offset_hour>[0-9]{2})(?::?(?P<offset_minute>[0-9]{2}))?)?)?)?)?$",
    )
    .expect("iso-8601 pattern compiles")
});

/// Kind of a field-level validation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    MissingField,
    InvalidFormat,
    InvalidDate,
    TooLong,
    DuplicateName,
}

/// A user-facing validation error attached to one form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldError {
    /// Form field name (e.g. `family_name`)
    pub field: String,
    pub kind: FieldErrorKind,
    /// Message shown next to the field
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, kind: FieldErrorKind, message: &str) -> Self {
        Self {
            field: field.to_string(),
            kind,
            message: message.to_string(),
        }
    }
}

/// Outcome of validating a submitted form.
///
/// An invalid submission still carries the partially built draft so the form
/// can be re-displayed with what the user typed.
#[derive(Debug, Clone, PartialEq)]
pub enum Validated<T> {
    Valid(T),
    Invalid { draft: T, errors: Vec<FieldError> },
}

impl<T> Validated<T> {
    /// Build the outcome from a draft and the errors collected for it
    pub fn from_errors(draft: T, errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Validated::Valid(draft)
        } else {
            Validated::Invalid { draft, errors }
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validated::Valid(_))
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            Validated::Valid(_) => &[],
            Validated::Invalid { errors, .. } => errors,
        }
    }
}

/// Escape HTML-significant characters
pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Escape then trim a submitted string field; absent fields become empty
pub fn sanitize(raw: Option<&str>) -> String {
    escape_html(raw.unwrap_or_default()).trim().to_string()
}

/// Fails with `MissingField` when the sanitized value is empty
pub fn require(field: &str, value: &str, message: &str) -> Option<FieldError> {
    value
        .is_empty()
        .then(|| FieldError::new(field, FieldErrorKind::MissingField, message))
}

/// Fails with `InvalidFormat` when a non-empty value is not strictly alphanumeric
pub fn alphanumeric(field: &str, value: &str, message: &str) -> Option<FieldError> {
    (!value.is_empty() && !ALPHANUMERIC.is_match(value))
        .then(|| FieldError::new(field, FieldErrorKind::InvalidFormat, message))
}

/// Fails with `InvalidDate` when a present, non-empty raw value is not ISO-8601
pub fn optional_date(field: &str, raw: Option<&str>) -> Option<FieldError> {
    match raw {
        Some(value) if !value.is_empty() && parse_iso_date(value).is_none() => Some(
            FieldError::new(field, FieldErrorKind::InvalidDate, "Invalid date"),
        ),
        _ => None,
    }
}

/// Coerce a raw optional date; absent, empty or malformed values stay unset
pub fn coerce_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.filter(|value| !value.is_empty()).and_then(parse_iso_date)
}

/// Parse an ISO-8601 date or date-time into its calendar date.
///
/// Omitted month and day default to the first. The date is the one written,
/// the offset is checked but not applied.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let caps = ISO_8601.captures(value)?;
    let number = |name: &str, default: u32| -> Option<u32> {
        match caps.name(name) {
            Some(m) => m.as_str().parse().ok(),
            None => Some(default),
        }
    };

    let in_range = number("hour", 0)? < 24
        && number("minute", 0)? < 60
        && number("second", 0)? < 60
        && number("offset_hour", 0)? < 24
        && number("offset_minute", 0)? < 60;
    if !in_range {
        return None;
    }

    let year = caps.name("year")?.as_str().parse().ok()?;
    NaiveDate::from_ymd_opt(year, number("month", 1)?, number("day", 1)?)
}

/// Convert `validator` length failures into `TooLong` field errors
pub fn length_errors(errors: ValidationErrors) -> Vec<FieldError> {
    let mut out: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = field.to_string();
            errs.iter()
                .map(|err| FieldError {
                    field: field.clone(),
                    kind: FieldErrorKind::TooLong,
                    message: err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{} is too long", field)),
                })
                .collect::<Vec<_>>()
        })
        .collect();
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}
