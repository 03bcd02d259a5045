//! Request and response shapes exchanged with the HTTP layer, plus the
//! boundary validation that turns requests into storage inserts.

pub mod match_response;
pub mod personnel;
pub mod personnel_skill;
pub mod project;
pub mod skill;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("invalid email format")]
    InvalidEmail,
    #[error("{field} must be one of: {allowed}")]
    InvalidChoice {
        field: &'static str,
        allowed: &'static str,
    },
    #[error("{0} must be a positive id")]
    InvalidId(&'static str),
    #[error("{0}")]
    Invalid(String),
}

pub(crate) const PROFICIENCY_CHOICES: &str = "Beginner, Intermediate, Advanced, Expert";

/// Trimmed, non-empty text or `MissingField`.
pub(crate) fn required_text(
    field: &'static str,
    value: Option<&str>,
) -> Result<String, ValidationError> {
    optional_text(value).ok_or(ValidationError::MissingField(field))
}

/// Trimmed text, with blank input treated as absent.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

pub(crate) fn positive_id(field: &'static str, value: i64) -> Result<i64, ValidationError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(ValidationError::InvalidId(field))
    }
}
