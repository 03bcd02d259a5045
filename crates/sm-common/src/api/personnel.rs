use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{ValidationError, optional_text, required_text};
use crate::ExperienceTier;
use crate::db::personnel::{PersonnelChanges, PersonnelInsert};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex compiles"));

const EXPERIENCE_CHOICES: &str = "Junior, Mid-Level, Senior";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonnelRecord {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub experience: String,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/personnel` and `PUT /api/personnel/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PersonnelRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub experience: Option<String>,
}

fn parse_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim();
    if EMAIL_RE.is_match(email) {
        Ok(email.to_string())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

fn parse_experience(raw: &str) -> Result<ExperienceTier, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidChoice {
            field: "experience",
            allowed: EXPERIENCE_CHOICES,
        })
}

impl PersonnelRequest {
    /// Validate a create request. `experience` defaults to `Junior`.
    pub fn into_insert(self) -> Result<PersonnelInsert, ValidationError> {
        let name = required_text("name", self.name.as_deref())?;
        let email = required_text("email", self.email.as_deref())?;
        let email = parse_email(&email)?;
        let experience = match optional_text(self.experience.as_deref()) {
            Some(raw) => parse_experience(&raw)?,
            None => ExperienceTier::default(),
        };

        Ok(PersonnelInsert {
            name,
            email,
            role: optional_text(self.role.as_deref()),
            experience,
        })
    }

    /// Validate a partial update. At least one field must be present.
    pub fn into_changes(self) -> Result<PersonnelChanges, ValidationError> {
        let changes = PersonnelChanges {
            name: optional_text(self.name.as_deref()),
            email: optional_text(self.email.as_deref())
                .map(|email| parse_email(&email))
                .transpose()?,
            role: optional_text(self.role.as_deref()),
            experience: optional_text(self.experience.as_deref())
                .map(|raw| parse_experience(&raw))
                .transpose()?,
        };

        if changes.is_empty() {
            return Err(ValidationError::Invalid(
                "at least one field to update is required".into(),
            ));
        }

        Ok(changes)
    }
}
