use serde::Deserialize;

use super::{ValidationError, optional_text, required_text};
use crate::db::skills::SkillInsert;

/// Body of `POST /api/skills` and `PUT /api/skills/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
}

impl SkillRequest {
    pub fn into_insert(self) -> Result<SkillInsert, ValidationError> {
        Ok(SkillInsert {
            name: required_text("name", self.name.as_deref())?,
            category: required_text("category", self.category.as_deref())?,
            description: optional_text(self.description.as_deref()),
        })
    }
}
