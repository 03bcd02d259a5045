use serde::{Deserialize, Serialize};

use super::{PROFICIENCY_CHOICES, ValidationError, positive_id, required_text};
use crate::ProficiencyLevel;
use crate::db::personnel_skills::PersonnelSkillInsert;

/// One row of `GET /api/personnel-skills`, joined with display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonnelSkillRecord {
    pub id: i64,
    pub personnel_id: i64,
    pub personnel_name: String,
    pub skill_id: i64,
    pub skill_name: String,
    pub proficiency: String,
}

/// One row of `GET /api/personnel/{id}/skills`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeldSkillRecord {
    pub id: i64,
    pub skill_id: i64,
    pub skill_name: String,
    pub category: String,
    pub proficiency: String,
}

/// Body of `POST /api/personnel-skills`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssignSkillRequest {
    #[serde(alias = "personnel_id")]
    pub personnel_id: i64,
    #[serde(alias = "skill_id")]
    pub skill_id: i64,
    pub proficiency: Option<String>,
}

/// Body of `PUT /api/personnel-skills/{id}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProficiencyUpdateRequest {
    pub proficiency: Option<String>,
}

pub(crate) fn parse_proficiency(
    field: &'static str,
    raw: Option<&str>,
) -> Result<ProficiencyLevel, ValidationError> {
    let raw = required_text(field, raw)?;
    ProficiencyLevel::from_label(&raw).ok_or(ValidationError::InvalidChoice {
        field,
        allowed: PROFICIENCY_CHOICES,
    })
}

impl AssignSkillRequest {
    pub fn into_insert(self) -> Result<PersonnelSkillInsert, ValidationError> {
        Ok(PersonnelSkillInsert {
            personnel_id: positive_id("personnelId", self.personnel_id)?,
            skill_id: positive_id("skillId", self.skill_id)?,
            proficiency: parse_proficiency("proficiency", self.proficiency.as_deref())?,
        })
    }
}

impl ProficiencyUpdateRequest {
    pub fn into_level(self) -> Result<ProficiencyLevel, ValidationError> {
        parse_proficiency("proficiency", self.proficiency.as_deref())
    }
}
