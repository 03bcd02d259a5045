use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::personnel_skill::parse_proficiency;
use super::{ValidationError, optional_text, positive_id, required_text};
use crate::db::projects::{ProjectInsert, RequirementInsert};
use crate::{ProficiencyLevel, ProjectStatus};

const STATUS_CHOICES: &str = "Planning, Ongoing, Completed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRecord {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub skills: Vec<ProjectSkillRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSkillRecord {
    pub skill_id: i64,
    /// `None` when the skill was deleted after the requirement was recorded.
    pub skill_name: Option<String>,
    pub min_level: String,
}

/// Body of `POST /api/projects` and `PUT /api/projects/{id}`. The `skills`
/// list replaces the project's requirements wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub skills: Vec<RequirementRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RequirementRequest {
    pub skill_id: i64,
    pub min_level: Option<String>,
}

fn parse_date(field: &'static str, raw: Option<&str>) -> Result<Option<NaiveDate>, ValidationError> {
    optional_text(raw)
        .map(|value| {
            NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
                ValidationError::Invalid(format!("{field} must be a date formatted as YYYY-MM-DD"))
            })
        })
        .transpose()
}

impl RequirementRequest {
    fn into_insert(self) -> Result<RequirementInsert, ValidationError> {
        let min_level = match optional_text(self.min_level.as_deref()) {
            Some(raw) => parse_proficiency("min_level", Some(&raw))?,
            None => ProficiencyLevel::Beginner,
        };

        Ok(RequirementInsert {
            skill_id: positive_id("skill_id", self.skill_id)?,
            min_level,
        })
    }
}

impl ProjectRequest {
    pub fn into_insert(self) -> Result<ProjectInsert, ValidationError> {
        let name = required_text("name", self.name.as_deref())?;
        let start_date = parse_date("start_date", self.start_date.as_deref())?;
        let end_date = parse_date("end_date", self.end_date.as_deref())?;

        if let (Some(start), Some(end)) = (start_date, end_date) {
            if end < start {
                return Err(ValidationError::Invalid(
                    "end_date must not be before start_date".into(),
                ));
            }
        }

        let status = match optional_text(self.status.as_deref()) {
            Some(raw) => raw.parse().map_err(|_| ValidationError::InvalidChoice {
                field: "status",
                allowed: STATUS_CHOICES,
            })?,
            None => ProjectStatus::default(),
        };

        let mut seen = HashSet::new();
        let mut requirements = Vec::with_capacity(self.skills.len());
        for skill in self.skills {
            let requirement = skill.into_insert()?;
            if !seen.insert(requirement.skill_id) {
                return Err(ValidationError::Invalid(format!(
                    "skill {} is listed more than once",
                    requirement.skill_id
                )));
            }
            requirements.push(requirement);
        }

        Ok(ProjectInsert {
            name,
            description: optional_text(self.description.as_deref()),
            start_date,
            end_date,
            status,
            requirements,
        })
    }
}
