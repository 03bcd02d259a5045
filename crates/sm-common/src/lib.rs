pub mod api;
pub mod db;
pub mod logging;
pub mod matching;
pub mod schema;

use serde::Serialize;
use strum::{AsRefStr, EnumString};

pub use matching::ProficiencyLevel;

// Commonly used data models for matching functions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
}

/// A project's demand for one skill. `minimum_level` is `None` when the stored
/// label could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillRequirement {
    pub skill_id: i64,
    pub minimum_level: Option<ProficiencyLevel>,
}

/// A skill held by one person. `proficiency` is `None` when the stored label
/// could not be parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonnelSkill {
    pub skill_id: i64,
    pub proficiency: Option<ProficiencyLevel>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Personnel {
    pub id: i64,
    pub name: String,
    pub role: Option<String>,
    pub experience: ExperienceTier,
    pub skills: Vec<PersonnelSkill>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, AsRefStr, EnumString)]
pub enum ExperienceTier {
    #[default]
    Junior,
    #[serde(rename = "Mid-Level")]
    #[strum(serialize = "Mid-Level")]
    MidLevel,
    Senior,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, AsRefStr, EnumString)]
pub enum ProjectStatus {
    #[default]
    Planning,
    Ongoing,
    Completed,
}
