use std::collections::{HashMap, HashSet};

use super::proficiency::ProficiencyLevel;
use crate::{Personnel, Skill, SkillRequirement};

/// Skill id to display name lookup used to label requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillCatalog {
    names: HashMap<i64, String>,
}

impl SkillCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, skill_id: i64, name: impl Into<String>) {
        self.names.insert(skill_id, name.into());
    }

    pub fn name_of(&self, skill_id: i64) -> Option<&str> {
        self.names.get(&skill_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl FromIterator<(i64, String)> for SkillCatalog {
    fn from_iter<I: IntoIterator<Item = (i64, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a Skill> for SkillCatalog {
    fn from_iter<I: IntoIterator<Item = &'a Skill>>(iter: I) -> Self {
        iter.into_iter()
            .map(|skill| (skill.id, skill.name.clone()))
            .collect()
    }
}

/// A requirement after deduplication, default-level substitution and name lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedRequirement<'a> {
    pub skill_id: i64,
    pub minimum: ProficiencyLevel,
    pub name: &'a str,
}

/// Deduplicate requirements by skill id (first occurrence wins) and attach
/// names from the catalog. Returns the first skill id the catalog cannot name.
pub(crate) fn resolve_requirements<'a>(
    requirements: &[SkillRequirement],
    catalog: &'a SkillCatalog,
) -> Result<Vec<ResolvedRequirement<'a>>, i64> {
    let mut seen = HashSet::with_capacity(requirements.len());
    let mut resolved = Vec::with_capacity(requirements.len());

    for requirement in requirements {
        if !seen.insert(requirement.skill_id) {
            continue;
        }

        let name = catalog
            .name_of(requirement.skill_id)
            .ok_or(requirement.skill_id)?;

        resolved.push(ResolvedRequirement {
            skill_id: requirement.skill_id,
            // Malformed project configuration gets the most permissive floor.
            minimum: requirement
                .minimum_level
                .unwrap_or(ProficiencyLevel::Beginner),
            name,
        });
    }

    Ok(resolved)
}

/// Indices (into `requirements`) of the requirements a person satisfies.
///
/// Skills with an unrecognized proficiency never satisfy anything. Duplicate
/// skill rows collapse to the strongest recognized level, so each requirement
/// is counted at most once.
pub(crate) fn satisfied_requirements(
    person: &Personnel,
    requirements: &[ResolvedRequirement<'_>],
) -> Vec<usize> {
    let mut strongest: HashMap<i64, ProficiencyLevel> = HashMap::with_capacity(person.skills.len());
    for held in &person.skills {
        let Some(level) = held.proficiency else {
            continue;
        };
        strongest
            .entry(held.skill_id)
            .and_modify(|current| *current = (*current).max(level))
            .or_insert(level);
    }

    requirements
        .iter()
        .enumerate()
        .filter(|(_, requirement)| {
            strongest
                .get(&requirement.skill_id)
                .is_some_and(|level| level.satisfies(requirement.minimum))
        })
        .map(|(idx, _)| idx)
        .collect()
}
