use std::cmp::Ordering;

use serde::Serialize;
use thiserror::Error;

use super::skills::{SkillCatalog, resolve_requirements, satisfied_requirements};
use crate::{Personnel, SkillRequirement};

/// One recommended person for a project. Derived on every request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    pub personnel_id: i64,
    pub name: String,
    pub matched_skill_count: usize,
    pub total_required_skill_count: usize,
    pub match_score_percent: u8,
    pub matched_skill_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("required skill {0} does not exist in the skill catalog")]
    UnknownSkill(i64),
}

/// Engine inputs for one project, materialized by the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSnapshot {
    pub project_id: i64,
    pub requirements: Vec<SkillRequirement>,
    pub roster: Vec<Personnel>,
    pub catalog: SkillCatalog,
}

impl MatchSnapshot {
    pub fn rank(&self) -> Result<Vec<MatchResult>, MatchError> {
        match_personnel(&self.requirements, &self.roster, &self.catalog)
    }
}

/// Rank every person in `roster` against a project's requirements.
///
/// Only people satisfying at least one requirement are returned. The result is
/// ordered by score descending, then matched count descending, then personnel
/// id ascending. Fails only when a requirement names a skill missing from
/// `catalog`.
pub fn match_personnel(
    requirements: &[SkillRequirement],
    roster: &[Personnel],
    catalog: &SkillCatalog,
) -> Result<Vec<MatchResult>, MatchError> {
    if requirements.is_empty() {
        return Ok(Vec::new());
    }

    let resolved = resolve_requirements(requirements, catalog).map_err(MatchError::UnknownSkill)?;
    let total = resolved.len();

    let mut ranked: Vec<MatchResult> = roster
        .iter()
        .filter_map(|person| {
            let satisfied = satisfied_requirements(person, &resolved);
            if satisfied.is_empty() {
                return None;
            }

            Some(MatchResult {
                personnel_id: person.id,
                name: person.name.clone(),
                matched_skill_count: satisfied.len(),
                total_required_skill_count: total,
                match_score_percent: score_percent(satisfied.len(), total),
                matched_skill_names: satisfied
                    .iter()
                    .map(|&idx| resolved[idx].name.to_string())
                    .collect(),
            })
        })
        .collect();

    ranked.sort_by(compare_ranked);
    Ok(ranked)
}

/// `round(matched / total * 100)` with half-up rounding, in integer arithmetic.
pub fn score_percent(matched: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let matched = matched.min(total);
    ((200 * matched + total) / (2 * total)) as u8
}

fn compare_ranked(a: &MatchResult, b: &MatchResult) -> Ordering {
    b.match_score_percent
        .cmp(&a.match_score_percent)
        .then_with(|| b.matched_skill_count.cmp(&a.matched_skill_count))
        .then_with(|| a.personnel_id.cmp(&b.personnel_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PersonnelSkill, ProficiencyLevel};
    use ProficiencyLevel::*;

    const SKILL_A: i64 = 1;
    const SKILL_B: i64 = 2;
    const SKILL_C: i64 = 3;

    fn catalog() -> SkillCatalog {
        [
            (SKILL_A, "Skill A".to_string()),
            (SKILL_B, "Skill B".to_string()),
            (SKILL_C, "Skill C".to_string()),
        ]
        .into_iter()
        .collect()
    }

    fn req(skill_id: i64, level: ProficiencyLevel) -> SkillRequirement {
        SkillRequirement {
            skill_id,
            minimum_level: Some(level),
        }
    }

    fn person(id: i64, name: &str, skills: &[(i64, ProficiencyLevel)]) -> Personnel {
        Personnel {
            id,
            name: name.into(),
            skills: skills
                .iter()
                .map(|&(skill_id, level)| PersonnelSkill {
                    skill_id,
                    proficiency: Some(level),
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn single_requirement_keeps_only_qualified_people() {
        let roster = vec![
            person(1, "Alice", &[(SKILL_A, Advanced)]),
            person(2, "Bob", &[(SKILL_A, Beginner)]),
            person(3, "Carol", &[]),
        ];

        let results = match_personnel(&[req(SKILL_A, Intermediate)], &roster, &catalog()).unwrap();

        assert_eq!(
            results,
            vec![MatchResult {
                personnel_id: 1,
                name: "Alice".into(),
                matched_skill_count: 1,
                total_required_skill_count: 1,
                match_score_percent: 100,
                matched_skill_names: vec!["Skill A".into()],
            }]
        );
    }

    #[test]
    fn partial_match_scores_half() {
        let roster = vec![person(4, "Dan", &[(SKILL_A, Expert), (SKILL_B, Advanced)])];

        let results = match_personnel(
            &[req(SKILL_A, Beginner), req(SKILL_B, Expert)],
            &roster,
            &catalog(),
        )
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].matched_skill_count, 1);
        assert_eq!(results[0].total_required_skill_count, 2);
        assert_eq!(results[0].match_score_percent, 50);
        assert_eq!(results[0].matched_skill_names, vec!["Skill A".to_string()]);
    }

    #[test]
    fn empty_requirements_match_nobody() {
        let roster = vec![person(1, "Alice", &[(SKILL_A, Expert)])];
        assert!(match_personnel(&[], &roster, &catalog()).unwrap().is_empty());
        assert!(match_personnel(&[], &roster, &SkillCatalog::new()).unwrap().is_empty());
    }

    #[test]
    fn empty_roster_yields_empty_result() {
        let results = match_personnel(&[req(SKILL_A, Beginner)], &[], &catalog()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn ties_break_on_personnel_id() {
        let skills = [(SKILL_A, Expert), (SKILL_B, Expert)];
        let roster = vec![person(5, "Eve", &skills), person(3, "Finn", &skills)];

        let results = match_personnel(
            &[req(SKILL_A, Advanced), req(SKILL_B, Advanced)],
            &roster,
            &catalog(),
        )
        .unwrap();

        let order: Vec<(&str, u8)> = results
            .iter()
            .map(|r| (r.name.as_str(), r.match_score_percent))
            .collect();
        assert_eq!(order, vec![("Finn", 100), ("Eve", 100)]);
    }

    #[test]
    fn unknown_skill_is_an_integrity_error() {
        let roster = vec![person(1, "Alice", &[(SKILL_A, Expert)])];
        let err = match_personnel(&[req(42, Advanced)], &roster, &catalog()).unwrap_err();
        assert_eq!(err, MatchError::UnknownSkill(42));

        // Reported even when nobody could have matched.
        let err = match_personnel(&[req(42, Advanced)], &[], &catalog()).unwrap_err();
        assert_eq!(err, MatchError::UnknownSkill(42));
    }

    #[test]
    fn exact_level_counts_as_match() {
        let roster = vec![person(1, "Gail", &[(SKILL_C, Advanced)])];
        let results = match_personnel(&[req(SKILL_C, Advanced)], &roster, &catalog()).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].match_score_percent, 100);
    }

    #[test]
    fn matched_names_follow_requirement_order() {
        let roster = vec![person(
            1,
            "Hana",
            &[(SKILL_C, Expert), (SKILL_B, Expert), (SKILL_A, Expert)],
        )];
        let results = match_personnel(
            &[req(SKILL_B, Beginner), req(SKILL_C, Beginner), req(SKILL_A, Beginner)],
            &roster,
            &catalog(),
        )
        .unwrap();

        assert_eq!(
            results[0].matched_skill_names,
            vec!["Skill B".to_string(), "Skill C".into(), "Skill A".into()]
        );
    }

    #[test]
    fn duplicate_requirements_are_not_double_counted() {
        let roster = vec![person(1, "Ivan", &[(SKILL_A, Expert)])];
        let results = match_personnel(
            &[req(SKILL_A, Beginner), req(SKILL_B, Beginner), req(SKILL_A, Beginner)],
            &roster,
            &catalog(),
        )
        .unwrap();

        assert_eq!(results[0].matched_skill_count, 1);
        assert_eq!(results[0].total_required_skill_count, 2);
        assert_eq!(results[0].match_score_percent, 50);
    }

    #[test]
    fn missing_minimum_level_defaults_to_beginner() {
        let roster = vec![person(1, "Jo", &[(SKILL_A, Beginner)])];
        let requirements = [SkillRequirement {
            skill_id: SKILL_A,
            minimum_level: None,
        }];
        let results = match_personnel(&requirements, &roster, &catalog()).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn unrecognized_personnel_level_never_matches() {
        let roster = vec![Personnel {
            id: 1,
            name: "Kim".into(),
            skills: vec![PersonnelSkill {
                skill_id: SKILL_A,
                proficiency: None,
            }],
            ..Default::default()
        }];
        let results = match_personnel(&[req(SKILL_A, Beginner)], &roster, &catalog()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn higher_scores_rank_first() {
        let roster = vec![
            person(1, "One", &[(SKILL_A, Expert)]),
            person(2, "Three", &[(SKILL_A, Expert), (SKILL_B, Expert), (SKILL_C, Expert)]),
            person(3, "Two", &[(SKILL_A, Expert), (SKILL_C, Expert)]),
        ];
        let results = match_personnel(
            &[req(SKILL_A, Beginner), req(SKILL_B, Beginner), req(SKILL_C, Beginner)],
            &roster,
            &catalog(),
        )
        .unwrap();

        let scores: Vec<(i64, u8)> = results
            .iter()
            .map(|r| (r.personnel_id, r.match_score_percent))
            .collect();
        assert_eq!(scores, vec![(2, 100), (3, 67), (1, 33)]);
    }

    #[test]
    fn repeated_calls_are_identical() {
        let roster = vec![
            person(9, "Lee", &[(SKILL_A, Intermediate), (SKILL_B, Expert)]),
            person(4, "Max", &[(SKILL_B, Expert)]),
        ];
        let requirements = [req(SKILL_A, Intermediate), req(SKILL_B, Advanced)];
        let catalog = catalog();

        let first = match_personnel(&requirements, &roster, &catalog).unwrap();
        let second = match_personnel(&requirements, &roster, &catalog).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn snapshot_rank_delegates_to_engine() {
        let snapshot = MatchSnapshot {
            project_id: 10,
            requirements: vec![req(SKILL_A, Beginner)],
            roster: vec![person(1, "Nia", &[(SKILL_A, Beginner)])],
            catalog: catalog(),
        };
        assert_eq!(snapshot.rank().unwrap().len(), 1);
    }

    #[test]
    fn score_percent_rounds_half_up() {
        assert_eq!(score_percent(1, 2), 50);
        assert_eq!(score_percent(1, 3), 33);
        assert_eq!(score_percent(2, 3), 67);
        assert_eq!(score_percent(1, 8), 13);
        assert_eq!(score_percent(3, 8), 38);
        assert_eq!(score_percent(4, 4), 100);
        assert_eq!(score_percent(0, 5), 0);
    }

    #[test]
    fn serializes_with_snake_case_fields() {
        let result = MatchResult {
            personnel_id: 1,
            name: "Alice".into(),
            matched_skill_count: 1,
            total_required_skill_count: 2,
            match_score_percent: 50,
            matched_skill_names: vec!["Rust".into()],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["match_score_percent"], 50);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn level() -> impl Strategy<Value = Option<ProficiencyLevel>> {
            prop_oneof![
                1 => Just(None),
                4 => prop::sample::select(ProficiencyLevel::ALL.to_vec()).prop_map(Some),
            ]
        }

        fn roster() -> impl Strategy<Value = Vec<Personnel>> {
            prop::collection::vec(
                (1i64..40, prop::collection::vec((1i64..=3, level()), 0..6)),
                0..25,
            )
            .prop_map(|people| {
                people
                    .into_iter()
                    .map(|(id, skills)| Personnel {
                        id,
                        name: format!("p{id}"),
                        skills: skills
                            .into_iter()
                            .map(|(skill_id, proficiency)| PersonnelSkill {
                                skill_id,
                                proficiency,
                            })
                            .collect(),
                        ..Default::default()
                    })
                    .collect()
            })
        }

        fn requirements() -> impl Strategy<Value = Vec<SkillRequirement>> {
            prop::collection::vec((1i64..=3, level()), 0..5).prop_map(|reqs| {
                reqs.into_iter()
                    .map(|(skill_id, minimum_level)| SkillRequirement {
                        skill_id,
                        minimum_level,
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn results_are_bounded_sorted_and_non_empty(
                roster in roster(),
                requirements in requirements(),
            ) {
                let results = match_personnel(&requirements, &roster, &catalog()).unwrap();

                for result in &results {
                    prop_assert!(result.matched_skill_count >= 1);
                    prop_assert!(result.match_score_percent <= 100);
                    prop_assert!(result.matched_skill_count <= result.total_required_skill_count);
                    let expected = (result.matched_skill_count as f64
                        / result.total_required_skill_count as f64
                        * 100.0
                        + 0.5)
                        .floor() as u8;
                    prop_assert_eq!(result.match_score_percent, expected);
                    prop_assert_eq!(result.matched_skill_names.len(), result.matched_skill_count);
                }

                for pair in results.windows(2) {
                    prop_assert_ne!(compare_ranked(&pair[0], &pair[1]), Ordering::Greater);
                }

                let again = match_personnel(&requirements, &roster, &catalog()).unwrap();
                prop_assert_eq!(results, again);
            }
        }
    }
}
