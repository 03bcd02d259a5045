use std::collections::HashMap;

use tokio_postgres::IsolationLevel;
use tracing::{debug, instrument, warn};

use super::util::TimedClientExt;
use super::PgPool;
use crate::matching::{MatchSnapshot, SkillCatalog};
use crate::{ExperienceTier, Personnel, PersonnelSkill, ProficiencyLevel, SkillRequirement};

db_error!(SnapshotStorageError {});

/// Parse a stored proficiency label. Unrecognized labels become "no level"
/// and are reported here so the engine itself never has to log.
fn parse_stored_level(label: &str, table: &'static str, row_id: i64) -> Option<ProficiencyLevel> {
    let level = ProficiencyLevel::from_label(label);
    if level.is_none() {
        warn!(table, row_id, label, "unrecognized proficiency label");
    }
    level
}

fn parse_stored_experience(label: &str, personnel_id: i64) -> ExperienceTier {
    label.parse().unwrap_or_else(|_| {
        warn!(personnel_id, label, "unrecognized experience tier, using default");
        ExperienceTier::default()
    })
}

/// Load everything the matching engine needs for one project from a single
/// read-only snapshot. Returns `None` when the project does not exist.
///
/// Requirements keep insertion order. They are `LEFT JOIN`ed to the skill
/// table, so a requirement whose skill has been deleted is missing from the
/// catalog and the engine reports it as an integrity error.
#[instrument(skip(pool))]
pub async fn fetch_match_snapshot(
    pool: &PgPool,
    project_id: i64,
) -> Result<Option<MatchSnapshot>, SnapshotStorageError> {
    let mut client = pool.get().await?;
    let tx = client
        .build_transaction()
        .isolation_level(IsolationLevel::RepeatableRead)
        .read_only(true)
        .start()
        .await?;

    let project = tx
        .timed_query_opt(
            "SELECT id FROM skillmatch.projects WHERE id = $1",
            &[&project_id],
            "snapshot_project",
        )
        .await?;
    if project.is_none() {
        return Ok(None);
    }

    let requirement_rows = tx
        .timed_query(
            "SELECT ps.id, ps.skill_id, ps.min_level, s.name AS skill_name
             FROM skillmatch.project_skills ps
             LEFT JOIN skillmatch.skills s ON s.id = ps.skill_id
             WHERE ps.project_id = $1
             ORDER BY ps.id",
            &[&project_id],
            "snapshot_requirements",
        )
        .await?;

    let mut catalog = SkillCatalog::new();
    let mut requirements = Vec::with_capacity(requirement_rows.len());
    for row in &requirement_rows {
        let skill_id: i64 = row.get("skill_id");
        let min_level: String = row.get("min_level");
        requirements.push(SkillRequirement {
            skill_id,
            minimum_level: parse_stored_level(&min_level, "project_skills", row.get("id")),
        });
        if let Some(name) = row.get::<_, Option<String>>("skill_name") {
            catalog.insert(skill_id, name);
        }
    }

    let person_rows = tx
        .timed_query(
            "SELECT id, name, role, experience FROM skillmatch.personnel ORDER BY id",
            &[],
            "snapshot_roster",
        )
        .await?;
    let skill_rows = tx
        .timed_query(
            "SELECT id, personnel_id, skill_id, proficiency
             FROM skillmatch.personnel_skills
             ORDER BY personnel_id, id",
            &[],
            "snapshot_roster_skills",
        )
        .await?;
    tx.commit().await?;

    let mut held: HashMap<i64, Vec<PersonnelSkill>> = HashMap::new();
    for row in &skill_rows {
        let proficiency: String = row.get("proficiency");
        held.entry(row.get("personnel_id"))
            .or_default()
            .push(PersonnelSkill {
                skill_id: row.get("skill_id"),
                proficiency: parse_stored_level(&proficiency, "personnel_skills", row.get("id")),
            });
    }

    let roster: Vec<Personnel> = person_rows
        .iter()
        .map(|row| {
            let id: i64 = row.get("id");
            let experience: String = row.get("experience");
            Personnel {
                id,
                name: row.get("name"),
                role: row.get("role"),
                experience: parse_stored_experience(&experience, id),
                skills: held.remove(&id).unwrap_or_default(),
            }
        })
        .collect();

    debug!(
        project_id,
        requirements = requirements.len(),
        roster = roster.len(),
        "loaded match snapshot"
    );

    Ok(Some(MatchSnapshot {
        project_id,
        requirements,
        roster,
        catalog,
    }))
}
