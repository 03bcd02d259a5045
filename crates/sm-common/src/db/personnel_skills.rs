use tokio_postgres::Row;
use tracing::instrument;

use super::util::TimedClientExt;
use super::{PgPool, is_foreign_key_violation, is_unique_violation};
use crate::ProficiencyLevel;
use crate::api::personnel_skill::{HeldSkillRecord, PersonnelSkillRecord};

db_error!(PersonnelSkillStorageError {
    #[error("personnel skill not found: {0}")]
    NotFound(i64),
    #[error("personnel not found: {0}")]
    UnknownPersonnel(i64),
    #[error("skill not found: {0}")]
    UnknownSkill(i64),
    #[error("skill {skill_id} is already assigned to personnel {personnel_id}")]
    AlreadyAssigned { personnel_id: i64, skill_id: i64 },
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonnelSkillInsert {
    pub personnel_id: i64,
    pub skill_id: i64,
    pub proficiency: ProficiencyLevel,
}

const JOINED_SELECT: &str = "SELECT ps.id, ps.personnel_id, p.name AS personnel_name,
        ps.skill_id, s.name AS skill_name, ps.proficiency";

fn map_joined_row(row: &Row) -> PersonnelSkillRecord {
    PersonnelSkillRecord {
        id: row.get("id"),
        personnel_id: row.get("personnel_id"),
        personnel_name: row.get("personnel_name"),
        skill_id: row.get("skill_id"),
        skill_name: row.get("skill_name"),
        proficiency: row.get("proficiency"),
    }
}

fn map_assign_error(
    err: tokio_postgres::Error,
    insert: &PersonnelSkillInsert,
) -> PersonnelSkillStorageError {
    if is_unique_violation(&err) {
        return PersonnelSkillStorageError::AlreadyAssigned {
            personnel_id: insert.personnel_id,
            skill_id: insert.skill_id,
        };
    }

    if is_foreign_key_violation(&err) {
        let constraint = err
            .as_db_error()
            .and_then(|db| db.constraint())
            .unwrap_or_default();
        return if constraint.contains("personnel_id") {
            PersonnelSkillStorageError::UnknownPersonnel(insert.personnel_id)
        } else {
            PersonnelSkillStorageError::UnknownSkill(insert.skill_id)
        };
    }

    err.into()
}

/// Every assignment joined with person and skill names, newest first.
#[instrument(skip(pool))]
pub async fn list_personnel_skills(
    pool: &PgPool,
) -> Result<Vec<PersonnelSkillRecord>, PersonnelSkillStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query(
            &format!(
                "{JOINED_SELECT}
                 FROM skillmatch.personnel_skills ps
                 JOIN skillmatch.personnel p ON p.id = ps.personnel_id
                 JOIN skillmatch.skills s ON s.id = ps.skill_id
                 ORDER BY ps.created_at DESC, ps.id DESC"
            ),
            &[],
            "list_personnel_skills",
        )
        .await?;

    Ok(rows.iter().map(map_joined_row).collect())
}

/// Skills held by one person, alphabetically.
#[instrument(skip(pool))]
pub async fn list_skills_for_personnel(
    pool: &PgPool,
    personnel_id: i64,
) -> Result<Vec<HeldSkillRecord>, PersonnelSkillStorageError> {
    let client = pool.get().await?;
    let exists = client
        .timed_query_opt(
            "SELECT 1 FROM skillmatch.personnel WHERE id = $1",
            &[&personnel_id],
            "personnel_exists",
        )
        .await?;
    if exists.is_none() {
        return Err(PersonnelSkillStorageError::UnknownPersonnel(personnel_id));
    }

    let rows = client
        .timed_query(
            "SELECT ps.id, ps.skill_id, s.name AS skill_name, s.category, ps.proficiency
             FROM skillmatch.personnel_skills ps
             JOIN skillmatch.skills s ON s.id = ps.skill_id
             WHERE ps.personnel_id = $1
             ORDER BY s.name, ps.id",
            &[&personnel_id],
            "list_skills_for_personnel",
        )
        .await?;

    Ok(rows
        .iter()
        .map(|row| HeldSkillRecord {
            id: row.get("id"),
            skill_id: row.get("skill_id"),
            skill_name: row.get("skill_name"),
            category: row.get("category"),
            proficiency: row.get("proficiency"),
        })
        .collect())
}

#[instrument(skip(pool))]
pub async fn assign_personnel_skill(
    pool: &PgPool,
    insert: &PersonnelSkillInsert,
) -> Result<PersonnelSkillRecord, PersonnelSkillStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_one(
            &format!(
                "WITH ps AS (
                    INSERT INTO skillmatch.personnel_skills (personnel_id, skill_id, proficiency)
                    VALUES ($1, $2, $3)
                    RETURNING id, personnel_id, skill_id, proficiency
                 )
                 {JOINED_SELECT}
                 FROM ps
                 JOIN skillmatch.personnel p ON p.id = ps.personnel_id
                 JOIN skillmatch.skills s ON s.id = ps.skill_id"
            ),
            &[
                &insert.personnel_id,
                &insert.skill_id,
                &insert.proficiency.as_ref(),
            ],
            "assign_personnel_skill",
        )
        .await
        .map_err(|err| map_assign_error(err, insert))?;

    Ok(map_joined_row(&row))
}

#[instrument(skip(pool))]
pub async fn update_personnel_skill_proficiency(
    pool: &PgPool,
    id: i64,
    proficiency: ProficiencyLevel,
) -> Result<PersonnelSkillRecord, PersonnelSkillStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_opt(
            &format!(
                "WITH ps AS (
                    UPDATE skillmatch.personnel_skills SET proficiency = $2
                    WHERE id = $1
                    RETURNING id, personnel_id, skill_id, proficiency
                 )
                 {JOINED_SELECT}
                 FROM ps
                 JOIN skillmatch.personnel p ON p.id = ps.personnel_id
                 JOIN skillmatch.skills s ON s.id = ps.skill_id"
            ),
            &[&id, &proficiency.as_ref()],
            "update_personnel_skill_proficiency",
        )
        .await?
        .ok_or(PersonnelSkillStorageError::NotFound(id))?;

    Ok(map_joined_row(&row))
}

#[instrument(skip(pool))]
pub async fn delete_personnel_skill(
    pool: &PgPool,
    id: i64,
) -> Result<(), PersonnelSkillStorageError> {
    let client = pool.get().await?;
    let deleted = client
        .timed_execute(
            "DELETE FROM skillmatch.personnel_skills WHERE id = $1",
            &[&id],
            "delete_personnel_skill",
        )
        .await?;

    if deleted == 0 {
        return Err(PersonnelSkillStorageError::NotFound(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_assignment_message_names_both_ids() {
        let err = PersonnelSkillStorageError::AlreadyAssigned {
            personnel_id: 3,
            skill_id: 9,
        };
        assert_eq!(err.to_string(), "skill 9 is already assigned to personnel 3");
    }
}
