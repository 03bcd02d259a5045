use tokio_postgres::Row;
use tracing::instrument;

use super::util::TimedClientExt;
use super::{PgPool, is_unique_violation};
use crate::Skill;

db_error!(SkillStorageError {
    #[error("skill not found: {0}")]
    NotFound(i64),
    #[error("skill already exists: {0}")]
    DuplicateName(String),
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillInsert {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
}

fn map_row(row: &Row) -> Skill {
    Skill {
        id: row.get("id"),
        name: row.get("name"),
        category: row.get("category"),
        description: row.get("description"),
    }
}

fn map_write_error(err: tokio_postgres::Error, name: &str) -> SkillStorageError {
    if is_unique_violation(&err) {
        SkillStorageError::DuplicateName(name.to_string())
    } else {
        err.into()
    }
}

/// Skill catalog, newest first.
#[instrument(skip(pool))]
pub async fn list_skills(pool: &PgPool) -> Result<Vec<Skill>, SkillStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query(
            "SELECT id, name, category, description FROM skillmatch.skills
             ORDER BY created_at DESC, id DESC",
            &[],
            "list_skills",
        )
        .await?;

    Ok(rows.iter().map(map_row).collect())
}

#[instrument(skip(pool))]
pub async fn get_skill(pool: &PgPool, id: i64) -> Result<Skill, SkillStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_opt(
            "SELECT id, name, category, description FROM skillmatch.skills WHERE id = $1",
            &[&id],
            "get_skill",
        )
        .await?
        .ok_or(SkillStorageError::NotFound(id))?;

    Ok(map_row(&row))
}

#[instrument(skip(pool, insert), fields(name = %insert.name))]
pub async fn insert_skill(pool: &PgPool, insert: &SkillInsert) -> Result<Skill, SkillStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_one(
            "INSERT INTO skillmatch.skills (name, category, description)
             VALUES ($1, $2, $3)
             RETURNING id, name, category, description",
            &[&insert.name, &insert.category, &insert.description],
            "insert_skill",
        )
        .await
        .map_err(|err| map_write_error(err, &insert.name))?;

    Ok(map_row(&row))
}

/// Replace every editable column of a skill.
#[instrument(skip(pool, update))]
pub async fn update_skill(
    pool: &PgPool,
    id: i64,
    update: &SkillInsert,
) -> Result<Skill, SkillStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_opt(
            "UPDATE skillmatch.skills
             SET name = $2, category = $3, description = $4
             WHERE id = $1
             RETURNING id, name, category, description",
            &[&id, &update.name, &update.category, &update.description],
            "update_skill",
        )
        .await
        .map_err(|err| map_write_error(err, &update.name))?
        .ok_or(SkillStorageError::NotFound(id))?;

    Ok(map_row(&row))
}

/// Delete a skill. Personnel assignments cascade; project requirements that
/// still reference it surface as integrity errors when matching.
#[instrument(skip(pool))]
pub async fn delete_skill(pool: &PgPool, id: i64) -> Result<(), SkillStorageError> {
    let client = pool.get().await?;
    let deleted = client
        .timed_execute(
            "DELETE FROM skillmatch.skills WHERE id = $1",
            &[&id],
            "delete_skill",
        )
        .await?;

    if deleted == 0 {
        return Err(SkillStorageError::NotFound(id));
    }
    Ok(())
}
