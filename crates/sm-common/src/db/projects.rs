use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use deadpool_postgres::GenericClient;
use tokio_postgres::Row;
use tracing::{info, instrument};

use super::util::TimedClientExt;
use super::PgPool;
use crate::api::project::{ProjectRecord, ProjectSkillRecord};
use crate::{ProficiencyLevel, ProjectStatus};

db_error!(ProjectStorageError {
    #[error("project not found: {0}")]
    NotFound(i64),
    #[error("skill not found: {0}")]
    UnknownSkill(i64),
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequirementInsert {
    pub skill_id: i64,
    pub min_level: ProficiencyLevel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInsert {
    pub name: String,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub status: ProjectStatus,
    pub requirements: Vec<RequirementInsert>,
}

const SELECT_COLUMNS: &str = "id, name, description, start_date, end_date, status, created_at";

fn map_project_row(row: &Row, skills: Vec<ProjectSkillRecord>) -> ProjectRecord {
    ProjectRecord {
        id: row.get("id"),
        name: row.get("name"),
        description: row.get("description"),
        start_date: row.get("start_date"),
        end_date: row.get("end_date"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        skills,
    }
}

/// Requirements for the given projects, grouped by project id in insertion order.
async fn fetch_requirements(
    client: &impl GenericClient,
    project_ids: &[i64],
) -> Result<HashMap<i64, Vec<ProjectSkillRecord>>, ProjectStorageError> {
    let rows = client
        .timed_query(
            "SELECT ps.project_id, ps.skill_id, s.name AS skill_name, ps.min_level
             FROM skillmatch.project_skills ps
             LEFT JOIN skillmatch.skills s ON s.id = ps.skill_id
             WHERE ps.project_id = ANY($1)
             ORDER BY ps.project_id, ps.id",
            &[&project_ids],
            "fetch_project_requirements",
        )
        .await?;

    let mut grouped: HashMap<i64, Vec<ProjectSkillRecord>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.get("project_id"))
            .or_default()
            .push(ProjectSkillRecord {
                skill_id: row.get("skill_id"),
                skill_name: row.get("skill_name"),
                min_level: row.get("min_level"),
            });
    }
    Ok(grouped)
}

async fn fetch_project(
    client: &impl GenericClient,
    id: i64,
) -> Result<ProjectRecord, ProjectStorageError> {
    let row = client
        .timed_query_opt(
            &format!("SELECT {SELECT_COLUMNS} FROM skillmatch.projects WHERE id = $1"),
            &[&id],
            "get_project",
        )
        .await?
        .ok_or(ProjectStorageError::NotFound(id))?;

    let mut requirements = fetch_requirements(client, &[id]).await?;
    Ok(map_project_row(
        &row,
        requirements.remove(&id).unwrap_or_default(),
    ))
}

async fn ensure_skills_exist(
    client: &impl GenericClient,
    requirements: &[RequirementInsert],
) -> Result<(), ProjectStorageError> {
    if requirements.is_empty() {
        return Ok(());
    }

    let ids: Vec<i64> = requirements.iter().map(|r| r.skill_id).collect();
    let rows = client
        .timed_query(
            "SELECT id FROM skillmatch.skills WHERE id = ANY($1)",
            &[&ids],
            "project_skills_exist",
        )
        .await?;
    let known: HashSet<i64> = rows.iter().map(|row| row.get(0)).collect();

    match ids.into_iter().find(|id| !known.contains(id)) {
        Some(missing) => Err(ProjectStorageError::UnknownSkill(missing)),
        None => Ok(()),
    }
}

async fn insert_requirements(
    client: &impl GenericClient,
    project_id: i64,
    requirements: &[RequirementInsert],
) -> Result<(), ProjectStorageError> {
    for requirement in requirements {
        client
            .timed_execute(
                "INSERT INTO skillmatch.project_skills (project_id, skill_id, min_level)
                 VALUES ($1, $2, $3)",
                &[
                    &project_id,
                    &requirement.skill_id,
                    &requirement.min_level.as_ref(),
                ],
                "insert_project_requirement",
            )
            .await?;
    }
    Ok(())
}

/// All projects with their requirements, newest first.
#[instrument(skip(pool))]
pub async fn list_projects(pool: &PgPool) -> Result<Vec<ProjectRecord>, ProjectStorageError> {
    let client = pool.get().await?;
    let rows = client
        .timed_query(
            &format!(
                "SELECT {SELECT_COLUMNS} FROM skillmatch.projects
                 ORDER BY created_at DESC, id DESC"
            ),
            &[],
            "list_projects",
        )
        .await?;

    let ids: Vec<i64> = rows.iter().map(|row| row.get("id")).collect();
    let mut requirements = fetch_requirements(&client, &ids).await?;

    Ok(rows
        .iter()
        .map(|row| {
            let id: i64 = row.get("id");
            map_project_row(row, requirements.remove(&id).unwrap_or_default())
        })
        .collect())
}

#[instrument(skip(pool))]
pub async fn get_project(pool: &PgPool, id: i64) -> Result<ProjectRecord, ProjectStorageError> {
    let client = pool.get().await?;
    fetch_project(&client, id).await
}

/// Create a project and its requirements in one transaction.
#[instrument(skip(pool, insert), fields(name = %insert.name, requirements = insert.requirements.len()))]
pub async fn insert_project(
    pool: &PgPool,
    insert: &ProjectInsert,
) -> Result<ProjectRecord, ProjectStorageError> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    ensure_skills_exist(&tx, &insert.requirements).await?;

    let id: i64 = tx
        .timed_query_one(
            "INSERT INTO skillmatch.projects (name, description, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
            &[
                &insert.name,
                &insert.description,
                &insert.start_date,
                &insert.end_date,
                &insert.status.as_ref(),
            ],
            "insert_project",
        )
        .await?
        .get("id");

    insert_requirements(&tx, id, &insert.requirements).await?;
    let record = fetch_project(&tx, id).await?;
    tx.commit().await?;

    info!(project_id = id, "project created");
    Ok(record)
}

/// Replace a project's fields and its whole requirement list in one transaction.
#[instrument(skip(pool, update), fields(requirements = update.requirements.len()))]
pub async fn update_project(
    pool: &PgPool,
    id: i64,
    update: &ProjectInsert,
) -> Result<ProjectRecord, ProjectStorageError> {
    let mut client = pool.get().await?;
    let tx = client.transaction().await?;

    let updated = tx
        .timed_execute(
            "UPDATE skillmatch.projects
             SET name = $2, description = $3, start_date = $4, end_date = $5, status = $6
             WHERE id = $1",
            &[
                &id,
                &update.name,
                &update.description,
                &update.start_date,
                &update.end_date,
                &update.status.as_ref(),
            ],
            "update_project",
        )
        .await?;
    if updated == 0 {
        return Err(ProjectStorageError::NotFound(id));
    }

    ensure_skills_exist(&tx, &update.requirements).await?;
    tx.timed_execute(
        "DELETE FROM skillmatch.project_skills WHERE project_id = $1",
        &[&id],
        "clear_project_requirements",
    )
    .await?;
    insert_requirements(&tx, id, &update.requirements).await?;

    let record = fetch_project(&tx, id).await?;
    tx.commit().await?;
    Ok(record)
}

#[instrument(skip(pool))]
pub async fn delete_project(pool: &PgPool, id: i64) -> Result<(), ProjectStorageError> {
    let client = pool.get().await?;
    let deleted = client
        .timed_execute(
            "DELETE FROM skillmatch.projects WHERE id = $1",
            &[&id],
            "delete_project",
        )
        .await?;

    if deleted == 0 {
        return Err(ProjectStorageError::NotFound(id));
    }
    Ok(())
}
