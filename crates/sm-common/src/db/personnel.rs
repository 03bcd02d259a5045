use deadpool_postgres::GenericClient;
use tokio_postgres::Row;
use tracing::instrument;

use super::util::TimedClientExt;
use super::{PgPool, is_unique_violation};
use crate::ExperienceTier;
use crate::api::personnel::PersonnelRecord;

db_error!(PersonnelStorageError {
    #[error("personnel not found: {0}")]
    NotFound(i64),
    #[error("email already registered: {0}")]
    DuplicateEmail(String),
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonnelInsert {
    pub name: String,
    pub email: String,
    pub role: Option<String>,
    pub experience: ExperienceTier,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonnelChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub experience: Option<ExperienceTier>,
}

impl PersonnelChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.role.is_none()
            && self.experience.is_none()
    }
}

const SELECT_COLUMNS: &str = "id, name, email, role, experience, created_at";

fn map_row(row: &Row) -> PersonnelRecord {
    PersonnelRecord {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        role: row.get("role"),
        experience: row.get("experience"),
        created_at: row.get("created_at"),
    }
}

fn map_write_error(err: tokio_postgres::Error, email: Option<&str>) -> PersonnelStorageError {
    match email {
        Some(email) if is_unique_violation(&err) => {
            PersonnelStorageError::DuplicateEmail(email.to_string())
        }
        _ => err.into(),
    }
}

/// All personnel, newest first. `role` filters on an exact match.
#[instrument(skip(pool))]
pub async fn list_personnel(
    pool: &PgPool,
    role: Option<&str>,
) -> Result<Vec<PersonnelRecord>, PersonnelStorageError> {
    let client = pool.get().await?;
    let rows = match role {
        Some(role) => {
            client
                .timed_query(
                    &format!(
                        "SELECT {SELECT_COLUMNS} FROM skillmatch.personnel
                         WHERE role = $1 ORDER BY created_at DESC, id DESC"
                    ),
                    &[&role],
                    "list_personnel_by_role",
                )
                .await?
        }
        None => {
            client
                .timed_query(
                    &format!(
                        "SELECT {SELECT_COLUMNS} FROM skillmatch.personnel
                         ORDER BY created_at DESC, id DESC"
                    ),
                    &[],
                    "list_personnel",
                )
                .await?
        }
    };

    Ok(rows.iter().map(map_row).collect())
}

#[instrument(skip(pool))]
pub async fn get_personnel(
    pool: &PgPool,
    id: i64,
) -> Result<PersonnelRecord, PersonnelStorageError> {
    let client = pool.get().await?;
    fetch_personnel(&client, id).await
}

async fn fetch_personnel(
    client: &impl GenericClient,
    id: i64,
) -> Result<PersonnelRecord, PersonnelStorageError> {
    let row = client
        .timed_query_opt(
            &format!("SELECT {SELECT_COLUMNS} FROM skillmatch.personnel WHERE id = $1"),
            &[&id],
            "get_personnel",
        )
        .await?
        .ok_or(PersonnelStorageError::NotFound(id))?;

    Ok(map_row(&row))
}

#[instrument(skip(pool, insert), fields(email = %insert.email))]
pub async fn insert_personnel(
    pool: &PgPool,
    insert: &PersonnelInsert,
) -> Result<PersonnelRecord, PersonnelStorageError> {
    let client = pool.get().await?;
    let row = client
        .timed_query_one(
            &format!(
                "INSERT INTO skillmatch.personnel (name, email, role, experience)
                 VALUES ($1, $2, $3, $4)
                 RETURNING {SELECT_COLUMNS}"
            ),
            &[
                &insert.name,
                &insert.email,
                &insert.role,
                &insert.experience.as_ref(),
            ],
            "insert_personnel",
        )
        .await
        .map_err(|err| map_write_error(err, Some(&insert.email)))?;

    Ok(map_row(&row))
}

#[instrument(skip(pool, changes))]
pub async fn update_personnel(
    pool: &PgPool,
    id: i64,
    changes: &PersonnelChanges,
) -> Result<PersonnelRecord, PersonnelStorageError> {
    let client = pool.get().await?;
    if changes.is_empty() {
        return fetch_personnel(&client, id).await;
    }

    let experience = changes.experience.map(|tier| tier.as_ref().to_string());
    let row = client
        .timed_query_opt(
            &format!(
                "UPDATE skillmatch.personnel SET
                    name = COALESCE($2, name),
                    email = COALESCE($3, email),
                    role = COALESCE($4, role),
                    experience = COALESCE($5, experience)
                 WHERE id = $1
                 RETURNING {SELECT_COLUMNS}"
            ),
            &[
                &id,
                &changes.name,
                &changes.email,
                &changes.role,
                &experience,
            ],
            "update_personnel",
        )
        .await
        .map_err(|err| map_write_error(err, changes.email.as_deref()))?
        .ok_or(PersonnelStorageError::NotFound(id))?;

    Ok(map_row(&row))
}

/// Delete one person. Their skill assignments cascade.
#[instrument(skip(pool))]
pub async fn delete_personnel(pool: &PgPool, id: i64) -> Result<(), PersonnelStorageError> {
    let client = pool.get().await?;
    let deleted = client
        .timed_execute(
            "DELETE FROM skillmatch.personnel WHERE id = $1",
            &[&id],
            "delete_personnel",
        )
        .await?;

    if deleted == 0 {
        return Err(PersonnelStorageError::NotFound(id));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_generic_client<C: GenericClient>() {}

    #[test]
    fn fetch_helpers_accept_pooled_clients_and_transactions() {
        assert_generic_client::<deadpool_postgres::Client>();
        assert_generic_client::<deadpool_postgres::Transaction<'static>>();
    }

    #[test]
    fn empty_changes_are_detected() {
        assert!(PersonnelChanges::default().is_empty());
        assert!(
            !PersonnelChanges {
                experience: Some(ExperienceTier::Senior),
                ..Default::default()
            }
            .is_empty()
        );
    }

    #[test]
    fn not_found_message_names_the_id() {
        assert_eq!(
            PersonnelStorageError::NotFound(42).to_string(),
            "personnel not found: 42"
        );
    }
}
