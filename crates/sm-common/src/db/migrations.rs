use std::sync::LazyLock;

use deadpool_postgres::PoolError;
use thiserror::Error;
use tokio_postgres::Error as PgError;
use tracing::{info, instrument};

use crate::db::PgPool;
use crate::schema::ALL_TABLES_DDL;

#[derive(Debug, Error)]
pub enum MigrationError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("failed to run migration: {0}")]
    Postgres(#[from] PgError),
}

struct Migration {
    id: i32,
    description: &'static str,
    sql: String,
}

const BOOTSTRAP_SQL: &str = "CREATE SCHEMA IF NOT EXISTS skillmatch;
     CREATE TABLE IF NOT EXISTS skillmatch.schema_migrations (
        id INTEGER PRIMARY KEY,
        description TEXT NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
     );";

static MIGRATIONS: LazyLock<Vec<Migration>> = LazyLock::new(|| {
    vec![
        Migration {
            id: 1,
            description: "personnel, skills, projects and their skill links",
            sql: ALL_TABLES_DDL.concat(),
        },
        Migration {
            id: 2,
            description: "lookup indexes for matching snapshots",
            sql: "CREATE INDEX IF NOT EXISTS idx_project_skills_project
                      ON skillmatch.project_skills(project_id, id);
                  CREATE INDEX IF NOT EXISTS idx_personnel_skills_personnel
                      ON skillmatch.personnel_skills(personnel_id);"
                .to_string(),
        },
    ]
});

/// Apply every migration not yet recorded in `skillmatch.schema_migrations`,
/// each in its own transaction.
#[instrument(skip(pool))]
pub async fn run_migrations(pool: &PgPool) -> Result<usize, MigrationError> {
    let mut client = pool.get().await?;
    client.batch_execute(BOOTSTRAP_SQL).await?;

    let mut applied = 0;
    for migration in MIGRATIONS.iter() {
        let already_applied: bool = client
            .query_one(
                "SELECT EXISTS (SELECT 1 FROM skillmatch.schema_migrations WHERE id = $1)",
                &[&migration.id],
            )
            .await?
            .get(0);

        if already_applied {
            continue;
        }

        let tx = client.transaction().await?;
        tx.batch_execute(&migration.sql).await?;
        tx.execute(
            "INSERT INTO skillmatch.schema_migrations (id, description) VALUES ($1, $2)",
            &[&migration.id, &migration.description],
        )
        .await?;
        tx.commit().await?;

        applied += 1;
        info!(
            id = migration.id,
            description = migration.description,
            "applied migration"
        );
    }

    Ok(applied)
}
