use tokio_postgres::Error as PgError;
use tokio_postgres::error::SqlState;

/// Declare a storage error enum carrying the `Pool` and `Postgres` variants
/// every query path needs, plus module-specific variants.
macro_rules! db_error {
    ($name:ident { $($variants:tt)* }) => {
        #[derive(Debug, thiserror::Error)]
        pub enum $name {
            #[error("failed to get postgres connection: {0}")]
            Pool(#[from] deadpool_postgres::PoolError),
            #[error("postgres error: {0}")]
            Postgres(#[from] tokio_postgres::Error),
            $($variants)*
        }
    };
}

pub mod migrations;
pub mod personnel;
pub mod personnel_skills;
pub mod pool;
pub mod projects;
pub mod skills;
pub mod snapshot;
pub mod util;

pub use migrations::{MigrationError, run_migrations};
pub use personnel::{
    PersonnelChanges, PersonnelInsert, PersonnelStorageError, delete_personnel, get_personnel,
    insert_personnel, list_personnel, update_personnel,
};
pub use personnel_skills::{
    PersonnelSkillInsert, PersonnelSkillStorageError, assign_personnel_skill,
    delete_personnel_skill, list_personnel_skills, list_skills_for_personnel,
    update_personnel_skill_proficiency,
};
pub use pool::{DbPoolError, PgPool, create_pool_from_url, create_pool_from_url_checked};
pub use projects::{
    ProjectInsert, ProjectStorageError, RequirementInsert, delete_project, get_project,
    insert_project, list_projects, update_project,
};
pub use skills::{
    SkillInsert, SkillStorageError, delete_skill, get_skill, insert_skill, list_skills,
    update_skill,
};
pub use snapshot::{SnapshotStorageError, fetch_match_snapshot};

pub(crate) fn is_unique_violation(err: &PgError) -> bool {
    err.code() == Some(&SqlState::UNIQUE_VIOLATION)
}

pub(crate) fn is_foreign_key_violation(err: &PgError) -> bool {
    err.code() == Some(&SqlState::FOREIGN_KEY_VIOLATION)
}
