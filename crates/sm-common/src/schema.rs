//! DDL for the `skillmatch` schema. Applied by [`crate::db::migrations`].

pub const SCHEMA_NAME: &str = "skillmatch";

pub const PERSONNEL_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS skillmatch.personnel (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL,
    role VARCHAR(255),
    experience VARCHAR(20) NOT NULL DEFAULT 'Junior',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_personnel_email UNIQUE (email),
    CONSTRAINT chk_personnel_experience
        CHECK (experience IN ('Junior', 'Mid-Level', 'Senior'))
);
CREATE INDEX IF NOT EXISTS idx_personnel_role ON skillmatch.personnel(role);
"#;

pub const SKILLS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS skillmatch.skills (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    category VARCHAR(255) NOT NULL,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_skills_name UNIQUE (name)
);
"#;

/// Proficiency labels are not constrained here: rows loaded by other tools may
/// carry labels the engine does not recognize.
pub const PERSONNEL_SKILLS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS skillmatch.personnel_skills (
    id BIGSERIAL PRIMARY KEY,
    personnel_id BIGINT NOT NULL REFERENCES skillmatch.personnel(id) ON DELETE CASCADE,
    skill_id BIGINT NOT NULL REFERENCES skillmatch.skills(id) ON DELETE CASCADE,
    proficiency VARCHAR(20) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT uq_personnel_skill UNIQUE (personnel_id, skill_id)
);
CREATE INDEX IF NOT EXISTS idx_personnel_skills_skill ON skillmatch.personnel_skills(skill_id);
"#;

pub const PROJECTS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS skillmatch.projects (
    id BIGSERIAL PRIMARY KEY,
    name VARCHAR(255) NOT NULL,
    description TEXT,
    start_date DATE,
    end_date DATE,
    status VARCHAR(20) NOT NULL DEFAULT 'Planning',
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_project_status CHECK (status IN ('Planning', 'Ongoing', 'Completed')),
    CONSTRAINT chk_project_dates
        CHECK (start_date IS NULL OR end_date IS NULL OR end_date >= start_date)
);
"#;

/// `skill_id` carries no foreign key so that a deleted skill surfaces as a
/// data integrity error on matching instead of silently shrinking the
/// requirement list.
pub const PROJECT_SKILLS_DDL: &str = r#"
CREATE TABLE IF NOT EXISTS skillmatch.project_skills (
    id BIGSERIAL PRIMARY KEY,
    project_id BIGINT NOT NULL REFERENCES skillmatch.projects(id) ON DELETE CASCADE,
    skill_id BIGINT NOT NULL,
    min_level VARCHAR(20) NOT NULL DEFAULT 'Beginner',

    CONSTRAINT uq_project_skill UNIQUE (project_id, skill_id)
);
"#;

/// Tables in creation order.
pub const ALL_TABLES_DDL: [&str; 5] = [
    PERSONNEL_DDL,
    SKILLS_DDL,
    PERSONNEL_SKILLS_DDL,
    PROJECTS_DDL,
    PROJECT_SKILLS_DDL,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_lives_in_the_schema() {
        for ddl in ALL_TABLES_DDL {
            assert!(ddl.contains(&format!("{SCHEMA_NAME}.")));
            assert!(ddl.contains("CREATE TABLE IF NOT EXISTS"));
        }
    }

    #[test]
    fn children_are_created_after_parents() {
        let position = |needle: &str| {
            ALL_TABLES_DDL
                .iter()
                .position(|ddl| ddl.contains(&format!("TABLE IF NOT EXISTS skillmatch.{needle} ")))
                .unwrap()
        };
        assert!(position("personnel") < position("personnel_skills"));
        assert!(position("skills") < position("personnel_skills"));
        assert!(position("projects") < position("project_skills"));
    }
}
