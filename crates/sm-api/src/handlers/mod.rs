pub mod health;
pub mod matches;
pub mod pagination;
pub mod personnel;
pub mod personnel_skills;
pub mod projects;
pub mod skills;
