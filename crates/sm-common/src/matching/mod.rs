//! Skill matching: proficiency scale, requirement evaluation and ranking.
//!
//! Everything here is a pure function of its inputs. Fetching the inputs and
//! turning the output into a response belongs to the storage and HTTP layers.

pub mod pipeline;
pub mod proficiency;
pub mod skills;

pub use pipeline::{MatchError, MatchResult, MatchSnapshot, match_personnel, score_percent};
pub use proficiency::ProficiencyLevel;
pub use skills::SkillCatalog;
