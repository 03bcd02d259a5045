use std::cmp::Ordering;

use serde::Serialize;
use strum::{AsRefStr, EnumString};

/// Ordinal skill strength. Ordering is defined by [`ProficiencyLevel::weight`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum ProficiencyLevel {
    Beginner = 1,
    Intermediate = 2,
    Advanced = 3,
    Expert = 4,
}

impl ProficiencyLevel {
    pub const ALL: [ProficiencyLevel; 4] = [
        ProficiencyLevel::Beginner,
        ProficiencyLevel::Intermediate,
        ProficiencyLevel::Advanced,
        ProficiencyLevel::Expert,
    ];

    pub const fn weight(self) -> u8 {
        self as u8
    }

    /// Parse a stored or user supplied label. Case and surrounding whitespace
    /// are ignored; anything else yields `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        label.trim().parse().ok()
    }

    /// `true` when this level reaches `minimum` (inclusive).
    pub const fn satisfies(self, minimum: ProficiencyLevel) -> bool {
        self.weight() >= minimum.weight()
    }
}

impl PartialOrd for ProficiencyLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ProficiencyLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight().cmp(&other.weight())
    }
}
