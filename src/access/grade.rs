use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user's standing on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grade {
    Free,
    Member,
    Master,
    Both,
    Admin,
}

impl Grade {
    pub const ALL: [Grade; 5] = [
        Grade::Free,
        Grade::Member,
        Grade::Master,
        Grade::Both,
        Grade::Admin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Free => "free",
            Grade::Member => "member",
            Grade::Master => "master",
            Grade::Both => "both",
            Grade::Admin => "admin",
        }
    }

    /// The access level carrying the same name, if any. `Admin` has none.
    pub fn as_access_level(&self) -> Option<AccessLevel> {
        match self {
            Grade::Free => Some(AccessLevel::Free),
            Grade::Member => Some(AccessLevel::Member),
            Grade::Master => Some(AccessLevel::Master),
            Grade::Both => Some(AccessLevel::Both),
            Grade::Admin => None,
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = UnknownGrade;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Grade::Free),
            "member" => Ok(Grade::Member),
            "master" => Ok(Grade::Master),
            "both" => Ok(Grade::Both),
            "admin" => Ok(Grade::Admin),
            other => Err(UnknownGrade(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown grade: {0}")]
pub struct UnknownGrade(pub String);

/// A gate attached to a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Free,
    Member,
    Master,
    Both,
}

impl AccessLevel {
    /// The individual consumer tiers a `both` viewer holds.
    pub const CONSUMER_TIERS: [AccessLevel; 3] =
        [AccessLevel::Free, AccessLevel::Member, AccessLevel::Master];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Free => "free",
            AccessLevel::Member => "member",
            AccessLevel::Master => "master",
            AccessLevel::Both => "both",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of access levels on a content item.
///
/// Stored as a list because insertion order is the display order; duplicates
/// are dropped on insert so it behaves as a set for every lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<AccessLevel>")]
pub struct AccessLevels(Vec<AccessLevel>);

impl AccessLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ungated content.
    pub fn open() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, level: AccessLevel) -> bool {
        if self.0.contains(&level) {
            return false;
        }
        self.0.push(level);
        true
    }

    pub fn contains(&self, level: AccessLevel) -> bool {
        self.0.contains(&level)
    }

    pub fn intersects(&self, levels: &[AccessLevel]) -> bool {
        self.0.iter().any(|level| levels.contains(level))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AccessLevel> {
        self.0.iter()
    }
}

impl FromIterator<AccessLevel> for AccessLevels {
    fn from_iter<I: IntoIterator<Item = AccessLevel>>(iter: I) -> Self {
        let mut levels = AccessLevels::new();
        for level in iter {
            levels.insert(level);
        }
        levels
    }
}

impl From<Vec<AccessLevel>> for AccessLevels {
    fn from(levels: Vec<AccessLevel>) -> Self {
        levels.into_iter().collect()
    }
}

impl<const N: usize> From<[AccessLevel; N]> for AccessLevels {
    fn from(levels: [AccessLevel; N]) -> Self {
        levels.into_iter().collect()
    }
}
