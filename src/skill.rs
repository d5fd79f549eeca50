//! Exam skill categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One of the four exam categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Skill {
    Reading,
    Writing,
    Listening,
    Speaking,
}

impl Skill {
    /// All skills in display order
    pub const ALL: [Skill; 4] = [Skill::Reading, Skill::Writing, Skill::Listening, Skill::Speaking];

    /// Directory / identifier name
    pub fn as_str(&self) -> &'static str {
        match self {
            Skill::Reading => "reading",
            Skill::Writing => "writing",
            Skill::Listening => "listening",
            Skill::Speaking => "speaking",
        }
    }
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string or skill has no matching variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown skill: {0}")]
pub struct UnknownSkill(pub String);

impl FromStr for Skill {
    type Err = UnknownSkill;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reading" => Ok(Skill::Reading),
            "writing" => Ok(Skill::Writing),
            "listening" => Ok(Skill::Listening),
            "speaking" => Ok(Skill::Speaking),
            other => Err(UnknownSkill(other.to_string())),
        }
    }
}

/// Skills that are scored from a raw answer count and have stored progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackedSkill {
    Reading,
    Listening,
}

impl TrackedSkill {
    pub const ALL: [TrackedSkill; 2] = [TrackedSkill::Reading, TrackedSkill::Listening];

    pub fn as_str(&self) -> &'static str {
        Skill::from(*self).as_str()
    }
}

impl fmt::Display for TrackedSkill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<TrackedSkill> for Skill {
    fn from(skill: TrackedSkill) -> Self {
        match skill {
            TrackedSkill::Reading => Skill::Reading,
            TrackedSkill::Listening => Skill::Listening,
        }
    }
}

impl TryFrom<Skill> for TrackedSkill {
    type Error = UnknownSkill;

    fn try_from(skill: Skill) -> Result<Self, Self::Error> {
        match skill {
            Skill::Reading => Ok(TrackedSkill::Reading),
            Skill::Listening => Ok(TrackedSkill::Listening),
            other => Err(UnknownSkill(format!("{other} has no progress tracking"))),
        }
    }
}

impl FromStr for TrackedSkill {
    type Err = UnknownSkill;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Skill>()?.try_into()
    }
}
