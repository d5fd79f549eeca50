//! Content model for practice tests
//!
//! A test is a directory holding a `meta.json` descriptor and one content file per
//! section. These types are what the loader hands to the view layer.

use serde::{Deserialize, Serialize};

/// How hard a test is pitched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

/// Fields of a test's `meta.json`
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TestMetaFile {
    pub title: String,
    pub sections: u32,
    pub difficulty: Difficulty,
    #[serde(default)]
    pub description: Option<String>,
}

/// One practice test as shown in a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestDescriptor {
    /// Directory name, unique within a category
    pub id: String,
    /// Display title
    pub title: String,
    /// Number of sections
    pub sections: u32,
    pub difficulty: Difficulty,
    /// Short blurb for the listing card
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TestDescriptor {
    pub(crate) fn from_meta(id: impl Into<String>, meta: TestMetaFile) -> Self {
        Self {
            id: id.into(),
            title: meta.title,
            sections: meta.sections,
            difficulty: meta.difficulty,
            description: meta.description,
        }
    }
}

/// Front matter of a section file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestMeta {
    pub title: String,
    /// Section number within the test (1-indexed)
    pub section: u32,
    /// Number of questions in the section
    pub questions: u32,
    /// Time limit in minutes
    #[serde(default, alias = "time_limit", skip_serializing_if = "Option::is_none")]
    pub time_limit: Option<u32>,
    #[serde(default)]
    pub difficulty: Difficulty,
    /// Question-type tags (e.g. "multiple-choice", "true-false-not-given")
    #[serde(default, alias = "question_types")]
    pub question_types: Vec<String>,
    /// Audio file for listening sections
    #[serde(default, alias = "audio_file", skip_serializing_if = "Option::is_none")]
    pub audio_file: Option<String>,
}

impl TestMeta {
    /// Time limit in seconds, if one is set
    pub fn time_limit_secs(&self) -> Option<u64> {
        self.time_limit.map(|minutes| u64::from(minutes) * 60)
    }
}

/// A structured question
///
/// Question data currently lives inside the section body, so the loader never fills
/// these in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    /// Question type tag, matching one of [`TestMeta::question_types`]
    pub kind: String,
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
}

/// One section of one test
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestSectionContent {
    pub meta: TestMeta,
    /// Raw body text following the front matter
    pub content: String,
    pub questions: Vec<Question>,
}
