//! Progress data for practice sections

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// A submitted answer: one value, or several for multi-select questions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(String),
    Multiple(Vec<String>),
}

impl Answer {
    /// Build from one or more raw values
    pub fn from_values(mut values: Vec<String>) -> Self {
        if values.len() == 1 {
            Answer::Single(values.remove(0))
        } else {
            Answer::Multiple(values)
        }
    }
}

impl From<&str> for Answer {
    fn from(value: &str) -> Self {
        Answer::Single(value.to_string())
    }
}

/// Audio playback state of a listening section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioProgress {
    /// Playback position in seconds
    pub position: f64,
    pub play_count: u32,
    pub rewind_count: u32,
}

/// One learner's attempt at one section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    /// Answers keyed by question id
    #[serde(default)]
    pub answers: BTreeMap<String, Answer>,

    /// Elapsed time in seconds
    #[serde(default)]
    pub time_spent: u64,

    #[serde(default)]
    pub completed: bool,

    /// Unix timestamp of the first answer
    #[serde(default)]
    pub started_at: i64,

    /// Unix timestamp of the last save, stamped by the store
    #[serde(default)]
    pub last_saved: i64,

    /// Raw correct-answer count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub band_score: Option<f32>,

    /// Listening sections only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioProgress>,
}

impl ProgressRecord {
    /// A fresh record started at `now`
    pub fn started(now: i64) -> Self {
        Self { started_at: now, ..Default::default() }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }
}

/// Progress of one skill: test id -> section id -> record
pub type ProgressMap = HashMap<String, HashMap<String, ProgressRecord>>;

/// Aggregate view of one test's sections
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestSummary {
    pub sections_started: usize,
    pub sections_completed: usize,
    /// Sum of raw scores over completed sections
    pub total_score: u32,
    /// Mean band over completed sections that have one
    pub average_band: Option<f32>,
    pub time_spent: u64,
}

impl TestSummary {
    pub fn from_sections<'a>(records: impl IntoIterator<Item = &'a ProgressRecord>) -> Self {
        let mut summary = Self::default();
        let mut bands = Vec::new();

        for record in records {
            summary.sections_started += 1;
            summary.time_spent += record.time_spent;
            if record.completed {
                summary.sections_completed += 1;
                summary.total_score += record.score.unwrap_or(0);
                if let Some(band) = record.band_score {
                    bands.push(band);
                }
            }
        }

        if !bands.is_empty() {
            summary.average_band = Some(bands.iter().sum::<f32>() / bands.len() as f32);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn answer_serializes_untagged() {
        let single = serde_json::to_string(&Answer::from("B")).unwrap();
        assert_eq!(single, "\"B\"");

        let multiple: Answer = serde_json::from_str(r#"["A","C"]"#).unwrap();
        assert_eq!(multiple, Answer::Multiple(vec!["A".into(), "C".into()]));
    }

    #[test]
    fn answer_from_values_collapses_single() {
        assert_eq!(Answer::from_values(vec!["TRUE".into()]), Answer::Single("TRUE".into()));
        assert!(matches!(
            Answer::from_values(vec!["A".into(), "B".into()]),
            Answer::Multiple(v) if v.len() == 2
        ));
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let record = ProgressRecord { time_spent: 90, last_saved: 5, ..Default::default() };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"timeSpent\":90"));
        assert!(json.contains("\"lastSaved\":5"));
        assert!(!json.contains("bandScore"));
    }

    #[test]
    fn record_deserializes_with_missing_fields() {
        let record: ProgressRecord = serde_json::from_str(r#"{"answers":{"q1":"A"}}"#).unwrap();
        assert_eq!(record.answered_count(), 1);
        assert!(!record.completed);
        assert!(record.audio.is_none());
    }

    #[test]
    fn summary_counts_completed_sections() {
        let done = ProgressRecord {
            completed: true,
            score: Some(30),
            band_score: Some(7.0),
            time_spent: 1200,
            ..Default::default()
        };
        let also_done = ProgressRecord {
            completed: true,
            score: Some(23),
            band_score: Some(6.0),
            time_spent: 1000,
            ..Default::default()
        };
        let in_progress = ProgressRecord { time_spent: 60, ..Default::default() };

        let summary = TestSummary::from_sections([&done, &also_done, &in_progress]);
        assert_eq!(summary.sections_started, 3);
        assert_eq!(summary.sections_completed, 2);
        assert_eq!(summary.total_score, 53);
        assert_eq!(summary.average_band, Some(6.5));
        assert_eq!(summary.time_spent, 2260);
    }

    #[test]
    fn summary_of_nothing_has_no_band() {
        let summary = TestSummary::from_sections(std::iter::empty());
        assert_eq!(summary, TestSummary::default());
    }
}
