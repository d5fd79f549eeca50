//! Progress persistence over a storage backend
//!
//! Each tracked skill keeps its whole [`ProgressMap`] under one key. Reads fail soft
//! to an empty map; writes read the map, replace one record and write it back.

use std::time::SystemTime;

use super::backend::{LISTENING_KEY, READING_KEY, StorageBackend};
use super::error::StorageError;
use super::model::{Answer, AudioProgress, ProgressMap, ProgressRecord, TestSummary};
use super::scoring::band_score;
use crate::skill::TrackedSkill;

/// Current unix time in seconds
pub fn unix_now() -> i64 {
    SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).map_or(0, |d| d.as_secs() as i64)
}

fn key_for(skill: TrackedSkill) -> &'static str {
    match skill {
        TrackedSkill::Reading => READING_KEY,
        TrackedSkill::Listening => LISTENING_KEY,
    }
}

/// Learner progress for the reading and listening partitions
///
/// There is no cross-process coordination: concurrent writers overwrite each other
/// and the last write wins.
#[derive(Debug, Clone, Default)]
pub struct ProgressStore<B> {
    backend: B,
}

impl<B: StorageBackend> ProgressStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// All stored progress for a skill
    ///
    /// Missing, unreadable or corrupt data yields an empty map. Corrupt data is left
    /// in place.
    pub fn progress(&self, skill: TrackedSkill) -> ProgressMap {
        let key = key_for(skill);
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return ProgressMap::new(),
            Err(e) => {
                tracing::error!("Error reading {} progress: {}", skill, e);
                return ProgressMap::new();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(map) => map,
            Err(e) => {
                tracing::error!("Error parsing {} progress: {}", skill, e);
                ProgressMap::new()
            }
        }
    }

    /// Stored record for one section, if any
    pub fn section_progress(
        &self,
        skill: TrackedSkill,
        test_id: &str,
        section_id: &str,
    ) -> Option<ProgressRecord> {
        self.progress(skill).remove(test_id).and_then(|mut sections| sections.remove(section_id))
    }

    /// Store `record` for a section, replacing any previous record
    ///
    /// The record is stamped with the current time as `last_saved`. Returns the
    /// record as persisted.
    pub fn save_progress(
        &mut self,
        skill: TrackedSkill,
        test_id: &str,
        section_id: &str,
        mut record: ProgressRecord,
    ) -> Result<ProgressRecord, StorageError> {
        let mut map = self.progress(skill);
        record.last_saved = unix_now();

        map.entry(test_id.to_string())
            .or_default()
            .insert(section_id.to_string(), record.clone());

        let contents = serde_json::to_string(&map)?;
        self.backend.set(key_for(skill), &contents)?;

        tracing::debug!("Saved {} progress for {}/{}", skill, test_id, section_id);
        Ok(record)
    }

    /// Remove stored progress for one skill, or both when `skill` is `None`
    pub fn clear_progress(&mut self, skill: Option<TrackedSkill>) -> Result<(), StorageError> {
        let skills = match skill {
            Some(skill) => vec![skill],
            None => TrackedSkill::ALL.to_vec(),
        };

        for skill in skills {
            self.backend.remove(key_for(skill))?;
        }
        Ok(())
    }

    /// Record one answer, starting a record if the section has none
    pub fn record_answer(
        &mut self,
        skill: TrackedSkill,
        test_id: &str,
        section_id: &str,
        question_id: &str,
        answer: Answer,
        time_spent: u64,
    ) -> Result<ProgressRecord, StorageError> {
        let mut record = self
            .section_progress(skill, test_id, section_id)
            .unwrap_or_else(|| ProgressRecord::started(unix_now()));

        record.answers.insert(question_id.to_string(), answer);
        record.time_spent = time_spent;
        self.save_progress(skill, test_id, section_id, record)
    }

    /// Mark a section submitted and score it
    pub fn complete_section(
        &mut self,
        skill: TrackedSkill,
        test_id: &str,
        section_id: &str,
        correct: u32,
        total: u32,
        time_spent: u64,
    ) -> Result<ProgressRecord, StorageError> {
        let mut record = self
            .section_progress(skill, test_id, section_id)
            .unwrap_or_else(|| ProgressRecord::started(unix_now()));

        record.completed = true;
        record.score = Some(correct);
        record.band_score = Some(band_score(i64::from(correct), total, skill));
        record.time_spent = time_spent;
        self.save_progress(skill, test_id, section_id, record)
    }

    /// Update audio playback state of a listening section
    pub fn update_audio(
        &mut self,
        test_id: &str,
        section_id: &str,
        audio: AudioProgress,
    ) -> Result<ProgressRecord, StorageError> {
        let skill = TrackedSkill::Listening;
        let mut record = self
            .section_progress(skill, test_id, section_id)
            .unwrap_or_else(|| ProgressRecord::started(unix_now()));

        record.audio = Some(audio);
        self.save_progress(skill, test_id, section_id, record)
    }

    /// Aggregate the stored sections of one test
    pub fn test_summary(&self, skill: TrackedSkill, test_id: &str) -> TestSummary {
        self.progress(skill)
            .get(test_id)
            .map(|sections| TestSummary::from_sections(sections.values()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::backend::{DetachedBackend, FileBackend, MemoryBackend};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn memory_store() -> ProgressStore<MemoryBackend> {
        ProgressStore::new(MemoryBackend::new())
    }

    fn record_with(question: &str, answer: &str) -> ProgressRecord {
        let mut record = ProgressRecord::started(1_700_000_000);
        record.answers.insert(question.to_string(), Answer::from(answer));
        record.time_spent = 42;
        record
    }

    #[test]
    fn empty_store_has_no_progress() {
        let store = memory_store();
        assert!(store.progress(TrackedSkill::Reading).is_empty());
        assert!(store.section_progress(TrackedSkill::Reading, "t", "s").is_none());
    }

    #[test]
    fn save_then_read_round_trip() {
        let mut store = memory_store();
        let record = record_with("q1", "TRUE");
        let before = unix_now();

        store.save_progress(TrackedSkill::Reading, "test-1", "section-1", record.clone()).unwrap();

        let map = store.progress(TrackedSkill::Reading);
        let saved = &map["test-1"]["section-1"];
        assert!(saved.last_saved >= before);
        assert_eq!(ProgressRecord { last_saved: 0, ..saved.clone() }, record);
    }

    #[test]
    fn partitions_are_independent() {
        let mut store = memory_store();
        store
            .save_progress(TrackedSkill::Listening, "test-1", "part-1", record_with("q1", "A"))
            .unwrap();

        assert!(store.progress(TrackedSkill::Reading).is_empty());
        assert_eq!(store.progress(TrackedSkill::Listening).len(), 1);
    }

    #[test]
    fn sections_merge_under_test_but_records_overwrite() {
        let mut store = memory_store();
        let skill = TrackedSkill::Reading;
        store.save_progress(skill, "test-1", "section-1", record_with("q1", "A")).unwrap();
        store.save_progress(skill, "test-1", "section-2", record_with("q14", "B")).unwrap();
        store.save_progress(skill, "test-1", "section-1", record_with("q2", "C")).unwrap();

        let map = store.progress(TrackedSkill::Reading);
        assert_eq!(map["test-1"].len(), 2);

        let first = &map["test-1"]["section-1"];
        assert!(!first.answers.contains_key("q1"));
        assert_eq!(first.answers["q2"], Answer::from("C"));
    }

    #[test]
    fn last_write_wins() {
        let mut store = memory_store();
        store.save_progress(TrackedSkill::Reading, "t", "s", record_with("q1", "first")).unwrap();
        store.save_progress(TrackedSkill::Reading, "t", "s", record_with("q1", "second")).unwrap();

        let record = store.section_progress(TrackedSkill::Reading, "t", "s").unwrap();
        assert_eq!(record.answers["q1"], Answer::from("second"));
    }

    #[test]
    fn clear_is_idempotent() {
        let mut store = memory_store();
        store.save_progress(TrackedSkill::Reading, "t", "s", record_with("q1", "A")).unwrap();

        store.clear_progress(Some(TrackedSkill::Reading)).unwrap();
        assert!(store.progress(TrackedSkill::Reading).is_empty());
        store.clear_progress(Some(TrackedSkill::Reading)).unwrap();
        assert!(store.progress(TrackedSkill::Reading).is_empty());
    }

    #[test]
    fn clear_without_skill_clears_both() {
        let mut store = memory_store();
        store.save_progress(TrackedSkill::Reading, "t", "s", record_with("q1", "A")).unwrap();
        store.save_progress(TrackedSkill::Listening, "t", "s", record_with("q1", "A")).unwrap();

        store.clear_progress(Some(TrackedSkill::Listening)).unwrap();
        assert_eq!(store.progress(TrackedSkill::Reading).len(), 1);

        store.clear_progress(None).unwrap();
        assert!(store.progress(TrackedSkill::Reading).is_empty());
        assert!(store.progress(TrackedSkill::Listening).is_empty());
    }

    #[test]
    fn corrupt_data_reads_empty_and_is_left_in_place() {
        let mut backend = MemoryBackend::new();
        backend.set(READING_KEY, "{ this is not json").unwrap();
        let store = ProgressStore::new(backend);

        assert!(store.progress(TrackedSkill::Reading).is_empty());
        assert_eq!(
            store.backend().get(READING_KEY).unwrap().as_deref(),
            Some("{ this is not json")
        );
    }

    #[test]
    fn detached_store_reads_empty_and_accepts_writes() {
        let mut store = ProgressStore::new(DetachedBackend);
        store.save_progress(TrackedSkill::Reading, "t", "s", record_with("q1", "A")).unwrap();
        assert!(store.progress(TrackedSkill::Reading).is_empty());
        store.clear_progress(None).unwrap();
    }

    #[test]
    fn record_answer_accumulates_answers() {
        let mut store = memory_store();
        let first = store
            .record_answer(TrackedSkill::Reading, "t", "s", "q1", Answer::from("A"), 10)
            .unwrap();
        let second = store
            .record_answer(
                TrackedSkill::Reading,
                "t",
                "s",
                "q2",
                Answer::Multiple(vec!["B".into(), "D".into()]),
                25,
            )
            .unwrap();

        assert_eq!(second.answered_count(), 2);
        assert_eq!(second.started_at, first.started_at);
        assert_eq!(second.time_spent, 25);
        assert!(!second.completed);
    }

    #[test]
    fn complete_section_scores_and_keeps_answers() {
        let mut store = memory_store();
        store.record_answer(TrackedSkill::Reading, "t", "s", "q1", Answer::from("A"), 10).unwrap();

        let record = store.complete_section(TrackedSkill::Reading, "t", "s", 23, 40, 3600).unwrap();
        assert!(record.completed);
        assert_eq!(record.score, Some(23));
        assert_eq!(record.band_score, Some(6.0));
        assert_eq!(record.answered_count(), 1);

        let stored = store.section_progress(TrackedSkill::Reading, "t", "s").unwrap();
        assert_eq!(stored, record);
    }

    #[test]
    fn update_audio_touches_listening_only() {
        let mut store = memory_store();
        let audio = AudioProgress { position: 95.5, play_count: 1, rewind_count: 3 };
        store.update_audio("test-1", "part-2", audio.clone()).unwrap();

        let record = store.section_progress(TrackedSkill::Listening, "test-1", "part-2").unwrap();
        assert_eq!(record.audio, Some(audio));
        assert!(store.progress(TrackedSkill::Reading).is_empty());
    }

    #[test]
    fn summary_for_test() {
        let mut store = memory_store();
        store.complete_section(TrackedSkill::Listening, "t", "part-1", 9, 10, 600).unwrap();
        store
            .record_answer(TrackedSkill::Listening, "t", "part-2", "q11", Answer::from("C"), 30)
            .unwrap();

        let summary = store.test_summary(TrackedSkill::Listening, "t");
        assert_eq!(summary.sections_started, 2);
        assert_eq!(summary.sections_completed, 1);
        assert_eq!(summary.total_score, 9);
        assert_eq!(store.test_summary(TrackedSkill::Listening, "missing"), TestSummary::default());
    }

    #[test]
    fn file_backed_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ProgressStore::new(FileBackend::new(temp_dir.path()));
        store.save_progress(TrackedSkill::Reading, "t", "s", record_with("q1", "A")).unwrap();

        let reopened = ProgressStore::new(FileBackend::new(temp_dir.path()));
        let record = reopened.section_progress(TrackedSkill::Reading, "t", "s").unwrap();
        assert_eq!(record.answers["q1"], Answer::from("A"));
    }
}
