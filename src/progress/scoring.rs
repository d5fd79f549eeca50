//! Band score conversion
//!
//! Raw correct-answer counts out of 40 map to a 0.0-9.0 band through fixed tables.
//! Values between boundaries come from the table, never from interpolation.

use crate::skill::TrackedSkill;

/// Highest raw score covered by the tables
pub const MAX_RAW_SCORE: i64 = 40;

/// Reading band for each raw score 0..=40
const READING_BANDS: [f32; 41] = [
    0.0, 1.0, 1.5, 2.0, 2.5, 2.5, 3.0, 3.0, 3.5, 3.5, // 0-9
    4.0, 4.0, 4.0, 4.5, 4.5, 5.0, 5.0, 5.0, 5.0, 5.5, // 10-19
    5.5, 5.5, 5.5, 6.0, 6.0, 6.0, 6.0, 6.5, 6.5, 6.5, // 20-29
    7.0, 7.0, 7.0, 7.5, 7.5, 8.0, 8.0, 8.5, 8.5, 9.0, // 30-39
    9.0, // 40
];

/// Listening band for each raw score 0..=40
const LISTENING_BANDS: [f32; 41] = [
    0.0, 1.0, 1.5, 2.0, 2.5, 2.5, 3.0, 3.0, 3.5, 3.5, // 0-9
    3.5, 4.0, 4.0, 4.5, 4.5, 4.5, 5.0, 5.0, 5.5, 5.5, // 10-19
    5.5, 5.5, 5.5, 6.0, 6.0, 6.0, 6.5, 6.5, 6.5, 6.5, // 20-29
    7.0, 7.0, 7.5, 7.5, 7.5, 8.0, 8.0, 8.5, 8.5, 9.0, // 30-39
    9.0, // 40
];

fn table(skill: TrackedSkill) -> &'static [f32; 41] {
    match skill {
        TrackedSkill::Reading => &READING_BANDS,
        TrackedSkill::Listening => &LISTENING_BANDS,
    }
}

/// Convert a raw correct-answer count to a band score
///
/// `total` is accepted for callers that track it but does not affect the result.
/// Counts outside `0..=40` score `0.0`.
pub fn band_score(correct: i64, _total: u32, skill: TrackedSkill) -> f32 {
    usize::try_from(correct).ok().and_then(|idx| table(skill).get(idx)).copied().unwrap_or(0.0)
}

/// Conventional descriptor for a band
pub fn band_descriptor(band: f32) -> &'static str {
    match band {
        b if b >= 9.0 => "Expert user",
        b if b >= 8.0 => "Very good user",
        b if b >= 7.0 => "Good user",
        b if b >= 6.0 => "Competent user",
        b if b >= 5.0 => "Modest user",
        b if b >= 4.0 => "Limited user",
        b if b >= 3.0 => "Extremely limited user",
        b if b >= 2.0 => "Intermittent user",
        b if b >= 1.0 => "Non-user",
        _ => "Did not attempt the test",
    }
}

/// Format seconds as `MM:SS`, or `H:MM:SS` from one hour up
pub fn format_time(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}
