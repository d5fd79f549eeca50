//! bandprep - practice-test content and learner progress for exam preparation
//!
//! Loads reading, writing, listening and speaking practice tests from a content tree,
//! keeps learner progress in a pluggable key-value store, converts raw scores to
//! bands, and runs the section countdown.

pub mod catalog;
pub mod config;
pub mod progress;
pub mod skill;
pub mod timer;

pub use catalog::{Catalog, SectionLookup};
pub use config::{Config, Preferences};
pub use progress::{ProgressStore, band_score};
pub use skill::{Skill, TrackedSkill};
pub use timer::{Countdown, CountdownHandle};
