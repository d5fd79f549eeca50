//! Learner progress and band scoring
//!
//! Progress is kept per tracked skill in a pluggable key-value backend. Band scores
//! come from fixed per-skill tables.

pub mod backend;
pub mod error;
pub mod model;
pub mod scoring;
pub mod store;

pub use backend::{DetachedBackend, FileBackend, MemoryBackend, StorageBackend};
pub use error::StorageError;
pub use model::{Answer, AudioProgress, ProgressMap, ProgressRecord, TestSummary};
pub use scoring::{band_descriptor, band_score, format_time};
pub use store::ProgressStore;
