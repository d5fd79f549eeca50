//! Practice-test content catalog

pub mod error;
pub mod frontmatter;
pub mod loader;
pub mod markdown;
pub mod model;

pub use error::CatalogError;
pub use loader::{Catalog, SectionLookup};
pub use markdown::{Outline, outline};
pub use model::{Difficulty, Question, TestDescriptor, TestMeta, TestSectionContent};
