//! Error types for content loading

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading the content tree
///
/// These never escape the public loader functions; they are logged and turned into
/// empty listings or [`SectionLookup::Invalid`](super::SectionLookup::Invalid).
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Filesystem access failed
    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A `meta.json` descriptor did not parse
    #[error("invalid test metadata in {path:?}: {source}")]
    Meta {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The section file has no `---` fenced front matter block
    #[error("missing front matter")]
    MissingFrontMatter,

    /// The front matter block did not parse into section metadata
    #[error("invalid front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io { path: path.into(), source }
    }
}
