//! Content tree loader
//!
//! Reads `root/<category>/<test-id>/meta.json` and the section files beside it.
//! Nothing is cached: every call goes back to the filesystem, so edits to the content
//! tree show up on the next read.

use std::fs;
use std::path::{Path, PathBuf};

use super::error::CatalogError;
use super::frontmatter;
use super::model::{TestDescriptor, TestMeta, TestMetaFile, TestSectionContent};

/// Name of the per-test metadata descriptor
pub const META_FILE: &str = "meta.json";

/// Section file extensions, in lookup order
const SECTION_EXTENSIONS: [&str; 2] = ["mdx", "md"];

/// Outcome of loading a single section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionLookup {
    Found(TestSectionContent),
    /// No section file exists for the requested ids
    NotFound,
    /// A section file exists but could not be read or parsed
    Invalid(String),
}

impl SectionLookup {
    /// The section content, treating missing and malformed files alike
    pub fn found(self) -> Option<TestSectionContent> {
        match self {
            SectionLookup::Found(section) => Some(section),
            SectionLookup::NotFound | SectionLookup::Invalid(_) => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SectionLookup::Found(_))
    }
}

/// Loader over a content root directory
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Category directories under the root, sorted by name
    pub fn list_categories(&self) -> Vec<String> {
        match sorted_subdirectories(&self.root) {
            Ok(names) => names,
            Err(e) => {
                tracing::error!("Error listing categories: {}", e);
                Vec::new()
            }
        }
    }

    /// List the tests in a category
    ///
    /// A missing category yields an empty list. Test directories without a
    /// `meta.json` are skipped. Any other failure is logged and also yields an empty
    /// list. Order follows directory enumeration and is not sorted.
    pub fn list_tests(&self, category: &str) -> Vec<TestDescriptor> {
        let Some(dir) = self.dir_for(&[category]) else {
            return Vec::new();
        };
        if !dir.is_dir() {
            return Vec::new();
        }

        match read_descriptors(&dir) {
            Ok(tests) => tests,
            Err(e) => {
                tracing::error!("Error loading tests for {}: {}", category, e);
                Vec::new()
            }
        }
    }

    /// Section ids available for a test, sorted
    pub fn list_sections(&self, category: &str, test_id: &str) -> Vec<String> {
        let Some(dir) = self.dir_for(&[category, test_id]) else {
            return Vec::new();
        };
        let Ok(entries) = fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut sections: Vec<String> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.is_file()
                    && p.extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| SECTION_EXTENSIONS.contains(&ext))
            })
            .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
            .collect();

        sections.sort();
        sections.dedup();
        sections
    }

    /// Load one section of a test
    pub fn load_section(&self, category: &str, test_id: &str, section_id: &str) -> SectionLookup {
        let Some(path) = self.section_path(category, test_id, section_id) else {
            return SectionLookup::NotFound;
        };

        match read_section(&path) {
            Ok(section) => SectionLookup::Found(section),
            Err(e) => {
                tracing::error!(
                    "Error loading section {}/{}/{}: {}",
                    category,
                    test_id,
                    section_id,
                    e
                );
                SectionLookup::Invalid(e.to_string())
            }
        }
    }

    /// Locate the content file for a section, preferring `.mdx` over `.md`
    fn section_path(&self, category: &str, test_id: &str, section_id: &str) -> Option<PathBuf> {
        if !is_plain_segment(section_id) {
            return None;
        }
        let dir = self.dir_for(&[category, test_id])?;
        SECTION_EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{section_id}.{ext}")))
            .find(|p| p.is_file())
    }

    /// Join ids onto the root, refusing any that could leave the content tree
    fn dir_for(&self, segments: &[&str]) -> Option<PathBuf> {
        if !segments.iter().all(|s| is_plain_segment(s)) {
            tracing::debug!("Rejecting content path {:?}", segments);
            return None;
        }
        Some(segments.iter().fold(self.root.clone(), |dir, s| dir.join(s)))
    }
}

/// A single directory or file name with no separators or dot components
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains(['/', '\\', std::path::MAIN_SEPARATOR, '\0'])
}

fn sorted_subdirectories(dir: &Path) -> Result<Vec<String>, CatalogError> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names: Vec<String> = fs::read_dir(dir)
        .map_err(|e| CatalogError::io(dir, e))?
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_dir() && !e.file_name().to_string_lossy().starts_with('.'))
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .collect();

    names.sort();
    Ok(names)
}

fn read_descriptors(dir: &Path) -> Result<Vec<TestDescriptor>, CatalogError> {
    let mut tests = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| CatalogError::io(dir, e))? {
        let entry = entry.map_err(|e| CatalogError::io(dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }

        let meta_path = path.join(META_FILE);
        if !meta_path.is_file() {
            tracing::debug!("Skipping {:?}: no {}", path, META_FILE);
            continue;
        }

        let contents =
            fs::read_to_string(&meta_path).map_err(|e| CatalogError::io(&meta_path, e))?;
        let meta: TestMetaFile = serde_json::from_str(&contents)
            .map_err(|source| CatalogError::Meta { path: meta_path.clone(), source })?;

        let id = entry.file_name().to_string_lossy().into_owned();
        tests.push(TestDescriptor::from_meta(id, meta));
    }

    Ok(tests)
}

fn read_section(path: &Path) -> Result<TestSectionContent, CatalogError> {
    let document = fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    let (meta, body) = frontmatter::parse::<TestMeta>(&document)?;

    Ok(TestSectionContent { meta, content: body.to_string(), questions: Vec::new() })
}
