use crate::catalog::Slug;
use std::path::PathBuf;
use thiserror::Error;

/// A catalog violated one of its structural invariants.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("duplicate unit slug '{slug}'")]
    DuplicateSlug { slug: Slug },
    #[error("unit at index {index} has an empty slug")]
    EmptySlug { index: usize },
    #[error("unit at index {index} has slug '{slug}' outside [a-z0-9_-]")]
    InvalidSlug { index: usize, slug: Slug },
}

/// Raw page data could not be turned into a catalog.
///
/// Any of these aborts the run before a file is written.
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("malformed document: {0}")]
    MalformedDocument(String),
    #[error("malformed record at index {index} (slug {}): missing or invalid `{field}`", slug.as_deref().unwrap_or("<unknown>"))]
    MalformedRecord {
        index: usize,
        slug: Option<String>,
        field: String,
    },
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Failure reading or writing one of the persisted JSON files.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file does not exist yet; callers treat this as a first run.
    #[error("{} not found", path.display())]
    NotFound { path: PathBuf },
    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not decode {}: {detail}", path.display())]
    Decode { path: PathBuf, detail: String },
    #[error("could not encode {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}
