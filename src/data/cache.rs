use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use super::loader::{LoadError, load_file};
use super::model::Catalog;

/// Identity of a source file version: where it is, how big, when last written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSignature {
    pub path: PathBuf,
    pub len: u64,
    pub modified: Option<SystemTime>,
}

impl SourceSignature {
    pub fn of(path: &Path) -> Result<Self, LoadError> {
        let io_err = |source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        };
        let canonical = std::fs::canonicalize(path).map_err(io_err)?;
        let meta = std::fs::metadata(&canonical).map_err(io_err)?;
        Ok(SourceSignature {
            path: canonical,
            len: meta.len(),
            modified: meta.modified().ok(),
        })
    }
}

/// Holds the most recently loaded catalog and reloads only when its source changes.
#[derive(Debug, Default)]
pub struct CatalogCache {
    entry: Option<(SourceSignature, Arc<Catalog>)>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached catalog if `path` still has the same signature,
    /// otherwise load it and replace the cache entry.
    ///
    /// A failed load leaves the previous entry untouched.
    pub fn get_or_load(&mut self, path: &Path) -> Result<Arc<Catalog>, LoadError> {
        let signature = SourceSignature::of(path)?;
        if let Some((cached, catalog)) = &self.entry {
            if *cached == signature {
                log::debug!("Catalog cache hit for {}", signature.path.display());
                return Ok(Arc::clone(catalog));
            }
        }

        let catalog = Arc::new(load_file(&signature.path)?);
        self.entry = Some((signature, Arc::clone(&catalog)));
        Ok(catalog)
    }

    /// Drop the cached catalog; the next lookup reloads.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn signature(&self) -> Option<&SourceSignature> {
        self.entry.as_ref().map(|(sig, _)| sig)
    }
}
