//! Catalog Merge Store.
//!
//! The whole catalog is one pretty-printed JSON array of [`ProductDraft`]
//! records. Every write is a full read-modify-write of that file, so the
//! store assumes a single writer. Writes go to a temporary file in the same
//! directory which is then renamed over the catalog.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use catlift_core::{MergeTarget, ProductDraft, ProductUpdate};
use tempfile::NamedTempFile;

use crate::{io_error, StoreError};

/// Result of [`CatalogStore::seed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub stored: usize,
    /// Records dropped because an earlier record had the same handle.
    pub duplicates: usize,
}

#[derive(Debug, Clone)]
pub struct CatalogStore {
    path: PathBuf,
}

impl CatalogStore {
    /// Points the store at `path`. Nothing is read until the first call.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in stored order. A catalog file that does not exist yet
    /// reads as empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read and
    /// [`StoreError::Parse`] if it is not a JSON array of records.
    pub fn load(&self) -> Result<Vec<ProductDraft>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.path)(e)),
        };
        serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })
    }

    /// Replaces the catalog with `records`. When several records share a
    /// handle the first one is kept.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the catalog cannot be written.
    pub fn seed(&mut self, records: Vec<ProductDraft>) -> Result<SeedSummary, StoreError> {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(records.len());
        let mut duplicates = 0usize;

        for record in records {
            if seen.insert(record.handle.clone()) {
                kept.push(record);
            } else {
                tracing::warn!(handle = %record.handle, "duplicate handle dropped while seeding");
                duplicates += 1;
            }
        }

        self.save(&kept)?;
        tracing::info!(stored = kept.len(), duplicates, path = %self.path.display(), "catalog seeded");
        Ok(SeedSummary {
            stored: kept.len(),
            duplicates,
        })
    }

    /// Applies `update` to the record stored under `handle` and rewrites the
    /// catalog. Only the fields set in `update` change.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no record has `handle`; the
    /// catalog is left untouched. Read and write failures are returned as
    /// [`StoreError::Io`] / [`StoreError::Parse`].
    pub fn upsert(&mut self, handle: &str, update: ProductUpdate) -> Result<(), StoreError> {
        let mut records = self.load()?;
        let Some(record) = records.iter_mut().find(|r| r.handle == handle) else {
            return Err(StoreError::NotFound {
                handle: handle.to_string(),
            });
        };

        record.apply(update);
        self.save(&records)?;
        tracing::debug!(handle, "catalog record updated");
        Ok(())
    }

    fn save(&self, records: &[ProductDraft]) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(records)?;

        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir).map_err(io_error(&dir))?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(io_error(&dir))?;
        tmp.write_all(json.as_bytes())
            .map_err(io_error(tmp.path()))?;
        tmp.persist(&self.path)
            .map_err(|e| io_error(&self.path)(e.error))?;
        Ok(())
    }
}

impl MergeTarget for CatalogStore {
    type Error = StoreError;

    fn merge(&mut self, handle: &str, update: ProductUpdate) -> Result<(), Self::Error> {
        self.upsert(handle, update)
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod tests;
