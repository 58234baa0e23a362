use std::path::{Path, PathBuf};

use crate::{io_error, StoreError};

const PAGE_EXTENSION: &str = "html";

/// A directory of fetched page markup, one `<name>.html` file per page.
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
}

impl PageCache {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path a page saved under `name` lives at.
    #[must_use]
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.{PAGE_EXTENSION}"))
    }

    /// Empties the cache directory, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be removed or
    /// created.
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_dir_all(&self.dir) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_error(&self.dir)(e)),
        }
        std::fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;
        tracing::debug!(dir = %self.dir.display(), "page cache cleared");
        Ok(())
    }

    /// Writes `html` as `<name>.html` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be written.
    pub fn save(&self, name: &str, html: &str) -> Result<PathBuf, StoreError> {
        std::fs::create_dir_all(&self.dir).map_err(io_error(&self.dir))?;
        let path = self.path_for(name);
        std::fs::write(&path, html).map_err(io_error(&path))?;
        Ok(path)
    }

    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read.
    pub fn load(path: &Path) -> Result<String, StoreError> {
        std::fs::read_to_string(path).map_err(io_error(path))
    }

    /// Cached pages, sorted by file name. A missing directory is empty.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be listed.
    pub fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error(&self.dir)(e)),
        };

        let mut pages = Vec::new();
        for entry in entries {
            let path = entry.map_err(io_error(&self.dir))?.path();
            if path.extension().is_some_and(|ext| ext == PAGE_EXTENSION) {
                pages.push(path);
            }
        }
        pages.sort();
        Ok(pages)
    }
}
