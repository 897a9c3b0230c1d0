//! Record of advisories already applied to this host
//!
//! One advisory ID per line, appended by `inject`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

pub const DEFAULT_CHECKFILE: &str = "/var/lib/portage/glsa_injected";

#[derive(Debug, Error)]
pub enum AppliedError {
    #[error("Failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone)]
pub struct AppliedStore {
    path: PathBuf,
}

impl AppliedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Applied IDs in the order they were recorded.
    ///
    /// A missing file means nothing has been applied yet.
    pub fn ids(&self) -> Result<Vec<String>, AppliedError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(AppliedError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn contains(&self, id: &str) -> Result<bool, AppliedError> {
        Ok(self.ids()?.iter().any(|applied| applied == id))
    }

    /// Record `id` as applied. Returns `false` when it already was.
    pub fn add(&self, id: &str) -> Result<bool, AppliedError> {
        if self.contains(id)? {
            return Ok(false);
        }

        let write_error = |source| AppliedError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(write_error)?;
        writeln!(file, "{id}").map_err(write_error)?;

        info!("Marked {} as applied in {:?}", id, self.path);
        Ok(true)
    }
}

impl Default for AppliedStore {
    fn default() -> Self {
        Self::new(DEFAULT_CHECKFILE)
    }
}
