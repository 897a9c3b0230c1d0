//! Advisory files on disk
//!
//! Advisories live in one directory as `<prefix><id><suffix>`, e.g.
//! `glsa-202401-01.xml`.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::advisory::error::AdvisoryError;
use crate::advisory::types::{Advisory, AdvisoryId};
use crate::advisory::xml::parse_advisory;

pub const DEFAULT_GLSA_DIR: &str = "/var/db/repos/gentoo/metadata/glsa";
pub const DEFAULT_PREFIX: &str = "glsa-";
pub const DEFAULT_SUFFIX: &str = ".xml";

#[derive(Debug, Clone)]
pub struct AdvisoryRepository {
    dir: PathBuf,
    prefix: String,
    suffix: String,
}

impl AdvisoryRepository {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// IDs of every advisory in the directory, oldest first.
    ///
    /// An unreadable directory yields no advisories.
    pub fn list_ids(&self) -> Vec<String> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Cannot read advisory directory {:?}: {}", self.dir, e);
                return Vec::new();
            }
        };

        let mut ids: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter_map(|name| {
                name.strip_prefix(&self.prefix)
                    .and_then(|rest| rest.strip_suffix(&self.suffix))
                    .filter(|id| AdvisoryId::is_valid(id))
                    .map(str::to_string)
            })
            .collect();
        ids.sort();
        debug!("Found {} advisories in {:?}", ids.len(), self.dir);
        ids
    }

    pub fn path_for(&self, id: &AdvisoryId) -> PathBuf {
        self.dir
            .join(format!("{}{}{}", self.prefix, id, self.suffix))
    }

    /// Load an advisory by ID, or from an explicit file path.
    ///
    /// Loading by ID also checks that the document carries that ID.
    pub fn load(&self, target: &str) -> Result<Advisory, AdvisoryError> {
        if let Ok(id) = target.parse::<AdvisoryId>() {
            let path = self.path_for(&id);
            return load_file(&path, Some(id.as_str()));
        }

        let path = Path::new(target);
        if path.is_file() {
            return load_file(path, None);
        }

        Err(AdvisoryError::InvalidId(target.to_string()))
    }
}

impl Default for AdvisoryRepository {
    fn default() -> Self {
        Self::new(DEFAULT_GLSA_DIR, DEFAULT_PREFIX, DEFAULT_SUFFIX)
    }
}

fn load_file(path: &Path, expected_id: Option<&str>) -> Result<Advisory, AdvisoryError> {
    let xml = std::fs::read_to_string(path).map_err(|source| AdvisoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Parsing advisory {:?}", path);
    parse_advisory(&xml, expected_id)
}
