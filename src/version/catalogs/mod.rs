//! Catalog implementations
//!
//! - [`memory`]: in-memory catalog, also loadable from JSON
//! - [`vdb`]: installed packages from the package database (`/var/db/pkg`)
//! - [`repo`]: available packages from a repository metadata cache

pub mod memory;
pub mod repo;
pub mod vdb;

pub use memory::MemoryCatalog;
pub use repo::{DEFAULT_REPO_DIR, RepoCatalog};
pub use vdb::{DEFAULT_VDB_DIR, VdbCatalog};

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::version::atom::split_package_version;
use crate::version::error::CatalogError;
use crate::version::pv::StructuredVersion;

/// Reduce `0/1.1` to its main slot; an empty slot is `0`
pub(crate) fn main_slot(slot: &str) -> String {
    match slot.split('/').next().map(str::trim) {
        Some(slot) if !slot.is_empty() => slot.to_string(),
        _ => "0".to_string(),
    }
}

/// Entries of `<root>/<category>` named `<name>-<version>` for `package`.
///
/// A missing category directory is an empty result.
pub(crate) fn scan_category(
    root: &Path,
    package: &str,
) -> Result<Vec<(StructuredVersion, PathBuf)>, CatalogError> {
    let Some((category, name)) = package.split_once('/') else {
        return Ok(vec![]);
    };

    let dir = root.join(category);
    let io_error = |source| CatalogError::Io {
        path: dir.clone(),
        source,
    };

    let entries = match std::fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(vec![]),
        Err(e) => return Err(io_error(e)),
    };

    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(io_error)?;
        let file_name = entry.file_name();
        let Some(file_name) = file_name.to_str() else {
            continue;
        };

        match split_package_version(&format!("{category}/{file_name}")) {
            Some((pn, version)) if pn == package => found.push((version, entry.path())),
            Some(_) => {}
            None => debug!("Skipping {:?}: not a package entry for {}", entry.path(), name),
        }
    }

    Ok(found)
}
