//! Installed packages, read from the package database
//!
//! Layout: `<root>/<category>/<name>-<version>/SLOT`

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::version::catalog::{Catalog, PackageVersionRecord};
use crate::version::catalogs::{main_slot, scan_category};
use crate::version::error::CatalogError;

/// Default location of the installed package database
pub const DEFAULT_VDB_DIR: &str = "/var/db/pkg";

pub struct VdbCatalog {
    root: PathBuf,
}

impl VdbCatalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for VdbCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_VDB_DIR)
    }
}

impl Catalog for VdbCatalog {
    fn records(&self, package: &str) -> Result<Vec<PackageVersionRecord>, CatalogError> {
        scan_category(&self.root, package)?
            .into_iter()
            .map(|(version, dir)| {
                let slot_file = dir.join("SLOT");
                let slot = match std::fs::read_to_string(&slot_file) {
                    Ok(slot) => main_slot(&slot),
                    Err(e) if e.kind() == ErrorKind::NotFound => {
                        warn!("{:?} has no SLOT file, assuming slot 0", dir);
                        main_slot("")
                    }
                    Err(source) => {
                        return Err(CatalogError::Io {
                            path: slot_file,
                            source,
                        });
                    }
                };
                Ok(PackageVersionRecord::new(package, version, slot))
            })
            .collect()
    }
}
