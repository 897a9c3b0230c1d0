//! In-memory catalog
//!
//! Used for fixtures and for catalogs exported to JSON:
//!
//! ```json
//! [
//!   { "package": "dev-libs/openssl", "version": "3.0.13-r1", "slot": "0" }
//! ]
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use tracing::info;

use crate::version::catalog::{Catalog, PackageVersionRecord};
use crate::version::error::CatalogError;

#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    packages: BTreeMap<String, Vec<PackageVersionRecord>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(
        records: impl IntoIterator<Item = PackageVersionRecord>,
    ) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for record in records {
            catalog.insert(record)?;
        }
        Ok(catalog)
    }

    /// Load a JSON array of records
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let records: Vec<PackageVersionRecord> =
            serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;

        info!("Loaded {} catalog records from {:?}", records.len(), path);
        Self::from_records(records)
    }

    /// Add a record.
    ///
    /// Re-adding the same record is a no-op. Adding a differently spelled
    /// version that compares equal to one already in the slot (`1.0` and
    /// `1.0.0`) is rejected, since upgrades could no longer be told apart.
    pub fn insert(&mut self, record: PackageVersionRecord) -> Result<(), CatalogError> {
        let records = self.packages.entry(record.package.clone()).or_default();

        if let Some(existing) = records.iter().find(|r| **r == record) {
            if existing.version.to_string() == record.version.to_string() {
                return Ok(());
            }
            return Err(CatalogError::DuplicateVersion {
                package: record.package,
                slot: record.slot,
                existing: existing.version.to_string(),
                duplicate: record.version.to_string(),
            });
        }

        records.push(record);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.packages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Catalog for MemoryCatalog {
    fn records(&self, package: &str) -> Result<Vec<PackageVersionRecord>, CatalogError> {
        Ok(self.packages.get(package).cloned().unwrap_or_default())
    }
}
