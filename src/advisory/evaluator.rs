//! Evaluating advisories against the host's catalogs

use std::collections::BTreeSet;

use tracing::debug;

use crate::advisory::types::{Advisory, AffectedPackageEntry};
use crate::version::catalog::{Catalog, PackageVersionRecord};
use crate::version::error::CatalogError;
use crate::version::resolver::{Resolution, UpgradeStrategy, resolve};

/// Checks advisories against one host: its installed packages, the
/// packages available to it, and its architecture
pub struct Evaluator<'a> {
    installed: &'a dyn Catalog,
    available: &'a dyn Catalog,
    arch: String,
}

impl<'a> Evaluator<'a> {
    pub fn new(
        installed: &'a dyn Catalog,
        available: &'a dyn Catalog,
        arch: impl Into<String>,
    ) -> Self {
        Self {
            installed,
            available,
            arch: arch.into(),
        }
    }

    /// Entries of `advisory` that concern this host's architecture
    pub fn applicable_entries<'b>(
        &self,
        advisory: &'b Advisory,
    ) -> impl Iterator<Item = &'b AffectedPackageEntry> {
        let arch = self.arch.clone();
        let id = advisory.id.clone();
        advisory.affected.iter().filter(move |entry| {
            let applies = entry.arch().includes(&arch);
            if !applies {
                debug!(
                    "{}: skipping {} (arch {} not in {})",
                    id,
                    entry.package(),
                    arch,
                    entry.arch()
                );
            }
            applies
        })
    }

    pub fn resolve_entry(
        &self,
        entry: &AffectedPackageEntry,
        strategy: UpgradeStrategy,
    ) -> Result<Resolution, CatalogError> {
        resolve(
            entry.vulnerable(),
            entry.unaffected(),
            self.installed,
            self.available,
            strategy,
        )
    }

    /// Whether any vulnerable version is installed.
    ///
    /// An advisory with no available fix still makes the host vulnerable.
    pub fn is_vulnerable(&self, advisory: &Advisory) -> Result<bool, CatalogError> {
        for entry in self.applicable_entries(advisory) {
            if self
                .resolve_entry(entry, UpgradeStrategy::LeastChange)?
                .is_vulnerable()
            {
                debug!("{}: {} is vulnerable", advisory.id, entry.package());
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// The resolution of every applicable entry, for reporting
    pub fn affection_table<'b>(
        &self,
        advisory: &'b Advisory,
        strategy: UpgradeStrategy,
    ) -> Result<Vec<(&'b AffectedPackageEntry, Resolution)>, CatalogError> {
        self.applicable_entries(advisory)
            .map(|entry| Ok((entry, self.resolve_entry(entry, strategy)?)))
            .collect()
    }

    /// Every version that has to be merged to apply `advisory`
    pub fn merge_list(
        &self,
        advisory: &Advisory,
        strategy: UpgradeStrategy,
    ) -> Result<BTreeSet<PackageVersionRecord>, CatalogError> {
        let mut merge = BTreeSet::new();
        for (_, resolution) in self.affection_table(advisory, strategy)? {
            merge.extend(resolution.upgrades().cloned());
        }
        Ok(merge)
    }
}
