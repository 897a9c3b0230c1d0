//! Available packages, read from a repository's metadata cache
//!
//! Layout: `<repo>/metadata/md5-cache/<category>/<name>-<version>`, each a
//! `KEY=value` file with a `SLOT=` line.

use std::path::{Path, PathBuf};

use crate::version::catalog::{Catalog, PackageVersionRecord};
use crate::version::catalogs::{main_slot, scan_category};
use crate::version::error::CatalogError;

/// Default location of the main repository
pub const DEFAULT_REPO_DIR: &str = "/var/db/repos/gentoo";

pub struct RepoCatalog {
    cache_dir: PathBuf,
}

impl RepoCatalog {
    pub fn new(repo_dir: impl AsRef<Path>) -> Self {
        Self {
            cache_dir: repo_dir.as_ref().join("metadata").join("md5-cache"),
        }
    }
}

impl Default for RepoCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_REPO_DIR)
    }
}

fn slot_from_cache_entry(content: &str) -> String {
    content
        .lines()
        .find_map(|line| line.strip_prefix("SLOT="))
        .map(main_slot)
        .unwrap_or_else(|| main_slot(""))
}

impl Catalog for RepoCatalog {
    fn records(&self, package: &str) -> Result<Vec<PackageVersionRecord>, CatalogError> {
        scan_category(&self.cache_dir, package)?
            .into_iter()
            .map(|(version, path)| {
                let content = std::fs::read_to_string(&path)
                    .map_err(|source| CatalogError::Io { path, source })?;
                Ok(PackageVersionRecord::new(
                    package,
                    version,
                    slot_from_cache_entry(&content),
                ))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case("DEFINED_PHASES=compile\nSLOT=0/3\nKEYWORDS=amd64\n", "0")]
    #[case("SLOT=115esr\n", "115esr")]
    #[case("EAPI=8\n", "0")]
    fn slot_from_cache_entry_returns_expected(#[case] content: &str, #[case] expected: &str) {
        assert_eq!(slot_from_cache_entry(content), expected);
    }

    #[test]
    fn records_reads_cache_entries() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("metadata/md5-cache/www-client");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("firefox-115.9.0"), "EAPI=8\nSLOT=esr\n").unwrap();
        std::fs::write(dir.join("firefox-124.0-r1"), "EAPI=8\nSLOT=rapid\n").unwrap();
        std::fs::write(dir.join("firefox-bin-124.0"), "SLOT=rapid\n").unwrap();

        let catalog = RepoCatalog::new(temp.path());
        let mut records: Vec<String> = catalog
            .records("www-client/firefox")
            .unwrap()
            .into_iter()
            .map(|r| format!("{}:{}", r, r.slot))
            .collect();
        records.sort();

        assert_eq!(
            records,
            vec![
                "www-client/firefox-115.9.0:esr",
                "www-client/firefox-124.0-r1:rapid"
            ]
        );
    }
}
