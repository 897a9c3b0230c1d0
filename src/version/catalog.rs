//! Package catalogs: the installed and available package versions

use std::cmp::Ordering;
use std::fmt;

#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::version::error::CatalogError;
use crate::version::pv::StructuredVersion;

/// One version of a package, as listed by a catalog
///
/// Records are identified by package, version and slot. Versions that
/// compare equal (`1.0` and `1.0-r0`) are the same record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageVersionRecord {
    pub package: String,
    pub version: StructuredVersion,
    pub slot: String,
}

impl PackageVersionRecord {
    pub fn new(
        package: impl Into<String>,
        version: StructuredVersion,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            package: package.into(),
            version,
            slot: slot.into(),
        }
    }
}

impl Ord for PackageVersionRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.package
            .cmp(&other.package)
            .then_with(|| self.slot.cmp(&other.slot))
            .then_with(|| self.version.cmp(&other.version))
    }
}

impl PartialOrd for PackageVersionRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Renders as `category/name-version`
impl fmt::Display for PackageVersionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.package, self.version)
    }
}

/// Source of package versions (installed packages, or a repository)
///
/// Implementations only list what they have; range matching is done by
/// [`crate::version::matcher`].
#[cfg_attr(test, automock)]
pub trait Catalog: Send + Sync {
    /// All versions of `package` (`category/name`) with their slots.
    ///
    /// An unknown package yields an empty list, not an error.
    fn records(&self, package: &str) -> Result<Vec<PackageVersionRecord>, CatalogError>;
}
