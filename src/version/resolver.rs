//! Upgrade resolution
//!
//! Given the vulnerable and unaffected atoms of one package, decides whether
//! any installed version is vulnerable and, for each one, which available
//! version fixes it.

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::version::atom::Atom;
use crate::version::catalog::{Catalog, PackageVersionRecord};
use crate::version::error::CatalogError;
use crate::version::matcher::match_any;
use crate::version::pv::compare_versions;

/// Which fixing version to pick when several are available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpgradeStrategy {
    /// The smallest version above the vulnerable one
    #[default]
    LeastChange,
    /// The largest available version
    Latest,
}

impl UpgradeStrategy {
    pub fn from_minimize(minimize: bool) -> Self {
        if minimize {
            UpgradeStrategy::LeastChange
        } else {
            UpgradeStrategy::Latest
        }
    }
}

/// An installed vulnerable version and the version that replaces it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradePair {
    pub vulnerable: PackageVersionRecord,
    /// `None` when no fixed version is available
    pub upgrade: Option<PackageVersionRecord>,
}

impl fmt::Display for UpgradePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.upgrade {
            Some(upgrade) => write!(f, "{} -> {}", self.vulnerable, upgrade),
            None => write!(f, "{} -> no upgrade available", self.vulnerable),
        }
    }
}

/// Outcome of resolving one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No vulnerable version is installed
    Unaffected,
    /// One pair per installed vulnerable version. A pair without an upgrade
    /// still means the host is vulnerable.
    Affected(Vec<UpgradePair>),
}

impl Resolution {
    pub fn is_vulnerable(&self) -> bool {
        matches!(self, Resolution::Affected(_))
    }

    pub fn pairs(&self) -> &[UpgradePair] {
        match self {
            Resolution::Unaffected => &[],
            Resolution::Affected(pairs) => pairs,
        }
    }

    /// The versions to merge, skipping pairs with no upgrade
    pub fn upgrades(&self) -> impl Iterator<Item = &PackageVersionRecord> {
        self.pairs().iter().filter_map(|pair| pair.upgrade.as_ref())
    }
}

/// Resolve the upgrades needed for one package.
///
/// Installed versions matching an unaffected atom are never vulnerable, and
/// never offered as upgrades either. Upgrades stay within the slot of the
/// vulnerable version.
pub fn resolve<I, A>(
    vulnerable: &[Atom],
    unaffected: &[Atom],
    installed: &I,
    available: &A,
    strategy: UpgradeStrategy,
) -> Result<Resolution, CatalogError>
where
    I: Catalog + ?Sized,
    A: Catalog + ?Sized,
{
    let unaffected_installed = match_any(unaffected, installed)?;
    let vulnerable_installed: BTreeSet<_> = match_any(vulnerable, installed)?
        .difference(&unaffected_installed)
        .cloned()
        .collect();

    if vulnerable_installed.is_empty() {
        return Ok(Resolution::Unaffected);
    }

    let candidates: BTreeSet<_> = match_any(unaffected, available)?
        .difference(&unaffected_installed)
        .cloned()
        .collect();

    let pairs = vulnerable_installed
        .into_iter()
        .map(|vulnerable| {
            let upgrade = pick_upgrade(&vulnerable, &candidates, strategy).cloned();
            debug!(
                "{}:{} -> {}",
                vulnerable,
                vulnerable.slot,
                upgrade
                    .as_ref()
                    .map_or_else(|| "none".to_string(), |u| u.to_string())
            );
            UpgradePair {
                vulnerable,
                upgrade,
            }
        })
        .collect();

    Ok(Resolution::Affected(pairs))
}

fn pick_upgrade<'a>(
    vulnerable: &PackageVersionRecord,
    candidates: &'a BTreeSet<PackageVersionRecord>,
    strategy: UpgradeStrategy,
) -> Option<&'a PackageVersionRecord> {
    let mut newer = candidates.iter().filter(|candidate| {
        candidate.package == vulnerable.package
            && candidate.slot == vulnerable.slot
            && compare_versions(&candidate.version, &vulnerable.version).is_gt()
    });

    match strategy {
        UpgradeStrategy::LeastChange => {
            newer.min_by(|a, b| compare_versions(&a.version, &b.version))
        }
        UpgradeStrategy::Latest => newer.max_by(|a, b| compare_versions(&a.version, &b.version)),
    }
}
