//! Advisory data model

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::advisory::error::AdvisoryError;
use crate::version::atom::Atom;
use crate::version::error::FormatError;

static ADVISORY_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{6}-\d{2}$").expect("advisory ID pattern is valid"));

/// Advisory identifier of the form `YYYYMM-NN`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdvisoryId(String);

impl AdvisoryId {
    pub fn is_valid(text: &str) -> bool {
        ADVISORY_ID_RE.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AdvisoryId {
    type Err = AdvisoryError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(text) {
            Ok(Self(text.to_string()))
        } else {
            Err(AdvisoryError::InvalidId(text.to_string()))
        }
    }
}

impl fmt::Display for AdvisoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Architectures an affected-package entry applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchFilter {
    /// `*`
    Any,
    Only(BTreeSet<String>),
}

impl ArchFilter {
    /// Parse `*` or a whitespace-separated list of architectures.
    ///
    /// An empty list applies to no architecture.
    pub fn parse(text: &str) -> Self {
        if text.trim() == "*" {
            ArchFilter::Any
        } else {
            ArchFilter::Only(text.split_whitespace().map(str::to_string).collect())
        }
    }

    pub fn includes(&self, arch: &str) -> bool {
        match self {
            ArchFilter::Any => true,
            ArchFilter::Only(arches) => arches.contains(arch),
        }
    }
}

impl fmt::Display for ArchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchFilter::Any => f.write_str("*"),
            ArchFilter::Only(arches) => {
                let arches: Vec<&str> = arches.iter().map(String::as_str).collect();
                f.write_str(&arches.join(" "))
            }
        }
    }
}

/// One `<package>` of an advisory: a package, the architectures it
/// concerns, and its vulnerable and unaffected ranges
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffectedPackageEntry {
    package: String,
    arch: ArchFilter,
    auto: bool,
    vulnerable: Vec<Atom>,
    unaffected: Vec<Atom>,
}

impl AffectedPackageEntry {
    /// Every atom has to name `package`, and at least one vulnerable atom is
    /// required: an entry without one could never report the host affected.
    pub fn new(
        package: impl Into<String>,
        arch: ArchFilter,
        auto: bool,
        vulnerable: Vec<Atom>,
        unaffected: Vec<Atom>,
    ) -> Result<Self, FormatError> {
        let package = package.into();
        if vulnerable.is_empty() {
            return Err(FormatError::MissingVulnerableAtoms { package });
        }
        if let Some(atom) = vulnerable
            .iter()
            .chain(&unaffected)
            .find(|atom| atom.package != package)
        {
            return Err(FormatError::PackageMismatch {
                package,
                atom: atom.to_string(),
            });
        }

        Ok(Self {
            package,
            arch,
            auto,
            vulnerable,
            unaffected,
        })
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn arch(&self) -> &ArchFilter {
        &self.arch
    }

    /// Whether the advisory marks this entry as safe to fix automatically
    pub fn auto(&self) -> bool {
        self.auto
    }

    pub fn vulnerable(&self) -> &[Atom] {
        &self.vulnerable
    }

    pub fn unaffected(&self) -> &[Atom] {
        &self.unaffected
    }
}

/// A parsed security advisory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Advisory {
    pub id: String,
    pub title: String,
    pub synopsis: String,
    /// `ebuild` or `infrastructure`
    pub product_type: String,
    pub product: String,
    pub announced: String,
    pub revised: String,
    pub revision_count: u32,
    pub access: String,
    pub bugs: Vec<String>,
    pub references: Vec<String>,
    pub background: String,
    pub description: String,
    pub impact: String,
    pub impact_type: String,
    pub workaround: String,
    pub resolution: String,
    pub affected: Vec<AffectedPackageEntry>,
}

impl Advisory {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            product_type: "ebuild".to_string(),
            revision_count: 1,
            ..Self::default()
        }
    }

    pub fn with_entry(mut self, entry: AffectedPackageEntry) -> Self {
        self.affected.push(entry);
        self
    }

    /// Names of the affected packages, without repeats
    pub fn packages(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.affected
            .iter()
            .map(AffectedPackageEntry::package)
            .filter(|package| seen.insert(*package))
            .collect()
    }
}
