//! Range-qualified package atoms
//!
//! An atom is an operator, a package name, a version and an optional slot:
//!
//! - `<dev-libs/openssl-1.0.2k` - every version below 1.0.2k
//! - `>=www-client/firefox-115.3:esr` - 115.3 and up, ESR slot only
//! - `>~sys-libs/glibc-2.37-r3` - 2.37 with a revision above 3
//!
//! The `~` operators are revision ranges: they hold the version fixed and
//! apply the comparison to the revision alone.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::version::error::FormatError;
use crate::version::pv::StructuredVersion;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Less,
    LessOrEqual,
    Equal,
    Greater,
    GreaterOrEqual,
    RevisionLess,
    RevisionLessOrEqual,
    RevisionGreater,
    RevisionGreaterOrEqual,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Less,
        Operator::LessOrEqual,
        Operator::Equal,
        Operator::Greater,
        Operator::GreaterOrEqual,
        Operator::RevisionLess,
        Operator::RevisionLessOrEqual,
        Operator::RevisionGreater,
        Operator::RevisionGreaterOrEqual,
    ];

    /// Tokens ordered so that a prefix scan finds the longest one first
    const BY_LENGTH: [Operator; 9] = [
        Operator::RevisionGreaterOrEqual,
        Operator::RevisionLessOrEqual,
        Operator::RevisionGreater,
        Operator::RevisionLess,
        Operator::GreaterOrEqual,
        Operator::LessOrEqual,
        Operator::Greater,
        Operator::Less,
        Operator::Equal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Less => "<",
            Operator::LessOrEqual => "<=",
            Operator::Equal => "=",
            Operator::Greater => ">",
            Operator::GreaterOrEqual => ">=",
            Operator::RevisionLess => "<~",
            Operator::RevisionLessOrEqual => "<=~",
            Operator::RevisionGreater => ">~",
            Operator::RevisionGreaterOrEqual => ">=~",
        }
    }

    /// Name used by the `range` attribute of advisory documents
    pub fn range_name(&self) -> &'static str {
        match self {
            Operator::Less => "lt",
            Operator::LessOrEqual => "le",
            Operator::Equal => "eq",
            Operator::Greater => "gt",
            Operator::GreaterOrEqual => "ge",
            Operator::RevisionLess => "rlt",
            Operator::RevisionLessOrEqual => "rle",
            Operator::RevisionGreater => "rgt",
            Operator::RevisionGreaterOrEqual => "rge",
        }
    }

    pub fn from_range_name(name: &str) -> Result<Self, FormatError> {
        Self::ALL
            .into_iter()
            .find(|op| op.range_name() == name.trim())
            .ok_or_else(|| FormatError::UnknownOperator(name.to_string()))
    }

    pub fn is_revision_range(&self) -> bool {
        matches!(
            self,
            Operator::RevisionLess
                | Operator::RevisionLessOrEqual
                | Operator::RevisionGreater
                | Operator::RevisionGreaterOrEqual
        )
    }

    /// Whether `candidate.cmp(bound)` satisfies this operator.
    ///
    /// Revision operators share the sense of their plain counterpart.
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Operator::Less | Operator::RevisionLess => ordering == Ordering::Less,
            Operator::LessOrEqual | Operator::RevisionLessOrEqual => {
                ordering != Ordering::Greater
            }
            Operator::Equal => ordering == Ordering::Equal,
            Operator::Greater | Operator::RevisionGreater => ordering == Ordering::Greater,
            Operator::GreaterOrEqual | Operator::RevisionGreaterOrEqual => {
                ordering != Ordering::Less
            }
        }
    }

    /// Split a leading operator token off `text`
    fn split_prefix(text: &str) -> Option<(Self, &str)> {
        Self::BY_LENGTH
            .into_iter()
            .find_map(|op| text.strip_prefix(op.as_str()).map(|rest| (op, rest)))
    }
}

impl FromStr for Operator {
    type Err = FormatError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == token)
            .ok_or_else(|| FormatError::UnknownOperator(token.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    pub operator: Operator,
    /// `category/name`
    pub package: String,
    pub version: StructuredVersion,
    /// `None` matches any slot
    pub slot: Option<String>,
}

/// Build an atom from its parts.
///
/// A slot of `*` or an empty slot means "any slot" and is dropped.
pub fn parse_atom(
    operator: &str,
    package: &str,
    version: &str,
    slot: Option<&str>,
) -> Result<Atom, FormatError> {
    let operator: Operator = operator.parse()?;
    Atom::new(operator, package, version, slot)
}

impl Atom {
    pub fn new(
        operator: Operator,
        package: &str,
        version: &str,
        slot: Option<&str>,
    ) -> Result<Self, FormatError> {
        let package = package.trim();
        if !is_package_name(package) {
            return Err(FormatError::InvalidAtom(format!(
                "{operator}{package}-{version}"
            )));
        }

        Ok(Self {
            operator,
            package: package.to_string(),
            version: version.trim().parse()?,
            slot: normalize_slot(slot),
        })
    }

    /// The atom without its package name, e.g. `>=1.2:0`
    pub fn version_expression(&self) -> String {
        match &self.slot {
            Some(slot) => format!("{}{}:{}", self.operator, self.version, slot),
            None => format!("{}{}", self.operator, self.version),
        }
    }
}

fn normalize_slot(slot: Option<&str>) -> Option<String> {
    slot.map(str::trim)
        .filter(|s| !s.is_empty() && *s != "*")
        .map(str::to_string)
}

fn is_package_name(name: &str) -> bool {
    match name.split_once('/') {
        Some((category, pn)) => {
            !category.is_empty()
                && !pn.is_empty()
                && !pn.contains('/')
                && !name.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Split `category/name-version` into the package name and its version.
///
/// Names may contain hyphens, so the split is made at the first hyphen whose
/// remainder is a valid version.
pub fn split_package_version(text: &str) -> Option<(&str, StructuredVersion)> {
    text.match_indices('-').find_map(|(idx, _)| {
        let (package, rest) = (&text[..idx], &text[idx + 1..]);
        if package.is_empty() || !rest.starts_with(|c: char| c.is_ascii_digit()) {
            return None;
        }
        rest.parse().ok().map(|version| (package, version))
    })
}

impl FromStr for Atom {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidAtom(text.to_string());

        let (operator, rest) = Operator::split_prefix(text.trim()).ok_or_else(invalid)?;
        let (cpv, slot) = match rest.split_once(':') {
            Some((cpv, slot)) => (cpv, Some(slot)),
            None => (rest, None),
        };
        let (package, version) = split_package_version(cpv).ok_or_else(invalid)?;
        if !is_package_name(package) {
            return Err(invalid());
        }

        Ok(Self {
            operator,
            package: package.to_string(),
            version,
            slot: normalize_slot(slot),
        })
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}-{}", self.operator, self.package, self.version)?;
        if let Some(slot) = &self.slot {
            write!(f, ":{slot}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("<dev-libs/openssl-1.0.2k")]
    #[case("<=dev-libs/openssl-1.0.2k-r1")]
    #[case("=x11-libs/gtk+-2.24.0-r1:2")]
    #[case(">www-client/firefox-115.3:esr")]
    #[case(">=dev-lang/python-3.11.4_p1:3.11")]
    #[case("<~sys-libs/glibc-2.37-r3")]
    #[case("<=~sys-libs/glibc-2.37-r3")]
    #[case(">~sys-libs/glibc-2.37-r3")]
    #[case(">=~sys-libs/glibc-2.37-r3:2.2")]
    fn display_round_trips(#[case] text: &str) {
        let atom: Atom = text.parse().unwrap();
        assert_eq!(atom.to_string(), text);
    }

    #[test]
    fn parse_atom_round_trips_every_operator() {
        for op in Operator::ALL {
            let atom = parse_atom(op.as_str(), "cat/pkg", "1.2-r3", Some("1")).unwrap();
            let text = format!("{}cat/pkg-1.2-r3:1", op.as_str());

            assert_eq!(atom.to_string(), text);
            assert_eq!(text.parse::<Atom>().unwrap(), atom);
        }
    }

    #[test]
    fn parse_atom_splits_package_and_version() {
        let atom: Atom = ">=~x11-libs/gtk+-2.24.0-r1:2".parse().unwrap();

        assert_eq!(atom.operator, Operator::RevisionGreaterOrEqual);
        assert_eq!(atom.package, "x11-libs/gtk+");
        assert_eq!(atom.version.to_string(), "2.24.0-r1");
        assert_eq!(atom.slot.as_deref(), Some("2"));
    }

    #[rstest]
    #[case(Some("*"), None)]
    #[case(Some(""), None)]
    #[case(Some("  "), None)]
    #[case(None, None)]
    #[case(Some("0"), Some("0"))]
    #[case(Some(" 2.2 "), Some("2.2"))]
    fn parse_atom_drops_wildcard_slots(#[case] slot: Option<&str>, #[case] expected: Option<&str>) {
        let atom = parse_atom("=", "cat/pkg", "1.0", slot).unwrap();
        assert_eq!(atom.slot.as_deref(), expected);
    }

    #[rstest]
    #[case("=>")]
    #[case("~")]
    #[case("==")]
    #[case("ge")]
    #[case("")]
    fn parse_atom_rejects_unknown_operator(#[case] token: &str) {
        assert_eq!(
            parse_atom(token, "cat/pkg", "1.0", None).unwrap_err(),
            FormatError::UnknownOperator(token.to_string())
        );
    }

    #[test]
    fn parse_atom_rejects_bad_version() {
        assert_eq!(
            parse_atom("<", "cat/pkg", "x1.0", None).unwrap_err(),
            FormatError::InvalidVersion("x1.0".to_string())
        );
    }

    #[rstest]
    #[case("pkg")]
    #[case("/pkg")]
    #[case("cat/")]
    #[case("a/b/c")]
    fn parse_atom_rejects_bad_package(#[case] package: &str) {
        assert!(matches!(
            parse_atom("<", package, "1.0", None),
            Err(FormatError::InvalidAtom(_))
        ));
    }

    #[rstest]
    #[case("cat/pkg-1.0")]
    #[case("~cat/pkg-1.0")]
    #[case("<cat/pkg")]
    #[case("<pkg-1.0")]
    #[case("<cat/pkg-")]
    fn from_str_rejects_malformed_atoms(#[case] text: &str) {
        assert_eq!(
            text.parse::<Atom>().unwrap_err(),
            FormatError::InvalidAtom(text.to_string())
        );
    }

    #[rstest]
    #[case("le", Operator::LessOrEqual)]
    #[case("lt", Operator::Less)]
    #[case("eq", Operator::Equal)]
    #[case("gt", Operator::Greater)]
    #[case("ge", Operator::GreaterOrEqual)]
    #[case("rge", Operator::RevisionGreaterOrEqual)]
    #[case("rle", Operator::RevisionLessOrEqual)]
    #[case("rgt", Operator::RevisionGreater)]
    #[case("rlt", Operator::RevisionLess)]
    fn from_range_name_maps_advisory_ranges(#[case] name: &str, #[case] expected: Operator) {
        assert_eq!(Operator::from_range_name(name).unwrap(), expected);
        assert_eq!(expected.range_name(), name);
    }

    #[test]
    fn from_range_name_rejects_unknown_name() {
        assert_eq!(
            Operator::from_range_name("ne").unwrap_err(),
            FormatError::UnknownOperator("ne".to_string())
        );
    }

    #[test]
    fn only_tilde_operators_are_revision_ranges() {
        let revision: Vec<_> = Operator::ALL
            .into_iter()
            .filter(Operator::is_revision_range)
            .map(|op| op.as_str())
            .collect();

        assert_eq!(revision, vec!["<~", "<=~", ">~", ">=~"]);
    }

    #[test]
    fn version_expression_omits_package() {
        let atom: Atom = ">=cat/pkg-1.2:0".parse().unwrap();
        assert_eq!(atom.version_expression(), ">=1.2:0");
    }

    #[rstest]
    #[case("cat/pkg-1.0", Some(("cat/pkg", "1.0")))]
    #[case("media-libs/libsdl2-2.28.5-r1", Some(("media-libs/libsdl2", "2.28.5-r1")))]
    #[case("app-misc/foo-1bar-1.0", Some(("app-misc/foo-1bar", "1.0")))]
    #[case("cat/pkg", None)]
    fn split_package_version_returns_expected(
        #[case] text: &str,
        #[case] expected: Option<(&str, &str)>,
    ) {
        let split = split_package_version(text).map(|(p, v)| (p, v.to_string()));
        assert_eq!(split, expected.map(|(p, v)| (p, v.to_string())));
    }
}
