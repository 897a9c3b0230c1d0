//! Structured package versions
//!
//! A version is a dotted run of numeric components, an optional letter,
//! optional release suffixes (`_alpha`, `_beta`, `_pre`, `_rc`, `_p`) and an
//! optional revision (`-rN`):
//!
//! - `1.2.3`
//! - `1.0.2k`
//! - `2.4_rc1-r2`

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::version::error::FormatError;

/// Release suffix kinds, in ascending order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SuffixKind {
    Alpha,
    Beta,
    Pre,
    Rc,
    P,
}

impl SuffixKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SuffixKind::Alpha => "alpha",
            SuffixKind::Beta => "beta",
            SuffixKind::Pre => "pre",
            SuffixKind::Rc => "rc",
            SuffixKind::P => "p",
        }
    }

    /// Split a suffix like `rc1` into its kind and trailing digits.
    ///
    /// `pre` has to be tried before `p`.
    fn split(text: &str) -> Option<(Self, &str)> {
        [
            SuffixKind::Alpha,
            SuffixKind::Beta,
            SuffixKind::Pre,
            SuffixKind::Rc,
            SuffixKind::P,
        ]
        .into_iter()
        .find_map(|kind| text.strip_prefix(kind.as_str()).map(|rest| (kind, rest)))
    }
}

#[derive(Debug, Clone)]
pub struct ReleaseSuffix {
    kind: SuffixKind,
    number: Option<String>,
}

impl ReleaseSuffix {
    fn cmp_number(&self, other: &Self) -> Ordering {
        let zero = "0";
        compare_digits(
            self.number.as_deref().unwrap_or(zero),
            other.number.as_deref().unwrap_or(zero),
        )
    }
}

impl fmt::Display for ReleaseSuffix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_{}", self.kind.as_str())?;
        if let Some(number) = &self.number {
            f.write_str(number)?;
        }
        Ok(())
    }
}

/// A parsed package version.
///
/// Numeric components keep their original digits so that rendering gives
/// back what was parsed, but they compare as (arbitrarily large) integers.
/// Equality follows the ordering: `1.2` and `1.2.0` are equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StructuredVersion {
    numbers: Vec<String>,
    letter: Option<char>,
    suffixes: Vec<ReleaseSuffix>,
    revision: u64,
}

impl StructuredVersion {
    /// Revision number; `0` when the version has no `-rN` part
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Compare everything except the revision
    pub fn cmp_base(&self, other: &Self) -> Ordering {
        self.cmp_numbers(other)
            .then_with(|| self.letter.cmp(&other.letter))
            .then_with(|| self.cmp_suffixes(other))
    }

    fn cmp_numbers(&self, other: &Self) -> Ordering {
        let len = self.numbers.len().max(other.numbers.len());
        for idx in 0..len {
            let a = self.numbers.get(idx).map(String::as_str).unwrap_or("0");
            let b = other.numbers.get(idx).map(String::as_str).unwrap_or("0");
            match compare_digits(a, b) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        Ordering::Equal
    }

    /// A missing suffix sits between `_rc` and `_p`: `1.0_rc1 < 1.0 < 1.0_p1`.
    fn cmp_suffixes(&self, other: &Self) -> Ordering {
        let len = self.suffixes.len().max(other.suffixes.len());
        for idx in 0..len {
            let ord = match (self.suffixes.get(idx), other.suffixes.get(idx)) {
                (Some(a), Some(b)) => a.kind.cmp(&b.kind).then_with(|| a.cmp_number(b)),
                (Some(a), None) if a.kind == SuffixKind::P => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (None, Some(b)) if b.kind == SuffixKind::P => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        Ordering::Equal
    }
}

/// Compare two digit strings numerically without overflowing
fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Total order over structured versions: numbers, letter, suffixes, revision
pub fn compare_versions(a: &StructuredVersion, b: &StructuredVersion) -> Ordering {
    a.cmp(b)
}

/// Compare only the revisions of two versions.
///
/// Callers are expected to have checked that the versions agree on
/// everything else (see [`StructuredVersion::cmp_base`]).
pub fn compare_revisions(a: &StructuredVersion, b: &StructuredVersion) -> Ordering {
    a.revision.cmp(&b.revision)
}

impl PartialEq for StructuredVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for StructuredVersion {}

impl PartialOrd for StructuredVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StructuredVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cmp_base(other)
            .then_with(|| compare_revisions(self, other))
    }
}

impl FromStr for StructuredVersion {
    type Err = FormatError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || FormatError::InvalidVersion(text.to_string());

        let (body, revision) = match text.rsplit_once("-r") {
            Some((body, rev)) if is_digits(rev) => {
                (body, rev.parse::<u64>().map_err(|_| invalid())?)
            }
            _ => (text, 0),
        };

        let mut parts = body.split('_');
        let head = parts.next().unwrap_or_default();

        let (digits, letter) = match head.chars().last() {
            Some(c) if c.is_ascii_lowercase() => (&head[..head.len() - 1], Some(c)),
            _ => (head, None),
        };

        let numbers = digits
            .split('.')
            .map(|n| is_digits(n).then(|| n.to_string()))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        let suffixes = parts
            .map(|part| {
                let (kind, rest) = SuffixKind::split(part)?;
                match rest {
                    "" => Some(ReleaseSuffix { kind, number: None }),
                    n if is_digits(n) => Some(ReleaseSuffix {
                        kind,
                        number: Some(n.to_string()),
                    }),
                    _ => None,
                }
            })
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        Ok(Self {
            numbers,
            letter,
            suffixes,
            revision,
        })
    }
}

impl TryFrom<String> for StructuredVersion {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StructuredVersion> for String {
    fn from(value: StructuredVersion) -> Self {
        value.to_string()
    }
}

/// Renders the version; a zero revision is never shown
impl fmt::Display for StructuredVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.numbers.join("."))?;
        if let Some(letter) = self.letter {
            write!(f, "{letter}")?;
        }
        for suffix in &self.suffixes {
            write!(f, "{suffix}")?;
        }
        if self.revision > 0 {
            write!(f, "-r{}", self.revision)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn v(text: &str) -> StructuredVersion {
        text.parse().unwrap()
    }

    #[rstest]
    #[case("1.0", "1.1", Ordering::Less)]
    #[case("1.10", "1.9", Ordering::Greater)]
    #[case("1.2", "1.2.0", Ordering::Equal)]
    #[case("1.2", "1.2.1", Ordering::Less)]
    #[case("1.05", "1.5", Ordering::Equal)]
    #[case("1.0", "1.0a", Ordering::Less)]
    #[case("1.0a", "1.0b", Ordering::Less)]
    #[case("1.0z", "1.1", Ordering::Less)]
    #[case("1.0-r1", "1.0", Ordering::Greater)]
    #[case("1.0-r0", "1.0", Ordering::Equal)]
    #[case("1.0-r10", "1.0-r9", Ordering::Greater)]
    #[case("1.0_rc1", "1.0", Ordering::Less)]
    #[case("1.0_p1", "1.0", Ordering::Greater)]
    #[case("1.0_alpha", "1.0_beta", Ordering::Less)]
    #[case("1.0_pre2", "1.0_rc1", Ordering::Less)]
    #[case("1.0_rc2", "1.0_rc10", Ordering::Less)]
    #[case("20240101", "20231231", Ordering::Greater)]
    #[case("99999999999999999999999.1", "99999999999999999999999.0", Ordering::Greater)]
    fn compare_versions_returns_expected(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_versions(&v(a), &v(b)), expected);
        assert_eq!(compare_versions(&v(b), &v(a)), expected.reverse());
    }

    #[rstest]
    #[case("1.2-r3", "1.2-r4", Ordering::Less)]
    #[case("1.2-r3", "1.2-r3", Ordering::Equal)]
    #[case("1.2", "1.2-r0", Ordering::Equal)]
    #[case("1.2-r5", "1.2", Ordering::Greater)]
    fn compare_revisions_returns_expected(
        #[case] a: &str,
        #[case] b: &str,
        #[case] expected: Ordering,
    ) {
        assert_eq!(compare_revisions(&v(a), &v(b)), expected);
    }

    #[rstest]
    #[case("1.0")]
    #[case("1.0-r2")]
    #[case("0.9.8z")]
    #[case("2.4_rc1_p3-r1")]
    #[case("1.007")]
    fn display_reproduces_parsed_text(#[case] text: &str) {
        assert_eq!(v(text).to_string(), text);
    }

    #[test]
    fn display_hides_zero_revision() {
        assert_eq!(v("1.0-r0").to_string(), "1.0");
        assert_eq!(v("1.0-r1").to_string(), "1.0-r1");
    }

    #[rstest]
    #[case("")]
    #[case("abc")]
    #[case("a1.0")]
    #[case("1..0")]
    #[case("1.0.")]
    #[case("1.0ab")]
    #[case("0.9.8zh")]
    #[case("1.0_gamma")]
    #[case("1.0_rc1x")]
    #[case("1.0-r")]
    #[case("1.0-rc")]
    fn from_str_rejects_malformed_versions(#[case] text: &str) {
        assert_eq!(
            text.parse::<StructuredVersion>().unwrap_err(),
            FormatError::InvalidVersion(text.to_string())
        );
    }

    #[test]
    fn cmp_base_ignores_revision() {
        let version = v("1.2a_p1-r7");

        assert_eq!(version.revision(), 7);
        assert_eq!(version.cmp_base(&v("1.2a_p1")), Ordering::Equal);
        assert_eq!(version.cmp_base(&v("1.2a_p2")), Ordering::Less);
    }

    #[test]
    fn deserializes_from_string() {
        let version: StructuredVersion = serde_json::from_str("\"1.2-r1\"").unwrap();
        assert_eq!(version, v("1.2-r1"));
        assert!(serde_json::from_str::<StructuredVersion>("\"x\"").is_err());
    }
}
