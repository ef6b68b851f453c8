//! Dotted numeric versions.
//!
//! A [`Version`] is a non-empty sequence of non-negative integers separated by
//! dots (`1`, `1.11`, `2.10.3`). Ordering is numeric per component and missing
//! trailing components count as zero, so `1.2` and `1.2.0` are equal.
//!
//! Qualified strings such as `1.0-SNAPSHOT` are not versions in this sense;
//! see [`crate::domain::artifact::compare_versions`] for the ordering used on
//! artifact version strings.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::error::DomainError;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)*$").expect("version pattern is valid"));

/// A parsed dotted numeric version.
///
/// Invariant: `parts` is never empty and `raw` matches `[0-9]+(\.[0-9]+)*`.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    parts: Vec<u64>,
}

impl Version {
    /// Parse a version string.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidVersionFormat`] if the text is empty or is not a
    /// dotted sequence of digits.
    pub fn parse(text: &str) -> Result<Self, DomainError> {
        if !VERSION_PATTERN.is_match(text) {
            return Err(DomainError::InvalidVersionFormat {
                input: text.to_string(),
            });
        }

        let parts = text
            .split('.')
            .map(|part| {
                part.parse::<u64>()
                    .map_err(|_| DomainError::InvalidVersionFormat {
                        input: text.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: text.to_string(),
            parts,
        })
    }

    /// Parse an optional version; a missing value is a format error too.
    pub fn parse_opt(text: Option<&str>) -> Result<Self, DomainError> {
        match text {
            Some(text) => Self::parse(text),
            None => Err(DomainError::InvalidVersionFormat {
                input: "<none>".into(),
            }),
        }
    }

    /// The original text.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Numeric components as parsed.
    pub fn parts(&self) -> &[u64] {
        &self.parts
    }

    /// Compare component by component over the longer of the two sequences.
    pub fn compare(&self, other: &Self) -> Ordering {
        let length = self.parts.len().max(other.parts.len());
        for i in 0..length {
            let ours = self.parts.get(i).copied().unwrap_or(0);
            let theirs = other.parts.get(i).copied().unwrap_or(0);
            match ours.cmp(&theirs) {
                Ordering::Equal => continue,
                decided => return decided,
            }
        }
        Ordering::Equal
    }

    pub fn higher(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Greater
    }

    pub fn lower(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Less
    }

    pub fn equal(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl FromStr for Version {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn trailing_zeros_are_equal() {
        assert_eq!(v("1.2").compare(&v("1.2.0")), Ordering::Equal);
        assert_eq!(v("1.0").compare(&v("1")), Ordering::Equal);
        assert_eq!(v("1"), v("1.0.0"));
    }

    #[test]
    fn components_compare_numerically() {
        assert_eq!(v("2.10").compare(&v("2.9")), Ordering::Greater);
        assert!(v("2.10").higher(&v("2.9")));
        assert!(v("1.9.9").lower(&v("1.10")));
    }

    #[test]
    fn first_differing_component_decides() {
        assert!(v("1.11.6").higher(&v("1.11.5.99")));
        assert!(v("0.1").lower(&v("1")));
    }

    #[test]
    fn rejects_malformed_text() {
        for bad in ["1.a", "", "1.", ".1", "1..2", "1.0-SNAPSHOT", " 1.0", "-1"] {
            assert!(
                matches!(
                    Version::parse(bad),
                    Err(DomainError::InvalidVersionFormat { .. })
                ),
                "accepted: {bad:?}"
            );
        }
    }

    #[test]
    fn missing_value_is_invalid() {
        assert!(matches!(
            Version::parse_opt(None),
            Err(DomainError::InvalidVersionFormat { .. })
        ));
        assert!(Version::parse_opt(Some("2.3")).is_ok());
    }

    #[test]
    fn display_keeps_original_text() {
        assert_eq!(v("1.11.06").to_string(), "1.11.06");
    }

    fn version_text() -> impl Strategy<Value = String> {
        prop::collection::vec(0u64..20, 1..5).prop_map(|parts| {
            parts
                .iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join(".")
        })
    }

    proptest! {
        #[test]
        fn compare_is_antisymmetric(a in version_text(), b in version_text()) {
            let (a, b) = (v(&a), v(&b));
            prop_assert_eq!(a.compare(&b), b.compare(&a).reverse());
        }

        #[test]
        fn compare_is_transitive(a in version_text(), b in version_text(), c in version_text()) {
            let (a, b, c) = (v(&a), v(&b), v(&c));
            if a.compare(&b) != Ordering::Greater && b.compare(&c) != Ordering::Greater {
                prop_assert_ne!(a.compare(&c), Ordering::Greater);
            }
        }

        #[test]
        fn appending_zero_keeps_equality(a in version_text()) {
            let padded = format!("{a}.0");
            prop_assert!(v(&a).equal(&v(&padded)));
        }
    }
}
