use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// A three-component `major.minor.patch` version identifier.
///
/// Ordering is lexicographic over the triple (derived field order), so
/// `1.9.9 < 1.10.0 < 2.0.0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Lenient parse for a record's `min_supported_version`: missing trailing
    /// components count as 0 ("2.1" reads as 2.1.0) and components past the
    /// third are ignored. Returns `None` when any component is non-numeric,
    /// in which case callers must treat the floor constraint as absent.
    pub fn parse_padded(text: &str) -> Option<Self> {
        let mut parts = [0u64; 3];
        for (i, raw) in text.split('.').take(3).enumerate() {
            parts[i] = parse_component(raw)?;
        }
        Some(Self::new(parts[0], parts[1], parts[2]))
    }
}

impl FromStr for Version {
    type Err = ValidationError;

    /// Strict grammar: exactly three dot-separated runs of ASCII digits
    /// (`^\d+\.\d+\.\d+$`). Anything else is `InvalidFormat`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidFormat(s.to_string());

        let mut components = s.split('.');
        let major = parse_component(components.next().ok_or_else(invalid)?).ok_or_else(invalid)?;
        let minor = parse_component(components.next().ok_or_else(invalid)?).ok_or_else(invalid)?;
        let patch = parse_component(components.next().ok_or_else(invalid)?).ok_or_else(invalid)?;
        if components.next().is_some() {
            return Err(invalid());
        }

        Ok(Self::new(major, minor, patch))
    }
}

fn parse_component(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cmp::Ordering;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!(v("1.2.3"), Version::new(1, 2, 3));
        assert_eq!(v("0.0.0"), Version::new(0, 0, 0));
        assert_eq!(v("10.20.300"), Version::new(10, 20, 300));
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["1.2", "1.2.3.4", "a.b.c", "", "1.2.x", "1..3", "v1.2.3", "1.2.3 ", "-1.2.3"] {
            assert!(
                bad.parse::<Version>().is_err(),
                "expected '{bad}' to be rejected"
            );
        }
    }

    #[test]
    fn test_ordering() {
        assert!(v("1.2.2") < v("1.2.3"));
        assert!(v("1.9.9") < v("1.10.0"));
        assert!(v("1.10.0") < v("2.0.0"));
        assert_eq!(v("1.2.3").cmp(&v("1.2.3")), Ordering::Equal);
    }

    #[test]
    fn test_ordering_antisymmetric_transitive() {
        let a = v("1.0.5");
        let b = v("1.1.0");
        let c = v("2.0.0");
        assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        assert!(a < b && b < c && a < c);
    }

    #[test]
    fn test_parse_padded() {
        assert_eq!(Version::parse_padded("2.1"), Some(Version::new(2, 1, 0)));
        assert_eq!(Version::parse_padded("2"), Some(Version::new(2, 0, 0)));
        assert_eq!(
            Version::parse_padded("1.2.3.4"),
            Some(Version::new(1, 2, 3))
        );
        assert_eq!(Version::parse_padded("2.x"), None);
        assert_eq!(Version::parse_padded(""), None);
    }

    #[test]
    fn test_display_round_trip() {
        assert_eq!(v("1.2.3").to_string(), "1.2.3");
    }
}
