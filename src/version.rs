use std::cmp::Ordering;
use std::fmt;

/// Dot-separated numeric version such as `1.0.150`.
///
/// Missing trailing components compare as zero, so `1.2` and `1.2.0` are equal.
#[derive(Debug, Clone)]
pub struct VersionString {
    pub original: String,
    components: Vec<u64>,
}

impl VersionString {
    /// Parse a version made only of non-negative integer components.
    /// Returns `None` for anything else (empty segments, tags, pre-release suffixes).
    pub fn parse(version: &str) -> Option<Self> {
        let trimmed = version.trim();
        if trimmed.is_empty() {
            return None;
        }

        let mut components = Vec::new();
        for part in trimmed.split('.') {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            components.push(part.parse::<u64>().ok()?);
        }

        Some(Self {
            original: trimmed.to_string(),
            components,
        })
    }

    /// Strip a leading non-numeric tag prefix (`v1.2.3`, `release-1.2.3`) and parse the rest.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let stripped = tag.trim().trim_start_matches(|c: char| !c.is_ascii_digit());
        Self::parse(stripped)
    }

    #[cfg(test)]
    pub fn components(&self) -> &[u64] {
        &self.components
    }

    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq for VersionString {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for VersionString {}

impl PartialOrd for VersionString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionString {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            let a = self.components.get(i).copied().unwrap_or(0);
            let b = other.components.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }
        Ordering::Equal
    }
}

/// Outcome of comparing version `a` against version `b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `a` is newer than `b`
    Newer,
    /// `a` is older than `b`
    Older,
    Same,
    /// At least one side is missing or not dot-numeric. Never treated as `Same`.
    Unknown,
}

impl Comparison {
    #[cfg(test)]
    pub fn inverse(self) -> Self {
        match self {
            Comparison::Newer => Comparison::Older,
            Comparison::Older => Comparison::Newer,
            other => other,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Comparison::Newer => "newer",
            Comparison::Older => "older",
            Comparison::Same => "same",
            Comparison::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

pub struct VersionComparator;

impl VersionComparator {
    /// Compare `a` against `b`: `compare(Some("2.0.0"), Some("1.9.9"))` is `Newer`.
    pub fn compare(a: Option<&str>, b: Option<&str>) -> Comparison {
        let (Some(a), Some(b)) = (
            a.and_then(VersionString::parse),
            b.and_then(VersionString::parse),
        ) else {
            return Comparison::Unknown;
        };

        match a.cmp(&b) {
            Ordering::Greater => Comparison::Newer,
            Ordering::Less => Comparison::Older,
            Ordering::Equal => Comparison::Same,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp(a: &str, b: &str) -> Comparison {
        VersionComparator::compare(Some(a), Some(b))
    }

    #[test]
    fn trailing_zero_components_are_ignored() {
        assert_eq!(cmp("1.0.150", "1.0.150.0"), Comparison::Same);
        assert_eq!(cmp("1.2", "1.2.0"), Comparison::Same);
    }

    #[test]
    fn first_differing_component_decides() {
        assert_eq!(cmp("1.2", "1.2.1"), Comparison::Older);
        assert_eq!(cmp("2.0.0", "1.9.9"), Comparison::Newer);
        assert_eq!(cmp("1.0.10", "1.0.9"), Comparison::Newer);
    }

    #[test]
    fn comparison_is_antisymmetric() {
        let samples = ["1", "1.0", "1.0.140", "1.0.150", "1.0.150.0", "2.0.0", "1.9.9", "10.1"];
        for a in samples {
            assert_eq!(cmp(a, a), Comparison::Same);
            for b in samples {
                assert_eq!(cmp(a, b), cmp(b, a).inverse(), "{a} vs {b}");
            }
        }
    }

    #[test]
    fn missing_or_malformed_input_is_unknown() {
        assert_eq!(
            VersionComparator::compare(None, Some("1.0.0")),
            Comparison::Unknown
        );
        assert_ne!(
            VersionComparator::compare(None, Some("1.0.0")),
            Comparison::Same
        );
        assert_eq!(cmp("1.0.0-beta", "1.0.0"), Comparison::Unknown);
        assert_eq!(cmp("1..0", "1.0"), Comparison::Unknown);
        assert_eq!(VersionComparator::compare(None, None), Comparison::Unknown);
    }

    #[test]
    fn tag_prefix_is_stripped() {
        let v = VersionString::from_tag("v1.0.150").unwrap();
        assert_eq!(v.as_str(), "1.0.150");
        assert_eq!(v.components(), &[1, 0, 150]);
        assert!(VersionString::from_tag("release-").is_none());
    }
}
