use std::fmt;
use std::sync::{Arc, LazyLock};

/// Inclusive status range. `min > max` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StatusRange {
    pub min: i64,
    pub max: i64,
}

impl StatusRange {
    #[must_use]
    pub const fn new(min: i64, max: i64) -> Self {
        Self { min, max }
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, status: i64) -> bool {
        self.min <= status && status <= self.max
    }
}

/// Immutable predicate deciding whether a response status is expected.
///
/// Exact values are checked before ranges. Both lists keep the order (and duplicates) they
/// were built with so that the matcher can be shown back to the script author unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusMatcher {
    exact: Vec<i64>,
    ranges: Vec<StatusRange>,
}

static DEFAULT_EXPECTED_STATUSES: LazyLock<Arc<StatusMatcher>> =
    LazyLock::new(|| Arc::new(StatusMatcher::new(Vec::new(), vec![StatusRange::new(200, 399)])));

/// Engine default: `200..=399`.
#[must_use]
pub fn default_expected_statuses() -> Arc<StatusMatcher> {
    DEFAULT_EXPECTED_STATUSES.clone()
}

impl StatusMatcher {
    #[must_use]
    pub fn new(exact: Vec<i64>, ranges: Vec<StatusRange>) -> Self {
        Self { exact, ranges }
    }

    #[must_use]
    pub fn exact(&self) -> &[i64] {
        &self.exact
    }

    #[must_use]
    pub fn ranges(&self) -> &[StatusRange] {
        &self.ranges
    }

    #[must_use]
    pub fn matches(&self, status: i64) -> bool {
        self.exact.contains(&status) || self.ranges.iter().any(|r| r.contains(status))
    }
}

impl fmt::Display for StatusMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected_statuses(")?;
        let mut first = true;
        for v in &self.exact {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{v}")?;
        }
        for r in &self.ranges {
            if !first {
                f.write_str(", ")?;
            }
            first = false;
            write!(f, "{{min:{}, max:{}}}", r.min, r.max)?;
        }
        f.write_str(")")
    }
}
