//! Cache keys for stats lookups.

use std::fmt;

/// Strip every character that is not an ASCII digit or `.`.
///
/// `^1.2.3`, `~1.2.3` and `1.2.3` all become `1.2.3`. Range operators and
/// prerelease tags are discarded, not interpreted.
pub fn normalize_version(version: &str) -> String {
    version
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect()
}

/// Key identifying one package version in the stats cache
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatsKey {
    /// Package name, verbatim (may be `@scope/name`)
    pub name: String,
    /// Normalized version
    pub version: String,
}

impl StatsKey {
    /// Create a key, normalizing the version
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_string(),
            version: normalize_version(version),
        }
    }
}

impl fmt::Display for StatsKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}
