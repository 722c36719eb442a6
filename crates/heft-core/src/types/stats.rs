//! Bundle statistics types.
//!
//! `BundleStats` is what every source produces; `Resolution` is what every
//! lookup returns, so "size unknown" is a variant rather than a null.

use serde::{Deserialize, Serialize};

/// Size and shape information for one package version.
///
/// Optional fields are `None` when the producing source does not report
/// them. `None` means unknown, not false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleStats {
    /// Bundled size in bytes
    pub size: u64,
    /// Gzip-compressed size in bytes
    pub gzip: u64,
    /// Number of direct dependencies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency_count: Option<u64>,
    /// Package ships an ES module entry (`module` field)
    #[serde(default, rename = "hasJSModule", skip_serializing_if = "Option::is_none")]
    pub has_js_module: Option<bool>,
    /// Package ships a `jsnext:main` entry
    #[serde(default, rename = "hasJSNext", skip_serializing_if = "Option::is_none")]
    pub has_js_next: Option<bool>,
    /// Package declares side effects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_side_effects: Option<bool>,
}

impl BundleStats {
    /// Stats carrying only the two sizes, every flag unknown
    pub fn sized(size: u64, gzip: u64) -> Self {
        Self {
            size,
            gzip,
            dependency_count: None,
            has_js_module: None,
            has_js_next: None,
            has_side_effects: None,
        }
    }

    /// Check whether the package can be tree-shaken by a bundler.
    ///
    /// Returns `None` when the module-format or side-effect flags are unknown.
    pub fn is_tree_shakeable(&self) -> Option<bool> {
        let esm = match (self.has_js_module, self.has_js_next) {
            (Some(true), _) | (_, Some(true)) => true,
            (Some(false), Some(false)) => false,
            _ => return None,
        };
        Some(esm && !self.has_side_effects?)
    }
}

/// Outcome of a stats lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A source produced stats for the package
    Resolved(BundleStats),
    /// No source could produce stats; treat the size as unknown
    Unresolved,
}

impl Resolution {
    /// Check if stats are available
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved(_))
    }

    /// Borrow the stats if resolved
    pub fn stats(&self) -> Option<&BundleStats> {
        match self {
            Resolution::Resolved(stats) => Some(stats),
            Resolution::Unresolved => None,
        }
    }

    /// Convert into the stats if resolved
    pub fn into_stats(self) -> Option<BundleStats> {
        match self {
            Resolution::Resolved(stats) => Some(stats),
            Resolution::Unresolved => None,
        }
    }
}

impl From<Option<BundleStats>> for Resolution {
    fn from(stats: Option<BundleStats>) -> Self {
        match stats {
            Some(stats) => Resolution::Resolved(stats),
            None => Resolution::Unresolved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_analysis_body() {
        let body = serde_json::json!({
            "size": 5000,
            "gzip": 1500,
            "dependencyCount": 2,
            "hasJSModule": true,
            "hasJSNext": false,
            "hasSideEffects": false,
            "name": "ignored"
        });

        let stats: BundleStats = serde_json::from_value(body).unwrap();
        assert_eq!(stats.size, 5000);
        assert_eq!(stats.gzip, 1500);
        assert_eq!(stats.dependency_count, Some(2));
        assert_eq!(stats.has_js_module, Some(true));
        assert_eq!(stats.has_js_next, Some(false));
        assert_eq!(stats.has_side_effects, Some(false));
    }

    #[test]
    fn test_missing_flags_are_unknown() {
        let stats: BundleStats =
            serde_json::from_value(serde_json::json!({ "size": 10, "gzip": 3 })).unwrap();
        assert_eq!(stats, BundleStats::sized(10, 3));

        let json = serde_json::to_value(&stats).unwrap();
        assert!(json.get("hasJSModule").is_none());
    }

    #[test]
    fn test_tree_shakeable() {
        let mut stats = BundleStats::sized(10, 3);
        assert_eq!(stats.is_tree_shakeable(), None);

        stats.has_js_module = Some(true);
        stats.has_side_effects = Some(false);
        assert_eq!(stats.is_tree_shakeable(), Some(true));

        stats.has_side_effects = Some(true);
        assert_eq!(stats.is_tree_shakeable(), Some(false));

        stats.has_js_module = Some(false);
        stats.has_js_next = Some(false);
        assert_eq!(stats.is_tree_shakeable(), Some(false));
    }

    #[test]
    fn test_resolution_accessors() {
        let resolved = Resolution::Resolved(BundleStats::sized(100, 30));
        assert!(resolved.is_resolved());
        assert_eq!(resolved.stats().map(|s| s.gzip), Some(30));

        let unresolved: Resolution = None.into();
        assert!(!unresolved.is_resolved());
        assert_eq!(unresolved.into_stats(), None);
    }
}
