//! npm registry API response types
//!
//! Only the fields the size lookup reads are modelled; everything else in the
//! packument is ignored during deserialization.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Package metadata response from npm registry
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PackageMetadataResponse {
    /// Package name
    #[serde(default)]
    pub name: Option<String>,
    /// All versions metadata
    #[serde(default)]
    pub versions: HashMap<String, VersionMetadata>,
}

/// Metadata for a specific package version
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct VersionMetadata {
    /// Distribution information
    #[serde(default)]
    pub dist: Option<DistInfo>,
}

/// Distribution information for package tarball
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DistInfo {
    /// Unpacked size in bytes
    #[serde(rename = "unpackedSize")]
    pub unpacked_size: Option<u64>,
}

impl PackageMetadataResponse {
    /// Declared unpacked size of one version.
    ///
    /// A zero size is treated the same as a missing one.
    pub fn unpacked_size(&self, version: &str) -> Option<u64> {
        self.versions
            .get(version)?
            .dist
            .as_ref()?
            .unpacked_size
            .filter(|size| *size > 0)
    }
}
