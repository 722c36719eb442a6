//! package.json dependency extraction
//!
//! Only the fields needed to build a dependency set are read; the rest of the
//! manifest is ignored.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use heft_core::error::HeftError;
use crate::ConfigResult;

/// The parts of a package.json heft reads
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackageJson {
    /// Package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Package version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Runtime dependencies
    #[serde(default)]
    pub dependencies: IndexMap<String, String>,

    /// Development dependencies
    #[serde(default, rename = "devDependencies")]
    pub dev_dependencies: IndexMap<String, String>,
}

impl PackageJson {
    /// Runtime and development dependencies as one ordered set.
    ///
    /// A package listed in both keeps its runtime position and takes the
    /// development version.
    pub fn dependency_entries(&self) -> IndexMap<String, String> {
        let mut entries = self.dependencies.clone();
        for (name, version) in &self.dev_dependencies {
            entries.insert(name.clone(), version.clone());
        }
        entries
    }

    /// Count of declared dependencies before merging
    pub fn declared_count(&self) -> (usize, usize) {
        (self.dependencies.len(), self.dev_dependencies.len())
    }
}

/// Parse package.json content
pub fn parse_package_json(content: &str) -> ConfigResult<PackageJson> {
    serde_json::from_str(content).map_err(|e| HeftError::JsonParse {
        message: format!("{} at line {}, column {}", e, e.line(), e.column()),
    })
}

/// Load and parse package.json from file
pub async fn load_from_file(path: &camino::Utf8Path) -> ConfigResult<PackageJson> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| HeftError::io(format!("Failed to read {}", path), e))?;

    parse_package_json(&content).map_err(|e| match e {
        HeftError::JsonParse { message } => HeftError::JsonParse {
            message: format!("In file {}: {}", path, message),
        },
        other => other,
    })
}
