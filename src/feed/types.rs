//! Common types for local feed search results

use serde::{Deserialize, Serialize};

/// A configured package source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageSource {
    /// Stable identifier of the source
    pub id: String,
    /// Display name of the source
    pub source_name: String,
    /// Directory holding the `.nupkg` files (local feeds only)
    pub source_directory: Option<String>,
}

impl PackageSource {
    pub fn new(id: &str, source_name: &str, source_directory: Option<&str>) -> Self {
        Self {
            id: id.to_string(),
            source_name: source_name.to_string(),
            source_directory: source_directory.map(str::to_string),
        }
    }

    /// Returns the configured directory, treating an empty string as absent
    pub fn directory(&self) -> Option<&str> {
        self.source_directory.as_deref().filter(|dir| !dir.is_empty())
    }
}

/// A single version entry of a search result
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchPackageResultVersion {
    pub version: String,
    pub downloads: u64,
}

impl SearchPackageResultVersion {
    pub fn new(version: &str, downloads: u64) -> Self {
        Self {
            version: version.to_string(),
            downloads,
        }
    }
}

/// Package type declared in a manifest (`<packageType name=".." version=".."/>`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageType {
    pub name: String,
    pub version: String,
}

/// Metadata of a package as read from its manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PackageMetadata {
    /// Package identity; records with equal ids are merged by the aggregator
    pub id: String,
    pub registration: String,
    pub version: String,
    pub description: String,
    pub summary: String,
    pub title: String,
    pub icon_url: String,
    pub license_url: String,
    pub project_url: String,
    pub tags: Vec<String>,
    pub authors: Vec<String>,
    pub total_downloads: u64,
    pub verified: bool,
    pub package_types: Vec<PackageType>,
    /// Always empty when produced by the manifest extractor
    pub versions: Vec<SearchPackageResultVersion>,
}

/// Search result envelope for one package source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPackageResult {
    pub data: Vec<PackageMetadata>,
    pub package_source_id: String,
    pub package_source_name: String,
    /// Number of aggregated packages before pagination
    pub total_hits: usize,
}

impl SearchPackageResult {
    /// Creates an empty result bound to the given source
    pub fn empty(source: &PackageSource) -> Self {
        Self {
            data: Vec::new(),
            package_source_id: source.id.clone(),
            package_source_name: source.source_name.clone(),
            total_hits: 0,
        }
    }
}

/// Versions available for one package in one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageVersion {
    pub package_name: String,
    pub versions: Vec<String>,
    pub source_name: String,
    pub source_id: String,
}
