//! `.nuspec` manifest extraction

pub mod mapping;
pub mod xml;

use crate::feed::error::ManifestError;
use crate::feed::types::PackageMetadata;

use mapping::{METADATA_RULES, apply_rules};
use xml::XmlElement;

/// Parses manifest XML into a metadata record.
///
/// The returned record always has an empty `versions` list; version entries
/// are added by the aggregator.
pub fn parse_manifest(text: &str) -> Result<PackageMetadata, ManifestError> {
    let root = XmlElement::parse(text)?;
    Ok(apply_rules(&root, METADATA_RULES))
}
