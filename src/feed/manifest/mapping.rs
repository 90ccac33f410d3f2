//! Declarative mapping from manifest elements to `PackageMetadata` fields
//!
//! Every rule names the element path from the document root. The first
//! element found along the path wins; a missing segment yields the rule's
//! default.

use crate::feed::manifest::xml::XmlElement;
use crate::feed::types::{PackageMetadata, PackageType};

type Setter<T> = fn(&mut PackageMetadata, T);

/// How a manifest value is turned into a metadata field
pub enum FieldRule {
    /// Text content, `default` when the path is missing
    Text {
        path: &'static [&'static str],
        default: &'static str,
        set: Setter<String>,
    },
    /// Non-negative integer, surrounding whitespace ignored; missing or unparsable text yields 0
    Count {
        path: &'static [&'static str],
        set: Setter<u64>,
    },
    /// True only for the literal text `true`
    Flag {
        path: &'static [&'static str],
        set: Setter<bool>,
    },
    /// Text of every `item` child of the container at `path`
    TextList {
        path: &'static [&'static str],
        item: &'static str,
        set: Setter<Vec<String>>,
    },
    /// `name`/`version` attributes of every `item` child of the container at `path`
    TypeList {
        path: &'static [&'static str],
        item: &'static str,
        set: Setter<Vec<PackageType>>,
    },
}

const ID: &[&str] = &["package", "metadata", "id"];
const REGISTRATION: &[&str] = &["package", "metadata", "registration"];
const VERSION: &[&str] = &["package", "metadata", "version"];
const DESCRIPTION: &[&str] = &["package", "metadata", "description"];
const SUMMARY: &[&str] = &["package", "metadata", "summary"];
const TITLE: &[&str] = &["package", "metadata", "title"];
const ICON_URL: &[&str] = &["package", "metadata", "iconUrl"];
const LICENSE_URL: &[&str] = &["package", "metadata", "licenseUrl"];
const PROJECT_URL: &[&str] = &["package", "metadata", "projectUrl"];
const TOTAL_DOWNLOADS: &[&str] = &["package", "metadata", "totalDownloads"];
const VERIFIED: &[&str] = &["package", "metadata", "verified"];
const TAGS: &[&str] = &["package", "metadata", "tags"];
const AUTHORS: &[&str] = &["package", "metadata", "authors"];
const PACKAGE_TYPES: &[&str] = &["package", "metadata", "packageTypes"];

/// Rules applied to every `.nuspec` manifest
pub const METADATA_RULES: &[FieldRule] = &[
    FieldRule::Text { path: ID, default: "", set: |m, v| m.id = v },
    FieldRule::Text { path: REGISTRATION, default: "", set: |m, v| m.registration = v },
    FieldRule::Text { path: VERSION, default: "", set: |m, v| m.version = v },
    FieldRule::Text { path: DESCRIPTION, default: "", set: |m, v| m.description = v },
    FieldRule::Text { path: SUMMARY, default: "", set: |m, v| m.summary = v },
    FieldRule::Text { path: TITLE, default: "", set: |m, v| m.title = v },
    FieldRule::Text { path: ICON_URL, default: "", set: |m, v| m.icon_url = v },
    FieldRule::Text { path: LICENSE_URL, default: "", set: |m, v| m.license_url = v },
    FieldRule::Text { path: PROJECT_URL, default: "", set: |m, v| m.project_url = v },
    FieldRule::Count { path: TOTAL_DOWNLOADS, set: |m, v| m.total_downloads = v },
    FieldRule::Flag { path: VERIFIED, set: |m, v| m.verified = v },
    FieldRule::TextList { path: TAGS, item: "tag", set: |m, v| m.tags = v },
    FieldRule::TextList { path: AUTHORS, item: "author", set: |m, v| m.authors = v },
    FieldRule::TypeList { path: PACKAGE_TYPES, item: "packageType", set: |m, v| m.package_types = v },
];

impl FieldRule {
    fn apply(&self, root: &XmlElement, metadata: &mut PackageMetadata) {
        match self {
            FieldRule::Text { path, default, set } => {
                let value = lookup(root, path).map_or_else(|| default.to_string(), XmlElement::text);
                set(metadata, value);
            }
            FieldRule::Count { path, set } => {
                let text = lookup(root, path).map_or_else(|| "0".to_string(), XmlElement::text);
                set(metadata, text.trim().parse::<u64>().unwrap_or(0));
            }
            FieldRule::Flag { path, set } => {
                let verified = lookup(root, path).is_some_and(|element| element.text() == "true");
                set(metadata, verified);
            }
            FieldRule::TextList { path, item, set } => {
                let values: Vec<String> = lookup(root, path)
                    .map(|container| container.children_named(item).map(XmlElement::text).collect())
                    .unwrap_or_default();
                set(metadata, values);
            }
            FieldRule::TypeList { path, item, set } => {
                let values: Vec<PackageType> = lookup(root, path)
                    .map(|container| {
                        container
                            .children_named(item)
                            .map(|element| PackageType {
                                name: element.attribute("name").unwrap_or_default().to_string(),
                                version: element.attribute("version").unwrap_or_default().to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default();
                set(metadata, values);
            }
        }
    }
}

/// Walks `path` from the root, taking the first matching child at each step
fn lookup<'a>(root: &'a XmlElement, path: &[&str]) -> Option<&'a XmlElement> {
    let (first, rest) = path.split_first()?;
    if root.name != *first {
        return None;
    }
    rest.iter().try_fold(root, |element, segment| element.child(segment))
}

/// Builds a metadata record by applying every rule to the document
pub fn apply_rules(root: &XmlElement, rules: &[FieldRule]) -> PackageMetadata {
    let mut metadata = PackageMetadata::default();
    for rule in rules {
        rule.apply(root, &mut metadata);
    }
    metadata
}
