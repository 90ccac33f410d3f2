//! Merges metadata records that share a package id

use indexmap::{IndexMap, IndexSet};

use crate::feed::types::{PackageMetadata, SearchPackageResultVersion};

/// Replaces the record's versions with its own manifest version
fn seed_versions(mut record: PackageMetadata) -> PackageMetadata {
    record.versions = vec![SearchPackageResultVersion::new(&record.version, 0)];
    record
}

/// Deduplicates records by `id`, unioning their version lists.
///
/// The first record seen for an id keeps its scalar fields; later records
/// only contribute versions. Output order is the first-occurrence order of
/// each id. Ids are compared exactly, without case folding.
pub fn aggregate(records: Vec<PackageMetadata>) -> Vec<PackageMetadata> {
    let mut packages: IndexMap<String, (PackageMetadata, IndexSet<SearchPackageResultVersion>)> =
        IndexMap::new();

    for record in records.into_iter().map(seed_versions) {
        match packages.get_mut(&record.id) {
            Some((_, versions)) => versions.extend(record.versions),
            None => {
                let versions = record.versions.iter().cloned().collect();
                packages.insert(record.id.clone(), (record, versions));
            }
        }
    }

    packages
        .into_values()
        .map(|(mut package, versions)| {
            package.versions = versions.into_iter().collect();
            package
        })
        .collect()
}
