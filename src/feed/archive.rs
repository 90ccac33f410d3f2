//! `.nupkg` archive reading

use std::io::{Cursor, Read};
use std::path::Path;

use tracing::debug;
use zip::ZipArchive;

use crate::feed::error::ManifestError;
use crate::feed::manifest::parse_manifest;
use crate::feed::types::PackageMetadata;

/// Extension of package archives, compared case-sensitively
pub const PACKAGE_EXTENSION: &str = "nupkg";

/// Suffix of the manifest entry inside a package archive
pub const MANIFEST_SUFFIX: &str = ".nuspec";

/// Maximum size for a manifest entry (16 MB).
pub const MAX_MANIFEST_SIZE: u64 = 16 * 1024 * 1024;

/// Whether `file_name` has exactly the `.nupkg` extension
pub fn is_package_file(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .is_some_and(|extension| extension == PACKAGE_EXTENSION)
}

/// Returns the text of the first `.nuspec` entry of a zip archive
pub fn read_manifest(bytes: &[u8]) -> Result<String, ManifestError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.is_dir() || !entry.name().ends_with(MANIFEST_SUFFIX) {
            continue;
        }

        debug!("Reading manifest entry {}", entry.name());

        if entry.size() > MAX_MANIFEST_SIZE {
            return Err(ManifestError::TooLarge { size: entry.size() });
        }

        let mut content = Vec::new();
        let mut limited = entry.take(MAX_MANIFEST_SIZE + 1);
        limited.read_to_end(&mut content)?;
        if content.len() as u64 > MAX_MANIFEST_SIZE {
            return Err(ManifestError::TooLarge {
                size: content.len() as u64,
            });
        }

        return Ok(String::from_utf8_lossy(&content).into_owned());
    }

    Err(ManifestError::Missing)
}

/// Reads a package archive from disk and extracts its manifest metadata
pub async fn load_package(path: &Path) -> Result<PackageMetadata, ManifestError> {
    let bytes = tokio::fs::read(path).await?;

    tokio::task::spawn_blocking(move || {
        let manifest = read_manifest(&bytes)?;
        parse_manifest(&manifest)
    })
    .await
    .map_err(|e| ManifestError::Join(e.to_string()))?
}
