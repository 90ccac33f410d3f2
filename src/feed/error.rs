use thiserror::Error;

/// Errors that abort a whole query against a package source
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Directory unavailable: {path}: {source}")]
    DirectoryUnavailable {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Package not found: {package_id} in {source_name}")]
    PackageNotFound {
        package_id: String,
        source_name: String,
    },
}

/// Errors local to a single archive; the archive is skipped, the batch continues
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("No .nuspec entry in archive")]
    Missing,

    #[error("Invalid manifest XML: {0}")]
    Parse(String),

    #[error("Manifest entry too large: {size} bytes")]
    TooLarge { size: u64 },

    #[error("Timed out after {millis} ms")]
    Timeout { millis: u64 },

    #[error("Extraction task failed: {0}")]
    Join(String),
}
