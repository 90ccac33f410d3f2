//! Directory listing for local feeds

use std::path::Path;

use tracing::debug;

use crate::feed::error::FeedError;

/// Lists the names of the entries directly inside `dir`, sorted by name.
///
/// Both files and sub-directories are returned. Names that are not valid
/// UTF-8 cannot be matched against a query and are skipped.
pub async fn list_entries(dir: &Path) -> Result<Vec<String>, FeedError> {
    let unavailable = |source: std::io::Error| FeedError::DirectoryUnavailable {
        path: dir.display().to_string(),
        source,
    };

    let mut read_dir = tokio::fs::read_dir(dir).await.map_err(unavailable)?;
    let mut names = Vec::new();

    while let Some(entry) = read_dir.next_entry().await.map_err(unavailable)? {
        match entry.file_name().into_string() {
            Ok(name) => names.push(name),
            Err(raw) => debug!("Skipping non UTF-8 entry {:?} in {}", raw, dir.display()),
        }
    }

    names.sort();
    Ok(names)
}
