//! Local directory feed implementation

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::config::SearchConfig;
use crate::feed::aggregator::aggregate;
use crate::feed::archive::{is_package_file, load_package};
use crate::feed::error::{FeedError, ManifestError};
use crate::feed::lister::list_entries;
use crate::feed::matcher::FilenameMatcher;
use crate::feed::source::PackageFeed;
use crate::feed::types::{PackageMetadata, PackageSource, PackageVersion, SearchPackageResult};

/// Feed backed by a directory of `.nupkg` files
pub struct LocalFeed {
    source: PackageSource,
    options: SearchConfig,
}

impl LocalFeed {
    pub fn new(source: PackageSource, options: SearchConfig) -> Self {
        Self { source, options }
    }

    /// Extracts metadata from every archive, dropping the ones that fail.
    ///
    /// Archives are processed concurrently; the returned records keep the
    /// order of `paths`.
    async fn load_packages(&self, paths: Vec<PathBuf>) -> Vec<PackageMetadata> {
        let timeout_ms = self.options.archive_timeout_ms;

        let results: Vec<(PathBuf, Result<PackageMetadata, ManifestError>)> =
            stream::iter(paths)
                .map(|path| async move {
                    let result = load_with_timeout(&path, timeout_ms).await;
                    (path, result)
                })
                .buffered(self.options.max_concurrent_reads.max(1))
                .collect()
                .await;

        results
            .into_iter()
            .filter_map(|(path, result)| {
                result
                    .inspect_err(|e| warn!("Skipping package {}: {}", path.display(), e))
                    .ok()
            })
            .collect()
    }
}

async fn load_with_timeout(path: &Path, timeout_ms: u64) -> Result<PackageMetadata, ManifestError> {
    with_timeout(load_package(path), timeout_ms).await
}

async fn with_timeout<T>(
    future: impl Future<Output = Result<T, ManifestError>>,
    timeout_ms: u64,
) -> Result<T, ManifestError> {
    tokio::time::timeout(Duration::from_millis(timeout_ms), future)
        .await
        .map_err(|_| ManifestError::Timeout { millis: timeout_ms })?
}

/// Applies `skip` then `take` to the aggregated packages
fn paginate(
    packages: Vec<PackageMetadata>,
    take: Option<usize>,
    skip: Option<usize>,
) -> Vec<PackageMetadata> {
    packages
        .into_iter()
        .skip(skip.unwrap_or(0))
        .take(take.unwrap_or(usize::MAX))
        .collect()
}

#[async_trait::async_trait]
impl PackageFeed for LocalFeed {
    fn source(&self) -> PackageSource {
        self.source.clone()
    }

    async fn search(
        &self,
        query: &str,
        take: Option<usize>,
        skip: Option<usize>,
    ) -> Result<SearchPackageResult, FeedError> {
        let mut result = SearchPackageResult::empty(&self.source);

        let Some(directory) = self.source.directory() else {
            debug!(
                "Source {} has no directory configured, returning no packages",
                self.source.source_name
            );
            return Ok(result);
        };
        let directory = Path::new(directory);

        let entries = list_entries(directory).await?;
        let matcher = FilenameMatcher::new(query);
        let paths: Vec<PathBuf> = matcher
            .filter(&entries)
            .into_iter()
            .filter(|name| is_package_file(name))
            .map(|name| directory.join(name))
            .collect();

        debug!(
            "Query {:?} matched {} of {} entries in {}",
            query,
            paths.len(),
            entries.len(),
            directory.display()
        );

        let packages = aggregate(self.load_packages(paths).await);

        info!(
            "Found {} packages for {:?} in {}",
            packages.len(),
            query,
            self.source.source_name
        );

        result.total_hits = packages.len();
        result.data = paginate(packages, take, skip);
        Ok(result)
    }

    async fn fetch_package_versions(
        &self,
        package_id: &str,
    ) -> Result<PackageVersion, FeedError> {
        let search = self.search("", None, None).await?;

        let package = search
            .data
            .into_iter()
            .find(|package| package.id == package_id)
            .ok_or_else(|| FeedError::PackageNotFound {
                package_id: package_id.to_string(),
                source_name: self.source.source_name.clone(),
            })?;

        Ok(PackageVersion {
            package_name: package_id.to_string(),
            versions: package.versions.into_iter().map(|v| v.version).collect(),
            source_name: self.source.source_name.clone(),
            source_id: self.source.id.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;
    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    fn write_package(dir: &Path, file_name: &str, id: &str, version: &str) {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(format!("{id}.nuspec"), SimpleFileOptions::default())
            .unwrap();
        write!(
            writer,
            "<package><metadata><id>{id}</id><version>{version}</version></metadata></package>"
        )
        .unwrap();
        let bytes = writer.finish().unwrap().into_inner();
        std::fs::write(dir.join(file_name), bytes).unwrap();
    }

    fn feed_for(dir: &Path) -> LocalFeed {
        LocalFeed::new(
            PackageSource::new("local", "Local", dir.to_str()),
            SearchConfig::default(),
        )
    }

    fn package(id: &str) -> PackageMetadata {
        PackageMetadata {
            id: id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn paginate_applies_skip_before_take() {
        let packages = vec![package("a"), package("b"), package("c"), package("d")];

        let page = paginate(packages, Some(2), Some(1));

        let ids: Vec<&str> = page.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn paginate_without_hints_returns_everything() {
        let page = paginate(vec![package("a"), package("b")], None, None);

        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn with_timeout_reports_elapsed_deadline() {
        let result = with_timeout(std::future::pending::<Result<(), ManifestError>>(), 0).await;

        assert!(matches!(result, Err(ManifestError::Timeout { millis: 0 })));
    }

    #[tokio::test]
    async fn with_timeout_passes_through_completed_result() {
        let result = with_timeout(async { Ok::<_, ManifestError>(7) }, 1_000).await;

        assert!(matches!(result, Ok(7)));
    }

    // A FIFO without a writer blocks the archive read until the test opens it.
    #[cfg(unix)]
    #[tokio::test]
    async fn search_drops_archive_that_exceeds_timeout() {
        let temp_dir = TempDir::new().unwrap();
        write_package(temp_dir.path(), "PkgA.1.0.0.nupkg", "PkgA", "1.0.0");
        let stuck = temp_dir.path().join("Stuck.1.0.0.nupkg");
        let status = std::process::Command::new("mkfifo")
            .arg(&stuck)
            .status()
            .unwrap();
        assert!(status.success());

        let feed = LocalFeed::new(
            PackageSource::new("local", "Local", temp_dir.path().to_str()),
            SearchConfig {
                archive_timeout_ms: 200,
                ..Default::default()
            },
        );

        let result = feed.search("*.nupkg", None, None).await;

        // Release the blocked reader so the runtime can shut down
        drop(std::fs::OpenOptions::new().write(true).open(&stuck).unwrap());

        let result = result.unwrap();
        let ids: Vec<&str> = result.data.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["PkgA"]);
        assert_eq!(result.total_hits, 1);
    }

    #[tokio::test]
    async fn search_without_directory_returns_empty_result() {
        let feed = LocalFeed::new(
            PackageSource::new("remote", "Remote", None),
            SearchConfig::default(),
        );

        let result = feed.search("anything", None, None).await.unwrap();

        assert_eq!(
            result,
            SearchPackageResult {
                data: vec![],
                package_source_id: "remote".to_string(),
                package_source_name: "Remote".to_string(),
                total_hits: 0,
            }
        );
    }

    #[tokio::test]
    async fn search_with_empty_directory_string_does_not_touch_filesystem() {
        let feed = LocalFeed::new(
            PackageSource::new("local", "Local", Some("")),
            SearchConfig::default(),
        );

        let result = feed.search("", None, None).await.unwrap();

        assert!(result.data.is_empty());
    }

    #[tokio::test]
    async fn search_propagates_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let feed = feed_for(&temp_dir.path().join("gone"));

        let result = feed.search("PkgA", None, None).await;

        assert!(matches!(
            result,
            Err(FeedError::DirectoryUnavailable { .. })
        ));
    }

    #[tokio::test]
    async fn search_paginates_after_aggregation() {
        let temp_dir = TempDir::new().unwrap();
        write_package(temp_dir.path(), "PkgA.1.0.0.nupkg", "PkgA", "1.0.0");
        write_package(temp_dir.path(), "PkgA.2.0.0.nupkg", "PkgA", "2.0.0");
        write_package(temp_dir.path(), "PkgB.1.0.0.nupkg", "PkgB", "1.0.0");
        write_package(temp_dir.path(), "PkgC.1.0.0.nupkg", "PkgC", "1.0.0");

        let result = feed_for(temp_dir.path())
            .search("*.nupkg", Some(1), Some(1))
            .await
            .unwrap();

        assert_eq!(result.total_hits, 3);
        assert_eq!(result.data.len(), 1);
        assert_eq!(result.data[0].id, "PkgB");
    }

    #[tokio::test]
    async fn fetch_package_versions_projects_version_strings() {
        let temp_dir = TempDir::new().unwrap();
        write_package(temp_dir.path(), "PkgA.1.0.0.nupkg", "PkgA", "1.0.0");
        write_package(temp_dir.path(), "PkgA.2.0.0.nupkg", "PkgA", "2.0.0");
        write_package(temp_dir.path(), "PkgB.1.0.0.nupkg", "PkgB", "1.0.0");

        let versions = feed_for(temp_dir.path())
            .fetch_package_versions("PkgA")
            .await
            .unwrap();

        assert_eq!(
            versions,
            PackageVersion {
                package_name: "PkgA".to_string(),
                versions: vec!["1.0.0".to_string(), "2.0.0".to_string()],
                source_name: "Local".to_string(),
                source_id: "local".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn fetch_package_versions_fails_for_unknown_package() {
        let temp_dir = TempDir::new().unwrap();
        write_package(temp_dir.path(), "PkgA.1.0.0.nupkg", "PkgA", "1.0.0");

        let result = feed_for(temp_dir.path())
            .fetch_package_versions("Missing")
            .await;

        assert!(matches!(
            result,
            Err(FeedError::PackageNotFound { package_id, .. }) if package_id == "Missing"
        ));
    }
}
