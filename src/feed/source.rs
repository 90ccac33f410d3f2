//! Package feed trait called by the presentation layer

#[cfg(test)]
use mockall::automock;

use crate::feed::error::FeedError;
use crate::feed::types::{PackageSource, PackageVersion, SearchPackageResult};

/// Trait for searching a package source and listing package versions
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PackageFeed: Send + Sync {
    /// Returns the source this feed serves
    fn source(&self) -> PackageSource;

    /// Searches the feed for packages matching `query`
    ///
    /// # Arguments
    /// * `query` - Glob pattern or free text matched against archive file names
    /// * `take` - Maximum number of packages to return, after deduplication
    /// * `skip` - Number of deduplicated packages to skip
    async fn search(
        &self,
        query: &str,
        take: Option<usize>,
        skip: Option<usize>,
    ) -> Result<SearchPackageResult, FeedError>;

    /// Lists the versions of one package, in aggregation order
    ///
    /// # Returns
    /// * `Err(FeedError::PackageNotFound)` - If no archive in the feed declares `package_id`
    async fn fetch_package_versions(
        &self,
        package_id: &str,
    ) -> Result<PackageVersion, FeedError>;
}
