//! Fan-out over all configured package sources

use std::sync::Arc;

use futures::future::join_all;
use tracing::error;

use crate::config::FeedConfig;
use crate::feed::local::LocalFeed;
use crate::feed::source::PackageFeed;
use crate::feed::types::SearchPackageResult;

/// Create a feed for every configured source
pub fn create_feeds(config: &FeedConfig) -> Vec<Arc<dyn PackageFeed>> {
    config
        .sources
        .iter()
        .map(|source| {
            Arc::new(LocalFeed::new(source.clone(), config.search.clone())) as Arc<dyn PackageFeed>
        })
        .collect()
}

/// Searches every feed concurrently.
///
/// A feed that fails is logged and left out; results of the other feeds are
/// returned in feed order.
pub async fn search_all(
    feeds: &[Arc<dyn PackageFeed>],
    query: &str,
    take: Option<usize>,
    skip: Option<usize>,
) -> Vec<SearchPackageResult> {
    let searches = feeds.iter().map(|feed| async move {
        feed.search(query, take, skip).await.inspect_err(|e| {
            error!(
                "Search in source {} failed: {}",
                feed.source().source_name,
                e
            )
        })
    });

    join_all(searches)
        .await
        .into_iter()
        .filter_map(Result::ok)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::error::FeedError;
    use crate::feed::source::MockPackageFeed;
    use crate::feed::types::PackageSource;

    fn mock_feed(id: &str, outcome: Result<(), ()>) -> Arc<dyn PackageFeed> {
        let source = PackageSource::new(id, id, Some("/feeds"));
        let mut feed = MockPackageFeed::new();
        feed.expect_source().return_const(source.clone());
        feed.expect_search().returning(move |_, _, _| match outcome {
            Ok(()) => Ok(SearchPackageResult::empty(&source)),
            Err(()) => Err(FeedError::DirectoryUnavailable {
                path: "/feeds".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            }),
        });
        Arc::new(feed)
    }

    #[tokio::test]
    async fn search_all_skips_failing_sources() {
        let feeds = vec![
            mock_feed("first", Ok(())),
            mock_feed("broken", Err(())),
            mock_feed("second", Ok(())),
        ];

        let results = search_all(&feeds, "PkgA", None, None).await;

        let ids: Vec<&str> = results
            .iter()
            .map(|r| r.package_source_id.as_str())
            .collect();
        assert_eq!(ids, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn search_all_passes_query_and_pagination() {
        let source = PackageSource::new("local", "Local", None);
        let mut feed = MockPackageFeed::new();
        feed.expect_search()
            .withf(|query, take, skip| query == "Pkg*" && *take == Some(5) && *skip == Some(10))
            .times(1)
            .returning(move |_, _, _| Ok(SearchPackageResult::empty(&source)));
        let feed: Arc<dyn PackageFeed> = Arc::new(feed);
        let feeds = vec![feed];

        let results = search_all(&feeds, "Pkg*", Some(5), Some(10)).await;

        assert_eq!(results.len(), 1);
    }

    #[test]
    fn create_feeds_builds_one_feed_per_source() {
        let config = FeedConfig {
            sources: vec![
                PackageSource::new("a", "A", Some("/a")),
                PackageSource::new("b", "B", None),
            ],
            ..Default::default()
        };

        let feeds = create_feeds(&config);

        let ids: Vec<String> = feeds.iter().map(|f| f.source().id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
