//! Cached lookup of the companion application's latest release version.
//!
//! Refresh-ahead cache: a cached version younger than `REFRESH_AFTER` is served as is,
//! one younger than `EXPIRE_AFTER` is served while a background refresh runs, and an
//! older or missing one is fetched inline.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, LazyLock};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;
use tokio::{sync::Mutex, time::Instant};

use crate::error::{catalog::CatalogError, AppError};

pub const REFRESH_AFTER: Duration = Duration::from_secs(15 * 60);
pub const EXPIRE_AFTER: Duration = Duration::from_secs(30 * 60);

static VERSION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^v\d+\.\d+\.\d+$").expect("invalid version tag pattern"));

#[derive(Deserialize)]
struct Release {
    tag_name: String,
}

/// Extracts the version of the first release of a releases listing.
///
/// The tag must look like `vMAJOR.MINOR.PATCH`; the returned version has no `v`.
pub fn parse_latest_version(json: &str) -> Result<String, CatalogError> {
    let releases: Vec<Release> = serde_json::from_str(json)?;
    let latest = releases.first().ok_or(CatalogError::EmptyReleases)?;

    if !VERSION_TAG.is_match(&latest.tag_name) {
        return Err(CatalogError::BadTag(latest.tag_name.clone()));
    }

    Ok(latest.tag_name[1..].to_string())
}

#[derive(Clone)]
struct CachedVersion {
    version: String,
    fetched_at: Instant,
}

#[derive(Clone)]
pub struct ReleaseCache {
    http_client: reqwest::Client,
    url: String,
    cached: Arc<Mutex<Option<CachedVersion>>>,
    refreshing: Arc<AtomicBool>,
}

impl ReleaseCache {
    pub fn new(http_client: reqwest::Client, url: String) -> Self {
        Self {
            http_client,
            url,
            cached: Arc::new(Mutex::new(None)),
            refreshing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Latest release version, or `None` if it is unknown and cannot be fetched.
    pub async fn latest_version(&self) -> Option<String> {
        let cached = self.cached.lock().await.clone();

        match cached {
            Some(cached) if cached.fetched_at.elapsed() < REFRESH_AFTER => Some(cached.version),
            Some(cached) if cached.fetched_at.elapsed() < EXPIRE_AFTER => {
                self.spawn_refresh();
                Some(cached.version)
            }
            _ => match self.refresh().await {
                Ok(version) => Some(version),
                Err(e) => {
                    tracing::error!("Release lookup failed: {}", e);
                    None
                }
            },
        }
    }

    fn spawn_refresh(&self) {
        if self.refreshing.swap(true, Ordering::AcqRel) {
            return;
        }

        let cache = self.clone();
        tokio::spawn(async move {
            if let Err(e) = cache.refresh().await {
                tracing::warn!("Background release lookup failed: {}", e);
            }
            cache.refreshing.store(false, Ordering::Release);
        });
    }

    /// Fetches the latest version and stores it. A failure keeps the previous value.
    pub async fn refresh(&self) -> Result<String, AppError> {
        let response = self.http_client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
            }
            .into());
        }

        let version = parse_latest_version(&response.text().await?)?;

        *self.cached.lock().await = Some(CachedVersion {
            version: version.clone(),
            fetched_at: Instant::now(),
        });

        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_v_prefix() {
        let version = parse_latest_version(r#"[{"tag_name": "v2.3.1"}, {"tag_name": "v2.3.0"}]"#);
        assert_eq!(version.unwrap(), "2.3.1");
    }

    #[test]
    fn rejects_bad_tags() {
        for tag in ["2.3.1", "v2.3", "v2.3.1-beta", "latest"] {
            let json = format!(r#"[{{"tag_name": "{}"}}]"#, tag);
            assert!(matches!(
                parse_latest_version(&json),
                Err(CatalogError::BadTag(_))
            ));
        }
    }

    #[test]
    fn rejects_empty_listing() {
        assert!(matches!(
            parse_latest_version("[]"),
            Err(CatalogError::EmptyReleases)
        ));
    }

    mod cache {
        use super::*;
        use wiremock::{matchers::method, Mock, MockServer, ResponseTemplate};

        const SECOND: Duration = Duration::from_secs(1);

        /// Answers the first request with `v1.0.0` and every later one with `later`.
        async fn releases_server(later: ResponseTemplate) -> MockServer {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_string(r#"[{"tag_name": "v1.0.0"}]"#),
                )
                .up_to_n_times(1)
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .respond_with(later)
                .mount(&server)
                .await;
            server
        }

        fn tag(tag: &str) -> ResponseTemplate {
            ResponseTemplate::new(200).set_body_string(format!(r#"[{{"tag_name": "{}"}}]"#, tag))
        }

        async fn requests(server: &MockServer) -> usize {
            server.received_requests().await.unwrap_or_default().len()
        }

        async fn wait_for_refresh(cache: &ReleaseCache) {
            while cache.refreshing.load(Ordering::Acquire) {
                tokio::task::yield_now().await;
            }
        }

        fn release_cache(server: &MockServer) -> ReleaseCache {
            ReleaseCache::new(reqwest::Client::new(), format!("{}/releases", server.uri()))
        }

        /// Expected: a version younger than the refresh window is served without a request
        #[tokio::test(start_paused = true)]
        async fn serves_fresh_version_from_cache() {
            let server = releases_server(tag("v2.0.0")).await;
            let cache = release_cache(&server);

            assert_eq!(cache.latest_version().await.as_deref(), Some("1.0.0"));
            tokio::time::advance(REFRESH_AFTER - SECOND).await;
            assert_eq!(cache.latest_version().await.as_deref(), Some("1.0.0"));

            assert_eq!(requests(&server).await, 1);
        }

        /// Expected: the old version is served once more while the refresh runs, then the new one
        #[tokio::test(start_paused = true)]
        async fn serves_stale_version_while_refreshing() {
            let server = releases_server(tag("v2.0.0")).await;
            let cache = release_cache(&server);

            assert_eq!(cache.latest_version().await.as_deref(), Some("1.0.0"));
            tokio::time::advance(REFRESH_AFTER + SECOND).await;

            assert_eq!(cache.latest_version().await.as_deref(), Some("1.0.0"));
            wait_for_refresh(&cache).await;

            assert_eq!(cache.latest_version().await.as_deref(), Some("2.0.0"));
            assert_eq!(requests(&server).await, 2);
        }

        /// Expected: an expired version is replaced by an inline fetch
        #[tokio::test(start_paused = true)]
        async fn fetches_inline_after_expiry() {
            let server = releases_server(tag("v2.0.0")).await;
            let cache = release_cache(&server);

            assert_eq!(cache.latest_version().await.as_deref(), Some("1.0.0"));
            tokio::time::advance(EXPIRE_AFTER + SECOND).await;

            assert_eq!(cache.latest_version().await.as_deref(), Some("2.0.0"));
            assert_eq!(requests(&server).await, 2);
        }

        /// Expected: the previous version survives a failed background refresh
        #[tokio::test(start_paused = true)]
        async fn failed_refresh_keeps_previous_version() {
            let server = releases_server(ResponseTemplate::new(500)).await;
            let cache = release_cache(&server);

            assert_eq!(cache.latest_version().await.as_deref(), Some("1.0.0"));
            tokio::time::advance(REFRESH_AFTER + SECOND).await;

            assert_eq!(cache.latest_version().await.as_deref(), Some("1.0.0"));
            wait_for_refresh(&cache).await;

            assert_eq!(cache.latest_version().await.as_deref(), Some("1.0.0"));
            wait_for_refresh(&cache).await;
            assert_eq!(requests(&server).await, 3);
        }
    }
}
