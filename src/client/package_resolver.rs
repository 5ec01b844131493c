//! Client-side "current package" resolution.
//!
//! A page view can name its package three ways: an explicit `package_id`
//! query parameter, an `author/name` route path, or nothing at all. The
//! resolver reconciles them into one current id: an explicit (or previously
//! retained) id always wins, otherwise the route pair is resolved through a
//! cached package-by-name lookup against the registry. Lookups are
//! asynchronous and uncancelled; whichever call completes last determines the
//! retained state.

use backon::{ExponentialBuilder, Retryable};
use moka::future::Cache;
use reqwest::StatusCode;
use std::time::Duration;
use thiserror::Error as ThisError;
use tracing::debug;
use url::Url;

use packbay_schema::{GetPackageResponse, PackageSelector, PackageSummary};

/// Query-string inputs of the current page.
#[derive(Debug, Clone, Default)]
pub struct UrlParams {
    pub package_id: Option<String>,
}

/// Route-path inputs of the current page. Both segments must be present for
/// the pair to name a package.
#[derive(Debug, Clone, Default)]
pub struct RouteParams {
    pub author: Option<String>,
    pub package_name: Option<String>,
}

impl RouteParams {
    /// Full registry package name, `author/name`.
    fn full_name(&self) -> Option<String> {
        match (&self.author, &self.package_name) {
            (Some(author), Some(name)) => Some(format!("{author}/{name}")),
            _ => None,
        }
    }
}

/// Failure of the package-by-name lookup. Cloneable so the lookup cache can
/// hand the same failure to concurrent waiters.
#[derive(Debug, Clone, ThisError)]
pub enum ResolveError {
    #[error("package lookup failed with status {0}")]
    Status(StatusCode),

    #[error("package lookup request failed: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for ResolveError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ResolveError::Status(status),
            None => ResolveError::Transport(err.to_string()),
        }
    }
}

pub struct CurrentPackageResolver {
    http: reqwest::Client,
    base_url: Url,
    by_name: Cache<String, PackageSummary>,
    retained_package_id: Option<String>,
    retry_policy: ExponentialBuilder,
}

impl CurrentPackageResolver {
    pub fn new(http: reqwest::Client, base_url: Url) -> Self {
        let retry_policy = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(300))
            .with_max_times(2)
            .with_jitter();
        Self {
            http,
            base_url,
            by_name: Cache::builder()
                .max_capacity(256)
                .time_to_live(Duration::from_secs(60))
                .build(),
            retained_package_id: None,
            retry_policy,
        }
    }

    /// Reconciles the current package id from the page inputs.
    ///
    /// An explicit `package_id` query value replaces the retained state and
    /// short-circuits; otherwise a retained value from an earlier call wins;
    /// otherwise the `author/name` route pair is looked up by name. `Ok(None)`
    /// means no input named a package at all.
    pub async fn current_package_id(
        &mut self,
        url: &UrlParams,
        route: &RouteParams,
    ) -> Result<Option<String>, ResolveError> {
        if let Some(id) = &url.package_id {
            self.retained_package_id = Some(id.clone());
        }
        if let Some(id) = &self.retained_package_id {
            return Ok(Some(id.clone()));
        }

        let Some(name) = route.full_name() else {
            return Ok(None);
        };

        let package = self.lookup_by_name(&name).await?;
        debug!(name = %name, package_id = %package.package_id, "resolved current package by name");
        Ok(Some(package.package_id))
    }

    /// Cached package-by-name lookup. Successes are cached; failures are not,
    /// so a later call retries the registry.
    async fn lookup_by_name(&self, name: &str) -> Result<PackageSummary, ResolveError> {
        self.by_name
            .try_get_with(name.to_string(), async {
                let fetch = || async { self.fetch_by_name(name).await };
                fetch
                    .retry(self.retry_policy)
                    // Only transport-level failures are worth retrying; an
                    // HTTP status is the registry's final answer.
                    .when(|err| matches!(err, ResolveError::Transport(_)))
                    .await
            })
            .await
            .map_err(|shared| (*shared).clone())
    }

    async fn fetch_by_name(&self, name: &str) -> Result<PackageSummary, ResolveError> {
        let endpoint = self
            .base_url
            .join("api/packages/get")
            .map_err(|e| ResolveError::Transport(format!("invalid lookup endpoint: {e}")))?;

        let resp = self
            .http
            .post(endpoint)
            .json(&PackageSelector::ByName {
                name: name.to_string(),
            })
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResolveError::Status(status));
        }

        let body: GetPackageResponse = resp.json().await?;
        Ok(body.package)
    }
}
