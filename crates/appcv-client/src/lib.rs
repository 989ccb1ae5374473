//! HTTP client for the platform version registry.
//!
//! The registry exposes three endpoints used by `appcv`:
//!
//! - `/api/appc/latest`: the most recent stable version
//! - `/api/appc/list`: every published version, optionally with `?prerelease=true`
//! - `/api/appc/download/<version>`: the gzipped tarball of a version

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::ACCEPT;
use tracing::{debug, warn};
use url::Url;

pub mod error;
pub mod response;

pub use error::{DomainError, ErrorCode, FetchError, TransportCode};
pub use response::{RegistryResponse, VersionRecord};

pub const DEFAULT_REGISTRY_URL: &str = "https://registry.platform.axway.com";

const USER_AGENT: &str = concat!("appcv/", env!("CARGO_PKG_VERSION"));

/// The registry operations the `use` flow and the installer depend on.
#[async_trait]
pub trait Registry: Send + Sync {
    /// Fetch the latest-version payload.
    async fn latest(&self) -> Result<Option<RegistryResponse>, FetchError>;

    /// Fetch the full version list.
    async fn list(&self, prerelease: bool) -> Result<Option<RegistryResponse>, FetchError>;

    /// Download the tarball of a version.
    async fn download(&self, version: &str) -> Result<Bytes, FetchError>;
}

#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: Url,
}

impl RegistryClient {
    pub fn new(base_url: Url) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { http, base_url })
    }

    /// Builds an absolute registry URL from a path, which may carry a query string.
    pub fn make_url(&self, path: &str) -> Result<Url, FetchError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Url::parse(&format!("{base}{path}")).map_err(|err| {
            FetchError::transport(None, format!("Invalid registry URL {base}{path}: {err}"))
        })
    }

    /// Fetches and parses a JSON document.
    ///
    /// An empty body or a JSON `null` yields `Ok(None)`.
    pub async fn request_json(&self, url: Url) -> Result<Option<RegistryResponse>, FetchError> {
        debug!("Requesting {url}");
        let response = self
            .http
            .get(url.clone())
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Registry answered {status} for {url}");
            return Err(DomainError::new(ErrorCode::ServerResponse, format!("{status} from {url}")).into());
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            debug!("Empty body from {url}");
            return Ok(None);
        }

        serde_json::from_str(&body).map_err(|err| {
            FetchError::transport(None, format!("Invalid JSON returned from {url}: {err}"))
        })
    }
}

#[async_trait]
impl Registry for RegistryClient {
    async fn latest(&self) -> Result<Option<RegistryResponse>, FetchError> {
        let url = self.make_url("/api/appc/latest")?;
        self.request_json(url).await
    }

    async fn list(&self, prerelease: bool) -> Result<Option<RegistryResponse>, FetchError> {
        let mut path = String::from("/api/appc/list");
        if prerelease {
            path.push_str("?prerelease=true");
        }
        let url = self.make_url(&path)?;
        self.request_json(url).await
    }

    async fn download(&self, version: &str) -> Result<Bytes, FetchError> {
        let url = self.make_url(&format!("/api/appc/download/{version}"))?;
        debug!("Downloading {url}");
        let response = self.http.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::new(ErrorCode::ServerResponse, format!("{status} from {url}")).into());
        }

        Ok(response.bytes().await?)
    }
}
