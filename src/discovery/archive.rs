use async_trait::async_trait;
use reqwest::Url;
use std::time::Duration;

use crate::config::Config;
use crate::core::constants::{archive, messages, timeouts};
use crate::core::error::{Result, WayprobeError, request_failure_cause};

/// A source of historically archived URLs for a domain.
#[async_trait]
pub trait UrlSource: Send + Sync {
    /// The exact query that `fetch_urls` will issue, for diagnostics.
    fn query_url(&self, domain: &str, limit: u64) -> String;

    /// Retrieve the raw, unfiltered list of archived URLs.
    ///
    /// An empty listing is an error: there is nothing to check.
    async fn fetch_urls(&self, domain: &str, limit: u64) -> Result<Vec<String>>;
}

/// Wayback Machine CDX index client.
#[derive(Debug, Clone)]
pub struct WaybackCdx {
    client: reqwest::Client,
    endpoint: Url,
}

impl WaybackCdx {
    pub fn new(endpoint: &str) -> Result<Self> {
        Self::with_proxy(endpoint, None)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_proxy(config.archive_url(), config.proxy.as_deref())
    }

    fn with_proxy(endpoint: &str, proxy: Option<&str>) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            WayprobeError::Config(format!("Invalid archive URL '{endpoint}': {e}"))
        })?;

        let mut client_builder = reqwest::Client::builder()
            .connect_timeout(Duration::from_millis(timeouts::ARCHIVE_CONNECT_MS))
            .read_timeout(Duration::from_millis(timeouts::ARCHIVE_READ_MS));

        if let Some(proxy_url) = proxy {
            client_builder = client_builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: client_builder.build()?,
            endpoint,
        })
    }

    fn build_query(&self, domain: &str, limit: u64) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("url", domain)
            .append_pair("matchType", archive::MATCH_TYPE)
            .append_pair("limit", &limit.to_string())
            .append_pair("fl", archive::FIELDS)
            .append_pair("collapse", archive::COLLAPSE);
        url
    }
}

#[async_trait]
impl UrlSource for WaybackCdx {
    fn query_url(&self, domain: &str, limit: u64) -> String {
        self.build_query(domain, limit).to_string()
    }

    async fn fetch_urls(&self, domain: &str, limit: u64) -> Result<Vec<String>> {
        let query = self.build_query(domain, limit);

        let response = self
            .client
            .get(query)
            .send()
            .await
            .map_err(|e| WayprobeError::ListRetrieval(request_failure_cause(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WayprobeError::ListRetrieval(format!(
                "Archive index returned HTTP {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| WayprobeError::ListRetrieval(request_failure_cause(&e)))?;

        let urls = parse_listing(&body);
        if urls.is_empty() {
            return Err(WayprobeError::ListRetrieval(
                messages::EMPTY_ARCHIVE_RESPONSE.to_string(),
            ));
        }

        Ok(urls)
    }
}

/// Split a newline-delimited listing, dropping blank lines.
pub fn parse_listing(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}
