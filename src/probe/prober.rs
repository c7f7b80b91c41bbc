use async_trait::async_trait;
use reqwest::header::{CONTENT_LENGTH, HeaderMap};
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::config::Config;
use crate::core::constants::http;
use crate::core::error::{Result, request_failure_cause};
use crate::core::types::ProbeOutcome;

/// What a single probe decided about its target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// The outcome belongs in the report
    Recorded(ProbeOutcome),
    /// The server answered with a status treated as noise (400, 404)
    Discarded { status: u16 },
}

impl ProbeVerdict {
    pub fn into_outcome(self) -> Option<ProbeOutcome> {
        match self {
            Self::Recorded(outcome) => Some(outcome),
            Self::Discarded { .. } => None,
        }
    }
}

#[async_trait]
pub trait ProbeUrl: Send + Sync {
    /// Probe one schemed URL. Never fails: transport errors become outcomes.
    async fn probe(&self, url: &str) -> ProbeVerdict;
}

/// Issues one non-following GET per URL and reads only the status line and
/// headers.
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    pub fn new(config: &Config) -> Result<Self> {
        let mut client_builder = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout_duration())
            .read_timeout(config.read_timeout_duration())
            .redirect(Policy::none())
            .user_agent(config.user_agent());

        // One idle connection per worker is plenty
        client_builder = client_builder
            .pool_max_idle_per_host(config.threads())
            .pool_idle_timeout(Duration::from_secs(30));

        if config.skip_ssl_verification.unwrap_or(false) {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        if let Some(ref proxy_url) = config.proxy {
            client_builder = client_builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        Ok(Self {
            client: client_builder.build()?,
        })
    }
}

#[async_trait]
impl ProbeUrl for HttpProber {
    async fn probe(&self, url: &str) -> ProbeVerdict {
        match self.client.get(url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                if http::DISCARDED_STATUS_CODES.contains(&status) {
                    return ProbeVerdict::Discarded { status };
                }

                let length = declared_content_length(response.headers());
                ProbeVerdict::Recorded(ProbeOutcome::response(url.to_string(), status, length))
            }
            Err(err) => ProbeVerdict::Recorded(ProbeOutcome::transport_error(
                url.to_string(),
                &request_failure_cause(&err),
            )),
        }
    }
}

/// The `Content-Length` the server declared, if any and well-formed.
pub fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}
