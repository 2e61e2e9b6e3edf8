// # HTTP IP Source
//
// This crate provides an HTTP-based public IP source for cfdyn.
//
// ## Service
//
// Queries an ip-api.com style endpoint (default `http://ip-api.com/json`)
// that answers with a JSON object whose `query` field is the caller's
// IPv4 address:
//
// ```json
// { "status": "success", "query": "203.0.113.7", "country": "..." }
// ```
//
// No authentication, no query parameters, no caching: every call to
// `current()` is a fresh lookup.

use cfdyn_core::config::SyncConfig;
use cfdyn_core::http::HttpClient;
use cfdyn_core::model::PublicIp;
use cfdyn_core::traits::IpSource;
use cfdyn_core::{Error, Result};
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Deserialize;

const SOURCE_NAME: &str = "ip-api";

/// The fields of the lookup response we care about
#[derive(Debug, Deserialize)]
struct LookupResponse {
    /// "success" or "fail"; absent on some mirrors
    #[serde(default)]
    status: Option<String>,
    /// Failure reason when `status` is "fail"
    #[serde(default)]
    message: Option<String>,
    /// The caller's address
    #[serde(default)]
    query: String,
}

/// HTTP-based public IP source
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    http: HttpClient,
}

impl HttpIpSource {
    /// Create a new HTTP IP source
    ///
    /// # Parameters
    ///
    /// - `url`: Lookup URL (e.g., "http://ip-api.com/json")
    /// - `http`: Shared HTTP client
    pub fn new(url: impl Into<String>, http: HttpClient) -> Self {
        Self {
            url: url.into(),
            http,
        }
    }

    /// Create from the run configuration
    pub fn from_config(config: &SyncConfig, http: HttpClient) -> Self {
        Self::new(config.endpoints.ip_lookup_url.clone(), http)
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<PublicIp> {
        tracing::debug!("Fetching public IP from {}", self.url);

        let response: LookupResponse = self
            .http
            .request_json(Method::GET, &self.url, None, &HeaderMap::new())
            .await?;

        if response.status.as_deref() == Some("fail") {
            return Err(Error::provider(
                SOURCE_NAME,
                format!(
                    "Lookup failed: {}",
                    response.message.as_deref().unwrap_or("no reason given")
                ),
            ));
        }

        PublicIp::parse(response.query)
    }

    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }
}
