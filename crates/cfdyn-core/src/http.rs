//! Shared HTTP request helper
//!
//! Every outbound call goes through [`HttpClient`]. A request moves through
//! four fallible steps and each one has its own [`Error`] variant:
//!
//! 1. build the request ([`Error::Request`])
//! 2. send it ([`Error::Transport`])
//! 3. read the body ([`Error::BodyRead`])
//! 4. check the status and decode JSON ([`Error::Status`], [`Error::Decode`])
//!
//! A decode failure is an error like any other. Callers never see a
//! half-populated value.
//!
//! There are no retries. A run that fails is simply run again later.

use crate::error::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Build a header map from name/value pairs
///
/// Values are appended, so repeating a name produces a multi-valued header.
pub fn header_map(pairs: &[(&str, &str)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::with_capacity(pairs.len());

    for (name, value) in pairs {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| Error::invalid_input(format!("Invalid header name '{name}': {e}")))?;
        // The value may be a secret, keep it out of the message
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| Error::invalid_input(format!("Invalid value for header '{name}'")))?;
        headers.append(header_name, header_value);
    }

    Ok(headers)
}

/// Thin wrapper around `reqwest::Client`
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client with a per-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("cfdyn/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self { client })
    }

    /// Issue a request and decode the JSON response body into `T`
    ///
    /// # Parameters
    ///
    /// - `method`: HTTP verb
    /// - `url`: Absolute URL
    /// - `body`: Pre-serialized JSON, if any
    /// - `headers`: Request headers
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HeaderMap,
    ) -> Result<T> {
        let response = self.execute(method, url, body, headers).await?;
        let status = response.status();

        let bytes = response.bytes().await.map_err(|e| Error::BodyRead {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        serde_json::from_slice(&bytes).map_err(|source| Error::Decode {
            url: url.to_string(),
            target: std::any::type_name::<T>(),
            source,
        })
    }

    /// Issue a request without inspecting the response body
    ///
    /// Any completed exchange is returned as its status code, whatever the
    /// code is.
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HeaderMap,
    ) -> Result<StatusCode> {
        let response = self.execute(method, url, body, headers).await?;
        Ok(response.status())
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        headers: &HeaderMap,
    ) -> Result<reqwest::Response> {
        let mut builder = self
            .client
            .request(method.clone(), url)
            .headers(headers.clone());
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let request = builder.build().map_err(|e| Error::Request {
            method: method.to_string(),
            url: url.to_string(),
            message: e.to_string(),
        })?;

        debug!(method = %method, url = %url, "HTTP request");

        self.client
            .execute(request)
            .await
            .map_err(|e| Error::Transport {
                method: method.to_string(),
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}
