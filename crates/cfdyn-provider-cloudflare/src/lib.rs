// # Cloudflare DNS Provider
//
// This crate provides a Cloudflare DNS provider implementation for cfdyn.
//
// ## Behavior
//
// - One HTTP request per trait method, no retries
// - Authenticates with the account email and global API key
//   (`X-Auth-Email` / `X-Auth-Key`)
// - Maps HTTP error statuses (401/403, 404, 429, 5xx) to readable errors
// - Surfaces Cloudflare's own `success: false` + `errors[]` responses
//
// ## Security
//
// - The API key NEVER appears in logs or Debug output
// - The key is only ever placed in request headers
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List Zones: GET `/zones/`
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=...&name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use cfdyn_core::config::{CloudflareCredentials, SyncConfig};
use cfdyn_core::http::{HttpClient, header_map};
use cfdyn_core::model::{DnsRecord, RecordType, RecordUpdate, UpdateResponse, Zone};
use cfdyn_core::traits::DnsProvider;
use cfdyn_core::{Error, Result};
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde::de::DeserializeOwned;

const PROVIDER_NAME: &str = "cloudflare";

/// One entry of Cloudflare's `errors` / `messages` arrays
#[derive(Debug, Deserialize)]
struct ApiMessage {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

impl std::fmt::Display for ApiMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

/// Envelope of the list endpoints
#[derive(Debug, Deserialize)]
struct ListResponse<T> {
    /// Absent in some proxies and test fixtures; only an explicit `false` counts
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    /// `null` on failure
    #[serde(default = "Option::default")]
    result: Option<Vec<T>>,
}

/// Envelope of the update endpoint; the echoed record is not needed
#[derive(Debug, Deserialize)]
struct WriteResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
}

#[derive(Debug, Deserialize)]
struct ZoneItem {
    id: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct RecordItem {
    id: String,
    name: String,
    content: String,
}

/// Cloudflare DNS provider
///
/// Stateless apart from the prepared auth headers. Each method makes one
/// request and returns what the API said.
pub struct CloudflareProvider {
    /// API base URL without trailing slash
    api_base: String,

    /// Account email, kept for Debug output
    email: String,

    /// Auth + content-type headers sent with every request
    /// ⚠️ contains the API key, NEVER log this value
    headers: HeaderMap,

    /// Shared HTTP client
    http: HttpClient,
}

// Custom Debug implementation that hides the API key
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_base", &self.api_base)
            .field("email", &self.email)
            .field("api_key", &"<REDACTED>")
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `credentials`: Account email and global API key
    /// - `api_base`: API base URL, e.g. `https://api.cloudflare.com/client/v4`
    /// - `http`: Shared HTTP client
    ///
    /// # Errors
    ///
    /// Fails with `Error::Config` when either credential is empty or cannot
    /// be sent as a header value.
    pub fn new(
        credentials: &CloudflareCredentials,
        api_base: impl Into<String>,
        http: HttpClient,
    ) -> Result<Self> {
        if credentials.email.is_empty() || credentials.api_key.is_empty() {
            return Err(Error::config("Cloudflare email and API key are required"));
        }

        let headers = header_map(&[
            ("X-Auth-Key", credentials.api_key.as_str()),
            ("X-Auth-Email", credentials.email.as_str()),
            ("Content-Type", "application/json"),
        ])
        .map_err(|e| Error::config(format!("Cloudflare credentials unusable: {e}")))?;

        Ok(Self {
            api_base: api_base.into().trim_end_matches('/').to_string(),
            email: credentials.email.clone(),
            headers,
            http,
        })
    }

    /// Create a provider from the run configuration
    pub fn from_config(config: &SyncConfig, http: HttpClient) -> Result<Self> {
        Self::new(
            &config.cloudflare,
            config.endpoints.cloudflare_api_base.clone(),
            http,
        )
    }

    fn zones_url(&self) -> String {
        format!("{}/zones/", self.api_base)
    }

    fn records_url(&self, zone_id: &str, record_type: RecordType, record_name: &str) -> String {
        format!(
            "{}/zones/{}/dns_records?type={}&name={}",
            self.api_base, zone_id, record_type, record_name
        )
    }

    fn record_url(&self, zone_id: &str, record_id: &str) -> String {
        format!("{}/zones/{}/dns_records/{}", self.api_base, zone_id, record_id)
    }

    /// Issue a request with the auth headers, translating HTTP errors
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<Vec<u8>>,
        action: &str,
    ) -> Result<T> {
        self.http
            .request_json(method, url, body, &self.headers)
            .await
            .map_err(|e| map_status_error(e, action))
    }

    /// Fetch a list endpoint and unwrap its `result` array
    async fn list<T: DeserializeOwned>(&self, url: &str, action: &str) -> Result<Vec<T>> {
        let response: ListResponse<T> = self.call(Method::GET, url, None, action).await?;

        if response.success == Some(false) {
            return Err(Error::provider(
                PROVIDER_NAME,
                format!("{} failed: {}", action, join_messages(&response.errors)),
            ));
        }

        Ok(response.result.unwrap_or_default())
    }
}

/// Turn a non-2xx response into a Cloudflare-specific error message
fn map_status_error(err: Error, action: &str) -> Error {
    let (status, body) = match err {
        Error::Status { status, body, .. } => (status, body),
        other => return other,
    };

    let detail = serde_json::from_str::<WriteResponse>(&body)
        .ok()
        .filter(|parsed| !parsed.errors.is_empty())
        .map(|parsed| join_messages(&parsed.errors))
        .unwrap_or(body);

    let message = match status {
        401 | 403 => format!(
            "Authentication failed: Invalid email/API key or insufficient permissions. Status: {status}"
        ),
        404 => format!("{action} failed: not found. Status: {status}"),
        429 => format!("Rate limit exceeded. Please retry later. Status: {status}"),
        500..=599 => format!("Cloudflare server error (transient): {status} - {detail}"),
        _ => format!("{action} failed: {status} - {detail}"),
    };

    Error::provider(PROVIDER_NAME, message)
}

fn join_messages(messages: &[ApiMessage]) -> String {
    if messages.is_empty() {
        return "no error details".to_string();
    }
    messages
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// List zones
    ///
    /// ```http
    /// GET /zones/
    /// X-Auth-Email: <email>
    /// X-Auth-Key: <key>
    /// ```
    async fn list_zones(&self) -> Result<Vec<Zone>> {
        tracing::debug!("Listing Cloudflare zones");

        let zones: Vec<ZoneItem> = self.list(&self.zones_url(), "Zone lookup").await?;

        Ok(zones
            .into_iter()
            .map(|zone| Zone {
                id: zone.id,
                name: zone.name,
            })
            .collect())
    }

    /// List records filtered by type and name
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&name=home.example.com
    /// ```
    async fn list_records(
        &self,
        zone_id: &str,
        record_type: RecordType,
        record_name: &str,
    ) -> Result<Vec<DnsRecord>> {
        tracing::debug!(
            "Looking up record: {} (type: {}, zone: {})",
            record_name,
            record_type,
            zone_id
        );

        let url = self.records_url(zone_id, record_type, record_name);
        let records: Vec<RecordItem> = self.list(&url, "Record lookup").await?;

        Ok(records
            .into_iter()
            .map(|record| DnsRecord {
                id: record.id,
                name: record.name,
                content: record.content,
            })
            .collect())
    }

    /// Overwrite a record
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// {
    ///   "type": "A",
    ///   "name": "home.example.com",
    ///   "content": "5.6.7.8"
    /// }
    /// ```
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<UpdateResponse> {
        let body = serde_json::to_vec(update)?;
        let url = self.record_url(zone_id, record_id);

        let response: WriteResponse = self
            .call(Method::PUT, &url, Some(body), "Record update")
            .await?;

        if !response.success {
            tracing::warn!(
                "Cloudflare rejected update of {}: {}",
                update.name,
                join_messages(&response.errors)
            );
        }

        Ok(UpdateResponse {
            success: response.success,
            errors: response.errors.iter().map(ToString::to_string).collect(),
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn credentials(key: &str) -> CloudflareCredentials {
        CloudflareCredentials {
            email: "ops@example.com".to_string(),
            api_key: key.to_string(),
        }
    }

    fn provider() -> CloudflareProvider {
        let http = HttpClient::new(Duration::from_secs(5)).unwrap();
        CloudflareProvider::new(
            &credentials("secret_key_12345"),
            "https://api.cloudflare.com/client/v4/",
            http,
        )
        .unwrap()
    }

    #[test]
    fn test_missing_key_rejected() {
        let http = HttpClient::new(Duration::from_secs(5)).unwrap();
        let result = CloudflareProvider::new(&credentials(""), "https://api.example", http);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_urls() {
        let provider = provider();

        assert_eq!(
            provider.zones_url(),
            "https://api.cloudflare.com/client/v4/zones/"
        );
        assert_eq!(
            provider.records_url("z1", RecordType::A, "home.example.com"),
            "https://api.cloudflare.com/client/v4/zones/z1/dns_records?type=A&name=home.example.com"
        );
        assert_eq!(
            provider.record_url("z1", "r1"),
            "https://api.cloudflare.com/client/v4/zones/z1/dns_records/r1"
        );
    }

    #[test]
    fn test_api_key_not_exposed_in_debug() {
        let debug_str = format!("{:?}", provider());
        assert!(!debug_str.contains("secret_key_12345"));
        assert!(debug_str.contains("CloudflareProvider"));
    }

    #[test]
    fn test_provider_name() {
        assert_eq!(provider().provider_name(), "cloudflare");
    }

    #[test]
    fn test_map_status_error() {
        let forbidden = map_status_error(
            Error::Status {
                url: "u".to_string(),
                status: 403,
                body: String::new(),
            },
            "Zone lookup",
        );
        assert!(forbidden.to_string().contains("Authentication failed"));

        let bad_request = map_status_error(
            Error::Status {
                url: "u".to_string(),
                status: 400,
                body: r#"{"success":false,"errors":[{"code":9005,"message":"Content for A record is invalid"}]}"#
                    .to_string(),
            },
            "Record update",
        );
        assert_eq!(
            bad_request.to_string(),
            "Provider error (cloudflare): Record update failed: 400 - 9005: Content for A record is invalid"
        );

        let untouched = map_status_error(Error::not_found("x"), "Zone lookup");
        assert!(untouched.is_not_found());
    }
}
