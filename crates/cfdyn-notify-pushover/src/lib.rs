// # Pushover Notifier
//
// Sends cfdyn's update notifications through the Pushover message API.
//
// ```http
// POST /1/messages.json
// Content-Type: application/json
//
// { "token": "<app>", "user": "<user>", "title": "...", "message": "..." }
// ```
//
// Delivery is fire-and-forget. A completed exchange counts as sent whatever
// the status code; only transport-level failures are reported.

use cfdyn_core::config::{PushoverCredentials, SyncConfig};
use cfdyn_core::http::{HttpClient, header_map};
use cfdyn_core::model::NotificationMessage;
use cfdyn_core::traits::Notifier;
use cfdyn_core::{Error, Result};
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;

#[derive(Serialize)]
struct MessageRequest<'a> {
    token: &'a str,
    user: &'a str,
    message: &'a str,
    title: &'a str,
}

/// Pushover notifier
///
/// The Debug implementation hides both tokens.
pub struct PushoverNotifier {
    url: String,
    credentials: PushoverCredentials,
    headers: HeaderMap,
    http: HttpClient,
}

impl std::fmt::Debug for PushoverNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PushoverNotifier")
            .field("url", &self.url)
            .field("credentials", &self.credentials)
            .finish()
    }
}

impl PushoverNotifier {
    /// Create a new notifier
    ///
    /// # Parameters
    ///
    /// - `credentials`: Application token and user key
    /// - `url`: Message endpoint
    /// - `http`: Shared HTTP client
    pub fn new(
        credentials: PushoverCredentials,
        url: impl Into<String>,
        http: HttpClient,
    ) -> Result<Self> {
        if credentials.app_token.is_empty() || credentials.user_token.is_empty() {
            return Err(Error::config("Pushover app and user tokens are required"));
        }

        Ok(Self {
            url: url.into(),
            credentials,
            headers: header_map(&[("Content-Type", "application/json")])?,
            http,
        })
    }

    /// Create from the run configuration
    ///
    /// Returns `Ok(None)` when notifications are not configured.
    pub fn from_config(config: &SyncConfig, http: HttpClient) -> Result<Option<Self>> {
        config
            .pushover
            .clone()
            .map(|credentials| Self::new(credentials, config.endpoints.pushover_url.clone(), http))
            .transpose()
    }
}

#[async_trait::async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, message: &NotificationMessage) -> Result<()> {
        let body = serde_json::to_vec(&MessageRequest {
            token: &self.credentials.app_token,
            user: &self.credentials.user_token,
            message: &message.body,
            title: &message.title,
        })?;

        let status = self
            .http
            .send(Method::POST, &self.url, Some(body), &self.headers)
            .await
            .map_err(|e| Error::notification(e.to_string()))?;

        tracing::debug!("Pushover answered HTTP {}", status);
        Ok(())
    }

    fn notifier_name(&self) -> &'static str {
        "pushover"
    }
}
