//! Core sync engine
//!
//! The SyncEngine is responsible for:
//! - Resolving the zone and the current `A` record
//! - Looking up the caller's public IP
//! - Updating the record when the two disagree
//! - Notifying the operator about the update attempt
//!
//! ## Flow
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ DnsProvider │──▶│ DnsProvider  │──▶│   IpSource   │
//! │ list_zones  │   │ list_records │   │   current    │
//! └─────────────┘   └──────────────┘   └──────────────┘
//!                                              │
//!                        same IP ◀─────────────┤
//!                        (done)                ▼
//!                                     ┌──────────────┐   ┌──────────────┐
//!                                     │ DnsProvider  │──▶│   Notifier   │
//!                                     │ update_record│   │  (optional)  │
//!                                     └──────────────┘   └──────────────┘
//! ```
//!
//! Every step runs after the previous one has finished. The first hard error
//! ends the run; a failed notification never does.

use crate::config::SyncConfig;
use crate::error::Result;
use crate::model::{NotificationMessage, RecordUpdate};
use crate::resolve::{resolve_record, resolve_zone};
use crate::traits::{DnsProvider, IpSource, Notifier};
use tracing::{error, info, warn};

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The record already pointed at the public IP
    Unchanged { record_name: String, ip: String },

    /// Dry-run mode: an update was due but not sent
    DryRun {
        record_name: String,
        previous_ip: String,
        new_ip: String,
    },

    /// The provider accepted the update
    Updated {
        record_name: String,
        previous_ip: String,
        new_ip: String,
        notified: bool,
    },

    /// The update call failed or the provider rejected it
    UpdateFailed {
        record_name: String,
        previous_ip: String,
        new_ip: String,
        reason: String,
        notified: bool,
    },
}

impl SyncOutcome {
    /// Whether the run left DNS in the intended state
    pub fn is_success(&self) -> bool {
        !matches!(self, SyncOutcome::UpdateFailed { .. })
    }
}

/// Core sync engine
///
/// One engine performs one reconciliation per [`SyncEngine::run_once`] call.
/// It keeps no state between calls.
pub struct SyncEngine {
    /// DNS provider for zone/record lookups and updates
    provider: Box<dyn DnsProvider>,

    /// Public IP lookup
    ip_source: Box<dyn IpSource>,

    /// Operator notifications, if configured
    notifier: Option<Box<dyn Notifier>>,

    /// Zone name
    base_domain: String,

    /// Record label under the zone
    subdomain: String,

    /// Skip the update call
    dry_run: bool,
}

impl SyncEngine {
    /// Create a new engine
    ///
    /// # Parameters
    ///
    /// - `provider`: DNS provider implementation
    /// - `ip_source`: IP source implementation
    /// - `notifier`: Notifier implementation, `None` to disable notifications
    /// - `config`: Run configuration (validated)
    pub fn new(
        provider: Box<dyn DnsProvider>,
        ip_source: Box<dyn IpSource>,
        notifier: Option<Box<dyn Notifier>>,
        config: &SyncConfig,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            provider,
            ip_source,
            notifier,
            base_domain: config.base_domain.clone(),
            subdomain: config.subdomain.clone(),
            dry_run: config.dry_run,
        })
    }

    /// Fully-qualified name of the managed record
    pub fn record_name(&self) -> String {
        format!("{}.{}", self.subdomain, self.base_domain)
    }

    /// Run one reconciliation
    ///
    /// # Returns
    ///
    /// - `Ok(SyncOutcome)`: The run reached a decision (including a failed update)
    /// - `Err(Error)`: A lookup failed before a decision could be made
    pub async fn run_once(&self) -> Result<SyncOutcome> {
        let record_name = self.record_name();
        info!(
            "Checking {} via {} [mode: {}]",
            record_name,
            self.provider.provider_name(),
            if self.dry_run { "DRY-RUN" } else { "LIVE" }
        );

        let zone = resolve_zone(self.provider.as_ref(), &self.base_domain).await?;
        let record = resolve_record(self.provider.as_ref(), &zone, &record_name).await?;

        let public_ip = self.ip_source.current().await?;
        info!(
            "Got actual IP address from {}: {}",
            self.ip_source.source_name(),
            public_ip
        );

        if record.content == public_ip.as_str() {
            info!("IP addresses are the same, no update needed");
            return Ok(SyncOutcome::Unchanged {
                record_name,
                ip: record.content,
            });
        }

        let update = RecordUpdate::a_record(&record_name, &public_ip);

        if self.dry_run {
            info!(
                "[DRY-RUN] Would update record {} in zone {} with payload: {}",
                record.id,
                zone.id,
                serde_json::to_string(&update)?
            );
            return Ok(SyncOutcome::DryRun {
                record_name,
                previous_ip: record.content,
                new_ip: update.content,
            });
        }

        info!(
            "Updating IP address with {}: {} -> {}",
            self.provider.provider_name(),
            record.content,
            public_ip
        );

        let failure = match self
            .provider
            .update_record(&zone.id, &record.id, &update)
            .await
        {
            Ok(response) if response.success => None,
            Ok(response) if response.errors.is_empty() => {
                Some("provider reported success: false".to_string())
            }
            Ok(response) => Some(response.errors.join("; ")),
            Err(e) => Some(e.to_string()),
        };

        let notified = self.notify(failure.is_none()).await;

        match failure {
            None => {
                info!("DNS record updated successfully: {} -> {}", record_name, public_ip);
                Ok(SyncOutcome::Updated {
                    record_name,
                    previous_ip: record.content,
                    new_ip: update.content,
                    notified,
                })
            }
            Some(reason) => {
                error!("Failed to update {}: {}", record_name, reason);
                Ok(SyncOutcome::UpdateFailed {
                    record_name,
                    previous_ip: record.content,
                    new_ip: update.content,
                    reason,
                    notified,
                })
            }
        }
    }

    /// Send the success or failure message, if a notifier is configured
    ///
    /// Returns whether a message went out.
    async fn notify(&self, succeeded: bool) -> bool {
        let Some(notifier) = &self.notifier else {
            return false;
        };

        let message = if succeeded {
            NotificationMessage::update_succeeded()
        } else {
            NotificationMessage::update_failed()
        };

        info!("Sending {} notification: {}", notifier.notifier_name(), message.title);
        match notifier.notify(&message).await {
            Ok(()) => true,
            Err(e) => {
                warn!("Notification via {} failed: {}", notifier.notifier_name(), e);
                false
            }
        }
    }
}
