// # Notifier Trait
//
// Delivers a one-line status message to an operator after an update attempt.
//
// ## Implementations
//
// - Pushover: `cfdyn-notify-pushover` crate

use crate::error::Result;
use crate::model::NotificationMessage;
use async_trait::async_trait;

/// Trait for push notification services
///
/// Delivery is fire-and-forget: a completed HTTP exchange counts as sent.
/// The engine logs errors from [`Notifier::notify`] and carries on.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Send one message
    async fn notify(&self, message: &NotificationMessage) -> Result<()>;

    /// Notifier name (for logging)
    fn notifier_name(&self) -> &'static str;
}
