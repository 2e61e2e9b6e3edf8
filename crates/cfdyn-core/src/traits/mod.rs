//! Component traits
//!
//! The engine talks to the outside world only through these interfaces:
//!
//! - [`DnsProvider`]: List zones and records, update a record
//! - [`IpSource`]: Report the caller's public IP
//! - [`Notifier`]: Deliver a push notification

pub mod ip_source;
pub mod dns_provider;
pub mod notifier;

pub use ip_source::IpSource;
pub use dns_provider::DnsProvider;
pub use notifier::Notifier;
