// # cfdyn-core
//
// Core library for the cfdyn one-shot dynamic DNS updater.
//
// ## Architecture Overview
//
// - **DnsProvider**: Trait for listing zones/records and updating a record
// - **IpSource**: Trait for looking up the caller's public IP
// - **Notifier**: Trait for operator notifications
// - **SyncEngine**: Runs one lookup → compare → update → notify pass
// - **HttpClient**: Shared request helper used by every implementation
//
// ## Design Principles
//
// 1. **One pass**: A run is strictly sequential and stops at the first hard error
// 2. **Explicit failures**: Decode errors and empty lookups are errors, never zero values
// 3. **Config at the edge**: The environment is read once by the binary
// 4. **Library-first**: Implementations live in their own crates behind the traits

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;
pub mod http;
pub mod lookup;
pub mod model;
pub mod resolve;

// Re-export core types for convenience
pub use traits::{DnsProvider, IpSource, Notifier};
pub use engine::{SyncEngine, SyncOutcome};
pub use config::{CloudflareCredentials, Endpoints, PushoverCredentials, SyncConfig};
pub use error::{Error, Result};
pub use http::{HttpClient, header_map};
pub use lookup::{Lookup, find_exactly_one};
pub use model::{
    DnsRecord, NotificationMessage, PublicIp, RecordType, RecordUpdate, UpdateResponse, Zone,
};
