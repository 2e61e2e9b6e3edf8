// # DNS Provider Trait
//
// Defines the interface for reading and updating DNS records via provider APIs.
//
// ## Implementations
//
// - Cloudflare: `cfdyn-provider-cloudflare` crate
//
// ## Usage
//
// ```rust,ignore
// use cfdyn_core::{DnsProvider, RecordType, RecordUpdate};
//
// let provider = /* DnsProvider implementation */;
//
// let zones = provider.list_zones().await?;
// let records = provider
//     .list_records(&zones[0].id, RecordType::A, "home.example.com")
//     .await?;
// let response = provider
//     .update_record(&zones[0].id, &records[0].id, &update)
//     .await?;
// ```

use crate::error::Result;
use crate::model::{DnsRecord, RecordType, RecordUpdate, UpdateResponse, Zone};
use async_trait::async_trait;

/// Trait for DNS provider implementations
///
/// Providers are thin API adapters. They make exactly one HTTP call per
/// method and return what the API said. Choosing a zone or record out of a
/// list, comparing addresses, and deciding whether to update all belong to
/// the engine.
///
/// Providers never retry. A failed call is returned as an error.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List the zones visible to the configured credentials, in API order
    async fn list_zones(&self) -> Result<Vec<Zone>>;

    /// List the records of `record_type` named `record_name` in a zone
    ///
    /// Filtering happens server-side; the result is returned in API order.
    async fn list_records(
        &self,
        zone_id: &str,
        record_type: RecordType,
        record_name: &str,
    ) -> Result<Vec<DnsRecord>>;

    /// Replace a record's type, name and content
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateResponse)`: The API answered; check `success`
    /// - `Err(Error)`: The call itself failed
    async fn update_record(
        &self,
        zone_id: &str,
        record_id: &str,
        update: &RecordUpdate,
    ) -> Result<UpdateResponse>;

    /// Provider name (for logging)
    fn provider_name(&self) -> &'static str;
}
