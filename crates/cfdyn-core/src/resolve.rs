//! Zone and record resolution
//!
//! Both lookups funnel through [`find_exactly_one`], so "no match" is an
//! explicit error in each case.

use crate::error::Result;
use crate::lookup::find_exactly_one;
use crate::model::{DnsRecord, RecordType, Zone};
use crate::traits::DnsProvider;
use tracing::{debug, info};

/// Find the zone whose name is exactly `base_domain`
pub async fn resolve_zone(provider: &dyn DnsProvider, base_domain: &str) -> Result<Zone> {
    let zones = provider.list_zones().await?;
    debug!("{} returned {} zone(s)", provider.provider_name(), zones.len());

    let zone = find_exactly_one(zones, |zone| zone.name == base_domain)
        .into_first(&format!("zone {base_domain}"))?;

    info!("Received zone ID: {}", zone.id);
    Ok(zone)
}

/// Find the `A` record named `record_name` in `zone`
///
/// The first record the provider returns wins.
pub async fn resolve_record(
    provider: &dyn DnsProvider,
    zone: &Zone,
    record_name: &str,
) -> Result<DnsRecord> {
    let records = provider
        .list_records(&zone.id, RecordType::A, record_name)
        .await?;

    let record = find_exactly_one(records, |_| true)
        .into_first(&format!("{} record {}", RecordType::A, record_name))?;

    info!("Received IP address from {}: {}", provider.provider_name(), record.content);
    Ok(record)
}
