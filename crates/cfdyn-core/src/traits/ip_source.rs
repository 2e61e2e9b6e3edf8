// # IP Source Trait
//
// Defines the interface for detecting the caller's public IP address.
//
// ## Implementations
//
// - HTTP "echo my IP" service: `cfdyn-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use cfdyn_core::IpSource;
//
// let source = /* IpSource implementation */;
// let ip = source.current().await?;
// println!("public IP: {ip}");
// ```

use crate::error::Result;
use crate::model::PublicIp;
use async_trait::async_trait;

/// Trait for public IP sources
///
/// Each call performs a fresh lookup. Implementations do not cache.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Look up the current public IP address
    ///
    /// # Returns
    ///
    /// - `Ok(PublicIp)`: A syntactically valid address
    /// - `Err(Error)`: The lookup failed or returned something unusable
    async fn current(&self) -> Result<PublicIp>;

    /// Source name (for logging)
    fn source_name(&self) -> &'static str;
}
