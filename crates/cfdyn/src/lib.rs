// # cfdyn wiring
//
// Builds a `SyncEngine` from a loaded `SyncConfig` and maps run results to
// process exit codes. `main.rs` only adds the runtime, logging and signals.

use anyhow::{Context, Result};
use cfdyn_core::config::SyncConfig;
use cfdyn_core::engine::{SyncEngine, SyncOutcome};
use cfdyn_core::http::HttpClient;
use cfdyn_core::traits::Notifier;
use cfdyn_ip_http::HttpIpSource;
use cfdyn_notify_pushover::PushoverNotifier;
use cfdyn_provider_cloudflare::CloudflareProvider;
use std::process::ExitCode;

/// Exit codes for the different ways a run can end
///
/// - 0: Record already correct, updated, or dry run
/// - 1: Configuration or startup error
/// - 2: Runtime error (including a missing zone or record), rejected update,
///   or interrupted by a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CfdynExitCode {
    /// The run left DNS in the intended state
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// Runtime failure
    RuntimeError = 2,
}

impl From<CfdynExitCode> for ExitCode {
    fn from(code: CfdynExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

impl CfdynExitCode {
    /// Exit code for a finished run
    pub fn for_outcome(outcome: &SyncOutcome) -> Self {
        if outcome.is_success() {
            CfdynExitCode::Success
        } else {
            CfdynExitCode::RuntimeError
        }
    }
}

/// Create the engine with the Cloudflare provider, the HTTP IP source and,
/// when configured, the Pushover notifier
///
/// All three share one HTTP client so the configured timeout applies to
/// every request.
pub fn build_engine(config: &SyncConfig) -> Result<SyncEngine> {
    let http = HttpClient::new(config.http_timeout).context("Failed to create HTTP client")?;

    let provider = CloudflareProvider::from_config(config, http.clone())
        .context("Failed to create Cloudflare provider")?;
    let ip_source = HttpIpSource::from_config(config, http.clone());
    let notifier = if config.notifications_enabled() {
        PushoverNotifier::from_config(config, http)
            .context("Failed to create Pushover notifier")?
            .map(|n| Box::new(n) as Box<dyn Notifier>)
    } else {
        tracing::info!("Pushover tokens not set, notifications disabled");
        None
    };

    SyncEngine::new(Box::new(provider), Box::new(ip_source), notifier, config)
        .context("Failed to create sync engine")
}

/// Build the engine and run one reconciliation
pub async fn run(config: &SyncConfig) -> Result<SyncOutcome> {
    let engine = build_engine(config)?;
    Ok(engine.run_once().await?)
}
