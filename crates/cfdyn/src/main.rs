// # cfdyn - Cloudflare dynamic DNS updater
//
// Runs one reconciliation of `<SUBDOMAIN>.<DOMAIN_NAME>` against the
// caller's public IP, then exits. Schedule it with cron or a systemd timer.
//
// This binary is a thin integration layer: it reads the environment, sets up
// logging and the runtime, and hands over to `cfdyn_core::SyncEngine`.
//
// ## Configuration
//
// ### Required
// - `CLOUDFLARE_EMAIL`: Cloudflare account email
// - `CLOUDFLARE_KEY`: Cloudflare global API key
// - `DOMAIN_NAME`: Zone name, e.g. `example.com`
// - `SUBDOMAIN`: Record label, e.g. `home`
//
// ### Notifications (both or neither)
// - `PUSHOVER_APP_TOKEN`: Pushover application token
// - `PUSHOVER_USER_TOKEN`: Pushover user key
//
// ### Optional
// - `CFDYN_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
// - `CFDYN_MODE`: live or dry-run (default: live)
// - `CFDYN_HTTP_TIMEOUT_SECS`: Per-request timeout, 1-300 (default: 30)
// - `CFDYN_CLOUDFLARE_API_BASE`, `CFDYN_IP_LOOKUP_URL`, `CFDYN_PUSHOVER_URL`:
//   endpoint overrides
//
// ## Exit codes
//
// - `0`: Record already correct, updated, or dry run
// - `1`: Configuration error, nothing was contacted
// - `2`: Any runtime failure, including a zone or `A` record that does not
//   exist yet. cfdyn never creates records, so a missing record exits `2` on
//   every run until it is created in Cloudflare. A rejected update and an
//   interrupting signal also exit `2`.
//
// ## Example
//
// ```bash
// export CLOUDFLARE_EMAIL=ops@example.com
// export CLOUDFLARE_KEY=your_global_key
// export DOMAIN_NAME=example.com
// export SUBDOMAIN=home
//
// cfdyn
// ```

use cfdyn::{CfdynExitCode, run};
use cfdyn_core::config::{SyncConfig, vars};
use cfdyn_core::engine::SyncOutcome;
use std::process::ExitCode;
use tracing::{Level, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

fn main() -> ExitCode {
    // Logging comes first so warnings raised while loading config are shown
    let log_level = match std::env::var(vars::LOG_LEVEL)
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return CfdynExitCode::ConfigError.into();
    }

    let config = match SyncConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return CfdynExitCode::ConfigError.into();
        }
    };

    if config.dry_run {
        info!("Dry-run mode: the record will not be changed");
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return CfdynExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        tokio::select! {
            result = run(&config) => match result {
                Ok(outcome) => {
                    report(&outcome);
                    CfdynExitCode::for_outcome(&outcome)
                }
                Err(e) => {
                    error!("Run failed: {:#}", e);
                    CfdynExitCode::RuntimeError
                }
            },
            signal = wait_for_shutdown() => {
                warn!("Received {}, abandoning run", signal);
                CfdynExitCode::RuntimeError
            }
        }
    });

    code.into()
}

/// Log a one-line summary of how the run ended
fn report(outcome: &SyncOutcome) {
    match outcome {
        SyncOutcome::Unchanged { record_name, ip } => {
            info!("{} already points at {}", record_name, ip);
        }
        SyncOutcome::DryRun {
            record_name,
            previous_ip,
            new_ip,
        } => {
            info!(
                "Dry run: {} would change from {} to {}",
                record_name, previous_ip, new_ip
            );
        }
        SyncOutcome::Updated {
            record_name,
            new_ip,
            notified,
            ..
        } => {
            info!(
                "{} updated to {} (notified: {})",
                record_name, new_ip, notified
            );
        }
        SyncOutcome::UpdateFailed {
            record_name,
            reason,
            notified,
            ..
        } => {
            error!(
                "Update of {} failed: {} (notified: {})",
                record_name, reason, notified
            );
        }
    }
}

/// Wait for SIGTERM or SIGINT
///
/// If the handlers cannot be installed this never resolves and the run is
/// left to finish on its own.
#[cfg(unix)]
async fn wait_for_shutdown() -> &'static str {
    let handlers = signal(SignalKind::terminate())
        .and_then(|term| signal(SignalKind::interrupt()).map(|int| (term, int)));

    match handlers {
        Ok((mut sigterm, mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => "SIGTERM",
                _ = sigint.recv() => "SIGINT",
            }
        }
        Err(e) => {
            warn!("Failed to install signal handlers: {}", e);
            std::future::pending().await
        }
    }
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "SIGINT",
        Err(e) => {
            warn!("Failed to wait for CTRL-C: {}", e);
            std::future::pending().await
        }
    }
}
