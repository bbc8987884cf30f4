//! Standalone expired-session sweeper
//!
//! Runs the session cleanup loop until interrupted. With `--once` a single
//! sweep is performed and the exit status reflects its outcome.

use anyhow::{bail, Context};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = scribe_infra::load_config().context("failed to load configuration")?;
    scribe_infra::telemetry::init_tracing(&config.logging)?;

    let services = scribe_infra::initialize(config)
        .await
        .context("failed to initialize services")?;
    services
        .pool
        .run_migrations()
        .await
        .context("failed to apply migrations")?;

    if std::env::args().any(|arg| arg == "--once") {
        let result = services.cleanup.run_cleanup().await;
        services.pool.close().await;
        if !result.is_success() {
            bail!("session sweep failed: {}", result.errors.join("; "));
        }
        info!("Swept {} expired sessions", result.expired_sessions_deleted);
        return Ok(());
    }

    match services.cleanup.clone().start_background_task() {
        Some(handle) => {
            tokio::signal::ctrl_c()
                .await
                .context("failed to listen for shutdown signal")?;
            info!("Shutdown requested, stopping session sweeper");
            handle.abort();
        }
        None => warn!("Session cleanup is disabled, nothing to do"),
    }

    services.pool.close().await;
    Ok(())
}
