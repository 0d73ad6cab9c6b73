//! chainwatch: one watch cycle. Polls clusters, repositories, and program
//! accounts, persists new observations, and notifies the backlog.
//!
//! No CLI flags; all configuration is environment-provided (see
//! chainwatch-core). The exit code is non-zero only when the ledger store
//! cannot be opened or initialized. Per-item failures are logged and the
//! process still exits 0, leaving retries to the next scheduled run.

use anyhow::Context;
use tracing::info;

use chainwatch_collect::{GithubTagSource, RpcClusterClient};
use chainwatch_notify::{Notifier, SlackWebhookNotifier};
use chainwatch_store::LedgerStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    chainwatch_core::config::load_dotenv();
    let config = chainwatch_core::Config::from_env();
    config.log_summary();

    // A run without a ledger cannot deduplicate, so this is the one path
    // that aborts.
    let store = LedgerStore::open(&config.store.db_path)
        .await
        .with_context(|| format!("open ledger store at {}", config.store.db_path.display()))?;
    store.init().await.context("initialize ledger schema")?;

    let clusters = RpcClusterClient::new();
    let repositories = GithubTagSource::new(config.github.token.clone());

    let notifier = match &config.slack.webhook_url {
        Some(url) => match SlackWebhookNotifier::new(url.clone()) {
            Ok(notifier) => Some(notifier),
            Err(e) => {
                tracing::warn!(error = %e, "webhook misconfigured — dispatch disabled this run");
                None
            }
        },
        None => None,
    };

    let summary = chainwatch_runner::run_cycle(
        &config,
        &store,
        &clusters,
        &repositories,
        notifier.as_ref().map(|n| n as &dyn Notifier),
    )
    .await;

    summary.log();
    info!("run complete");
    Ok(())
}
