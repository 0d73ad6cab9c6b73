//! One full watch cycle: collect → record → notify.

use chainwatch_collect::{
    collect_cluster_versions, collect_program_deployments, collect_repository_tags,
    ClusterDataSource, CollectOutput, RepositoryDataSource,
};
use chainwatch_core::Config;
use chainwatch_notify::Notifier;
use chainwatch_store::LedgerStore;

use crate::dispatch;
use crate::recorder;
use crate::summary::RunSummary;

/// Run the full cycle once. Every step is fail-soft per item; by the time
/// this function is reached, the only fatal error (store initialization)
/// is already behind us.
///
/// `notifier` is `None` when no messaging channel is configured; the
/// backlog then stays queued and the first run with a channel drains it.
pub async fn run_cycle(
    config: &Config,
    store: &LedgerStore,
    clusters: &dyn ClusterDataSource,
    repositories: &dyn RepositoryDataSource,
    notifier: Option<&dyn Notifier>,
) -> RunSummary {
    let mut collected = CollectOutput::default();
    collected.merge(collect_cluster_versions(clusters, &config.clusters).await);
    collected.merge(collect_program_deployments(clusters, &config.clusters, &config.programs).await);
    collected.merge(
        collect_repository_tags(repositories, &config.repositories, config.github.tag_limit).await,
    );

    let inserted = recorder::record_observations(store, &collected.observations).await;

    let dispatches = match notifier {
        Some(notifier) => match dispatch::drain_backlog(store, notifier, config).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::error!(error = %e, "backlog scan failed");
                Vec::new()
            }
        },
        None => {
            tracing::warn!("no messaging channel configured — backlog left queued");
            Vec::new()
        }
    };

    RunSummary {
        observed: collected.observations.len(),
        inserted,
        reports: collected.reports,
        dispatches,
    }
}
