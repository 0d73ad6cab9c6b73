//! Cluster version collector.
//!
//! Queries each configured cluster for its active nodes and collapses the
//! per-node version census to one observation per distinct version. The
//! occurrence counts are logged for operators but are not part of the
//! natural key.

use std::collections::BTreeMap;

use chainwatch_store::Observation;

use crate::report::{CollectOutput, ItemReport};
use crate::sources::ClusterDataSource;

pub async fn collect_cluster_versions(
    source: &dyn ClusterDataSource,
    clusters: &BTreeMap<String, String>,
) -> CollectOutput {
    let mut output = CollectOutput::default();

    for (cluster, endpoint) in clusters {
        match source.list_nodes(endpoint).await {
            Ok(nodes) => {
                let mut tally: BTreeMap<String, usize> = BTreeMap::new();
                for node in nodes {
                    let Some(version) = node.version else {
                        continue;
                    };
                    *tally.entry(version).or_insert(0) += 1;
                }

                for (version, count) in &tally {
                    tracing::debug!(%cluster, %version, count, "cluster version census");
                }
                tracing::info!(%cluster, distinct = tally.len(), "collected cluster versions");

                output.reports.push(ItemReport::collected(cluster, tally.len()));
                output
                    .observations
                    .extend(tally.into_keys().map(|version| Observation::ClusterVersion {
                        cluster: cluster.clone(),
                        version,
                    }));
            }
            Err(e) => {
                tracing::warn!(%cluster, error = %e, "cluster version collection failed");
                output.reports.push(ItemReport::failed(cluster, &e));
            }
        }
    }

    output
}
