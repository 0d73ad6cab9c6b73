//! Program deployment collector.
//!
//! For each (program, cluster) pair, follows the upgradeable-loader
//! indirection: read the primary program account, follow its executable-data
//! reference, and read the slot that secondary account was last written at.
//! Any missing link in the chain is steady state (the address is not an
//! upgradeable program, or is not deployed there) and skips the pair.

use std::collections::BTreeMap;

use chainwatch_core::ProgramAddress;
use chainwatch_store::Observation;

use crate::error::SourceError;
use crate::report::{CollectOutput, ItemReport};
use crate::sources::ClusterDataSource;

enum SlotProbe {
    Deployed(u64),
    NotFound(&'static str),
}

async fn deployment_slot(
    source: &dyn ClusterDataSource,
    endpoint: &str,
    address: &str,
) -> Result<SlotProbe, SourceError> {
    let Some(account) = source.read_account(endpoint, address).await? else {
        return Ok(SlotProbe::NotFound("program account not found"));
    };
    let Some(program_data) = account.program_data else {
        return Ok(SlotProbe::NotFound("account has no executable-data reference"));
    };
    let Some(data_account) = source.read_account(endpoint, &program_data).await? else {
        return Ok(SlotProbe::NotFound("executable-data account not found"));
    };
    match data_account.slot {
        Some(slot) => Ok(SlotProbe::Deployed(slot)),
        None => Ok(SlotProbe::NotFound("executable-data account reports no slot")),
    }
}

pub async fn collect_program_deployments(
    source: &dyn ClusterDataSource,
    clusters: &BTreeMap<String, String>,
    programs: &BTreeMap<String, ProgramAddress>,
) -> CollectOutput {
    let mut output = CollectOutput::default();

    for (cluster, endpoint) in clusters {
        for (program, configured) in programs {
            let item = format!("{program}@{cluster}");

            let Some(address) = configured.for_cluster(cluster) else {
                tracing::debug!(%program, %cluster, "no address configured for cluster");
                output
                    .reports
                    .push(ItemReport::skipped(item, "no address configured for cluster"));
                continue;
            };

            match deployment_slot(source, endpoint, address).await {
                Ok(SlotProbe::Deployed(slot)) => {
                    tracing::info!(%program, %cluster, slot, "observed program deployment");
                    output.reports.push(ItemReport::collected(item, 1));
                    output.observations.push(Observation::ProgramDeployment {
                        program: program.clone(),
                        cluster: cluster.clone(),
                        slot,
                    });
                }
                Ok(SlotProbe::NotFound(reason)) => {
                    tracing::info!(%program, %cluster, reason, "program deployment skipped");
                    output.reports.push(ItemReport::skipped(item, reason));
                }
                Err(e) => {
                    tracing::warn!(%program, %cluster, error = %e, "program deployment query failed");
                    output.reports.push(ItemReport::failed(item, &e));
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::report::ItemStatus;
    use crate::sources::{AccountState, NodeInfo};

    /// Maps (endpoint, address) → canned account state.
    struct MockAccounts {
        accounts: BTreeMap<(String, String), AccountState>,
        fail_endpoints: Vec<String>,
    }

    impl MockAccounts {
        fn new() -> Self {
            Self {
                accounts: BTreeMap::new(),
                fail_endpoints: Vec::new(),
            }
        }

        fn with_account(mut self, endpoint: &str, address: &str, state: AccountState) -> Self {
            self.accounts
                .insert((endpoint.to_string(), address.to_string()), state);
            self
        }

        fn failing(mut self, endpoint: &str) -> Self {
            self.fail_endpoints.push(endpoint.to_string());
            self
        }
    }

    #[async_trait]
    impl ClusterDataSource for MockAccounts {
        async fn list_nodes(&self, _endpoint: &str) -> Result<Vec<NodeInfo>, SourceError> {
            unimplemented!("not used by this collector")
        }

        async fn read_account(
            &self,
            endpoint: &str,
            address: &str,
        ) -> Result<Option<AccountState>, SourceError> {
            if self.fail_endpoints.iter().any(|e| e == endpoint) {
                return Err(SourceError::Api(format!("unreachable endpoint {endpoint}")));
            }
            Ok(self
                .accounts
                .get(&(endpoint.to_string(), address.to_string()))
                .cloned())
        }
    }

    fn single(cluster: &str, endpoint: &str) -> BTreeMap<String, String> {
        BTreeMap::from([(cluster.to_string(), endpoint.to_string())])
    }

    fn fixed(program: &str, address: &str) -> BTreeMap<String, ProgramAddress> {
        BTreeMap::from([(program.to_string(), ProgramAddress::Fixed(address.to_string()))])
    }

    #[tokio::test]
    async fn follows_executable_data_indirection() {
        let source = MockAccounts::new()
            .with_account(
                "http://devnet",
                "Prog111",
                AccountState {
                    program_data: Some("Data111".into()),
                    slot: None,
                },
            )
            .with_account(
                "http://devnet",
                "Data111",
                AccountState {
                    program_data: None,
                    slot: Some(231178522),
                },
            );

        let output = collect_program_deployments(
            &source,
            &single("devnet", "http://devnet"),
            &fixed("metaplex", "Prog111"),
        )
        .await;

        assert_eq!(
            output.observations,
            [Observation::ProgramDeployment {
                program: "metaplex".into(),
                cluster: "devnet".into(),
                slot: 231178522,
            }]
        );
        assert_eq!(output.reports, [ItemReport::collected("metaplex@devnet", 1)]);
    }

    #[tokio::test]
    async fn missing_executable_data_reference_skips_pair() {
        let source = MockAccounts::new().with_account(
            "http://devnet",
            "Prog111",
            AccountState::default(),
        );

        let output = collect_program_deployments(
            &source,
            &single("devnet", "http://devnet"),
            &fixed("metaplex", "Prog111"),
        )
        .await;

        assert!(output.observations.is_empty());
        assert!(matches!(output.reports[0].status, ItemStatus::Skipped(_)));
    }

    #[tokio::test]
    async fn absent_program_account_skips_pair() {
        let source = MockAccounts::new();

        let output = collect_program_deployments(
            &source,
            &single("devnet", "http://devnet"),
            &fixed("metaplex", "Prog111"),
        )
        .await;

        assert!(output.observations.is_empty());
        assert_eq!(
            output.reports,
            [ItemReport::skipped("metaplex@devnet", "program account not found")]
        );
    }

    #[tokio::test]
    async fn per_cluster_address_missing_for_cluster_skips_pair() {
        let source = MockAccounts::new();
        let programs = BTreeMap::from([(
            "metaplex".to_string(),
            ProgramAddress::PerCluster(BTreeMap::from([(
                "devnet".to_string(),
                "Prog111".to_string(),
            )])),
        )]);

        let output = collect_program_deployments(
            &source,
            &single("testnet", "http://testnet"),
            &programs,
        )
        .await;

        assert!(output.observations.is_empty());
        assert_eq!(
            output.reports,
            [ItemReport::skipped(
                "metaplex@testnet",
                "no address configured for cluster"
            )]
        );
    }

    #[tokio::test]
    async fn one_failing_cluster_does_not_block_the_other() {
        let source = MockAccounts::new()
            .failing("http://devnet")
            .with_account(
                "http://testnet",
                "Prog111",
                AccountState {
                    program_data: Some("Data111".into()),
                    slot: None,
                },
            )
            .with_account(
                "http://testnet",
                "Data111",
                AccountState {
                    program_data: None,
                    slot: Some(99),
                },
            );

        let clusters = BTreeMap::from([
            ("devnet".to_string(), "http://devnet".to_string()),
            ("testnet".to_string(), "http://testnet".to_string()),
        ]);

        let output =
            collect_program_deployments(&source, &clusters, &fixed("metaplex", "Prog111")).await;

        assert_eq!(output.observations.len(), 1);
        assert!(matches!(output.reports[0].status, ItemStatus::Failed(_)));
        assert_eq!(output.reports[1], ItemReport::collected("metaplex@testnet", 1));
    }
}
