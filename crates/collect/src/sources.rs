//! Data-source trait definitions and the shapes collectors consume.

use async_trait::async_trait;

use crate::error::SourceError;

/// An active node as reported by a cluster's node-query endpoint.
#[derive(Debug, Clone, Default)]
pub struct NodeInfo {
    /// Gossip identity of the node. Informational only.
    pub pubkey: String,
    /// Software version string the node reports. Nodes that report none
    /// are skipped by the collector.
    pub version: Option<String>,
}

/// Parsed state of an on-chain account, reduced to the two fields the
/// deployment collector reads.
///
/// Under the upgradeable-loader model the primary program account carries a
/// `program_data` reference to a secondary account, and that secondary
/// account carries the `slot` it was last written at. An account that is
/// neither has both fields `None`.
#[derive(Debug, Clone, Default)]
pub struct AccountState {
    pub program_data: Option<String>,
    pub slot: Option<u64>,
}

/// Node and account queries against a cluster RPC endpoint.
#[async_trait]
pub trait ClusterDataSource: Send + Sync {
    /// List the cluster's currently known nodes.
    async fn list_nodes(&self, endpoint: &str) -> Result<Vec<NodeInfo>, SourceError>;

    /// Read one account's parsed state. `None` means the account does not
    /// exist, which is not an error.
    async fn read_account(
        &self,
        endpoint: &str,
        address: &str,
    ) -> Result<Option<AccountState>, SourceError>;
}

/// Tag listing against a source-control host.
#[async_trait]
pub trait RepositoryDataSource: Send + Sync {
    /// The `limit` most recently created tags of `repository`, newest first
    /// in upstream order, names verbatim.
    async fn list_tags(&self, repository: &str, limit: usize) -> Result<Vec<String>, SourceError>;
}
