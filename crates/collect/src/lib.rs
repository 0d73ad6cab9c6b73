//! Signal collectors for the three watched sources.
//!
//! This crate provides:
//! - `ClusterDataSource` / `RepositoryDataSource` traits as the narrow,
//!   mockable seams to the external services
//! - `RpcClusterClient` for JSON-RPC cluster node and account queries
//! - `GithubTagSource` for repository tag listing via the GitHub REST API
//! - one collector per signal, each fail-soft per item and reporting
//!   per-item outcomes alongside its observations

pub mod cluster_versions;
pub mod error;
pub mod github;
pub mod program_deployments;
pub mod repo_tags;
pub mod report;
pub mod rpc;
pub mod sources;

pub use cluster_versions::collect_cluster_versions;
pub use error::SourceError;
pub use github::GithubTagSource;
pub use program_deployments::collect_program_deployments;
pub use repo_tags::collect_repository_tags;
pub use report::{CollectOutput, ItemReport, ItemStatus};
pub use rpc::RpcClusterClient;
pub use sources::{AccountState, ClusterDataSource, NodeInfo, RepositoryDataSource};
