//! Observation model: the three record families and their natural keys.

/// The three ledger tables, one per record family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    ClusterVersions,
    RepositoryTags,
    ProgramDeployments,
}

impl Family {
    /// All families, in the order the backlog is drained.
    pub const ALL: [Family; 3] = [
        Family::ClusterVersions,
        Family::RepositoryTags,
        Family::ProgramDeployments,
    ];

    /// SQLite table backing this family.
    pub fn table(&self) -> &'static str {
        match self {
            Family::ClusterVersions => "cluster_versions",
            Family::RepositoryTags => "repository_tags",
            Family::ProgramDeployments => "program_deployments",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

/// A single observed value, identified by its natural key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// A validator software version seen on a cluster.
    ClusterVersion { cluster: String, version: String },
    /// A release tag seen in a tracked repository.
    RepositoryTag { repository: String, tag: String },
    /// A deployment slot observed for a tracked on-chain program.
    ProgramDeployment {
        program: String,
        cluster: String,
        slot: u64,
    },
}

impl Observation {
    pub fn family(&self) -> Family {
        match self {
            Observation::ClusterVersion { .. } => Family::ClusterVersions,
            Observation::RepositoryTag { .. } => Family::RepositoryTags,
            Observation::ProgramDeployment { .. } => Family::ProgramDeployments,
        }
    }

    /// Compact natural-key rendering for log lines and run summaries.
    pub fn key_label(&self) -> String {
        match self {
            Observation::ClusterVersion { cluster, version } => {
                format!("{cluster}/{version}")
            }
            Observation::RepositoryTag { repository, tag } => {
                format!("{repository}/{tag}")
            }
            Observation::ProgramDeployment {
                program,
                cluster,
                slot,
            } => format!("{program}/{cluster}/{slot}"),
        }
    }
}

/// An un-notified ledger row: the stored observation plus its row handle,
/// used to flip the notified flag after a successful dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingNotification {
    pub id: i64,
    pub observation: Observation,
}
