//! SQLite-backed ledger store.
//!
//! [`LedgerStore`] wraps a `SqlitePool` with the three operations the run
//! cycle needs: idempotent insert, un-notified scan, and the notified flag
//! flip. Schema creation is idempotent and must succeed before a run is
//! allowed to proceed.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};

use crate::error::StoreError;
use crate::observation::{Family, Observation, PendingNotification};

/// One `CREATE TABLE` per record family. `id` doubles as insertion order so
/// the backlog drains oldest-first across runs; the natural key is UNIQUE so
/// re-observation is an ignored duplicate, not an error.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS cluster_versions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cluster TEXT NOT NULL,
        version TEXT NOT NULL,
        notified INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE (cluster, version)
    )",
    "CREATE TABLE IF NOT EXISTS repository_tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        repository TEXT NOT NULL,
        tag TEXT NOT NULL,
        notified INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE (repository, tag)
    )",
    "CREATE TABLE IF NOT EXISTS program_deployments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        program TEXT NOT NULL,
        cluster TEXT NOT NULL,
        slot INTEGER NOT NULL,
        notified INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        UNIQUE (program, cluster, slot)
    )",
];

/// Durable observation ledger. The run is single-threaded, so the pool is
/// capped at one connection; SQLite's single-statement atomicity covers the
/// insert-if-absent and flag-flip operations.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    pool: SqlitePool,
}

impl LedgerStore {
    /// Open (creating if missing) the ledger database at `path`.
    pub async fn open(path: &Path) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    /// Open a private in-memory ledger (tests).
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    /// Create the three ledger tables if absent. Safe to call on every run.
    pub async fn init(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        tracing::debug!("ledger schema ready");
        Ok(())
    }

    /// Insert the observation unless its natural key already exists in its
    /// family. Returns whether a new row was inserted.
    pub async fn record_if_absent(&self, observation: &Observation) -> Result<bool, StoreError> {
        let result = match observation {
            Observation::ClusterVersion { cluster, version } => {
                sqlx::query(
                    "INSERT OR IGNORE INTO cluster_versions (cluster, version) VALUES (?1, ?2)",
                )
                .bind(cluster)
                .bind(version)
                .execute(&self.pool)
                .await?
            }
            Observation::RepositoryTag { repository, tag } => {
                sqlx::query(
                    "INSERT OR IGNORE INTO repository_tags (repository, tag) VALUES (?1, ?2)",
                )
                .bind(repository)
                .bind(tag)
                .execute(&self.pool)
                .await?
            }
            Observation::ProgramDeployment {
                program,
                cluster,
                slot,
            } => {
                sqlx::query(
                    "INSERT OR IGNORE INTO program_deployments (program, cluster, slot)
                     VALUES (?1, ?2, ?3)",
                )
                .bind(program)
                .bind(cluster)
                .bind(*slot as i64)
                .execute(&self.pool)
                .await?
            }
        };

        Ok(result.rows_affected() > 0)
    }

    /// All rows of `family` that have not been notified yet, oldest first.
    pub async fn fetch_unnotified(
        &self,
        family: Family,
    ) -> Result<Vec<PendingNotification>, StoreError> {
        let pending = match family {
            Family::ClusterVersions => {
                sqlx::query(
                    "SELECT id, cluster, version FROM cluster_versions
                     WHERE notified = 0 ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|row| PendingNotification {
                    id: row.get("id"),
                    observation: Observation::ClusterVersion {
                        cluster: row.get("cluster"),
                        version: row.get("version"),
                    },
                })
                .collect()
            }
            Family::RepositoryTags => {
                sqlx::query(
                    "SELECT id, repository, tag FROM repository_tags
                     WHERE notified = 0 ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|row| PendingNotification {
                    id: row.get("id"),
                    observation: Observation::RepositoryTag {
                        repository: row.get("repository"),
                        tag: row.get("tag"),
                    },
                })
                .collect()
            }
            Family::ProgramDeployments => {
                sqlx::query(
                    "SELECT id, program, cluster, slot FROM program_deployments
                     WHERE notified = 0 ORDER BY id",
                )
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|row| PendingNotification {
                    id: row.get("id"),
                    observation: Observation::ProgramDeployment {
                        program: row.get("program"),
                        cluster: row.get("cluster"),
                        slot: row.get::<i64, _>("slot") as u64,
                    },
                })
                .collect()
            }
        };

        Ok(pending)
    }

    /// Flip the notified flag for exactly one row. Called only after the
    /// outbound dispatch for that row succeeded.
    pub async fn mark_notified(&self, family: Family, id: i64) -> Result<(), StoreError> {
        let statement = match family {
            Family::ClusterVersions => "UPDATE cluster_versions SET notified = 1 WHERE id = ?1",
            Family::RepositoryTags => "UPDATE repository_tags SET notified = 1 WHERE id = ?1",
            Family::ProgramDeployments => {
                "UPDATE program_deployments SET notified = 1 WHERE id = ?1"
            }
        };
        sqlx::query(statement).bind(id).execute(&self.pool).await?;
        Ok(())
    }
}
