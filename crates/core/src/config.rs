use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_usize(key: &str, default: usize) -> usize {
    env_opt(key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read a JSON-valued env var, falling back to `default` when the variable
/// is unset or malformed. A bad edit to one variable must not brick the
/// scheduled job, so parse errors are logged and the default is used.
fn env_json_or<T: serde::de::DeserializeOwned>(key: &str, default: fn() -> T) -> T {
    match env_opt(key) {
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(key, error = %e, "malformed JSON in env var — using built-in defaults");
                default()
            }
        },
        None => default(),
    }
}

// ── Program addresses ─────────────────────────────────────────

/// A tracked program's on-chain address: either a single address valid on
/// every cluster, or an explicit per-cluster mapping.
///
/// Resolution is a plain lookup with a defined fallback: a cluster absent
/// from a `PerCluster` map means the program is not deployed there and the
/// (program, cluster) pair is skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProgramAddress {
    Fixed(String),
    PerCluster(BTreeMap<String, String>),
}

impl ProgramAddress {
    /// Address to query on `cluster`, if the program is deployed there.
    pub fn for_cluster(&self, cluster: &str) -> Option<&str> {
        match self {
            Self::Fixed(address) => Some(address),
            Self::PerCluster(map) => map.get(cluster).map(String::as_str),
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

/// Process configuration, built once at startup from the environment and
/// passed by reference into each component. No ambient global state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub slack: SlackConfig,
    pub store: StoreConfig,
    pub github: GithubConfig,
    /// Cluster name → node-query RPC endpoint.
    pub clusters: BTreeMap<String, String>,
    /// Program name → on-chain address (fixed or per-cluster).
    pub programs: BTreeMap<String, ProgramAddress>,
    /// Repository name → upstream identifier (e.g. "owner/repo").
    pub repositories: BTreeMap<String, String>,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            slack: SlackConfig::from_env(),
            store: StoreConfig::from_env(),
            github: GithubConfig::from_env(),
            clusters: env_json_or("CHAINWATCH_CLUSTERS", default_clusters),
            programs: env_json_or("CHAINWATCH_PROGRAMS", default_programs),
            repositories: env_json_or("CHAINWATCH_REPOSITORIES", default_repositories),
        }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded:");
        tracing::info!(
            "  slack:        webhook {}",
            if self.slack.webhook_url.is_some() { "configured" } else { "(none)" }
        );
        tracing::info!("  store:        db_path={}", self.store.db_path.display());
        tracing::info!(
            "  github:       token {}, tag_limit={}",
            if self.github.token.is_some() { "configured" } else { "(none)" },
            self.github.tag_limit
        );
        tracing::info!(
            "  clusters:     {}",
            self.clusters.keys().cloned().collect::<Vec<_>>().join(", ")
        );
        tracing::info!(
            "  programs:     {}",
            self.programs.keys().cloned().collect::<Vec<_>>().join(", ")
        );
        tracing::info!(
            "  repositories: {}",
            self.repositories.keys().cloned().collect::<Vec<_>>().join(", ")
        );
    }
}

// ── Slack ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlackConfig {
    /// Incoming-webhook URL. When absent, dispatch is skipped and the
    /// backlog accumulates until a webhook is configured.
    pub webhook_url: Option<String>,
}

impl SlackConfig {
    fn from_env() -> Self {
        Self {
            webhook_url: env_opt("SLACK_WEBHOOK_URL"),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

// ── Store ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    fn from_env() -> Self {
        Self {
            db_path: PathBuf::from(env_or("CHAINWATCH_DB", "versions.db")),
        }
    }
}

// ── GitHub ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubConfig {
    /// Optional bearer token. Unauthenticated requests work but are
    /// rate-limited aggressively by the API.
    pub token: Option<String>,
    /// How many of the most recent tags to fetch per repository.
    pub tag_limit: usize,
}

impl GithubConfig {
    fn from_env() -> Self {
        Self {
            token: env_opt("GITHUB_TOKEN"),
            tag_limit: env_usize("CHAINWATCH_TAG_LIMIT", 10),
        }
    }
}

// ── Built-in watch targets ────────────────────────────────────

fn default_clusters() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("devnet".to_string(), "https://api.devnet.solana.com".to_string()),
        ("testnet".to_string(), "https://api.testnet.solana.com".to_string()),
        (
            "mainnet-beta".to_string(),
            "https://api.mainnet-beta.solana.com".to_string(),
        ),
    ])
}

fn default_programs() -> BTreeMap<String, ProgramAddress> {
    BTreeMap::from([(
        "metaplex".to_string(),
        ProgramAddress::Fixed("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s".to_string()),
    )])
}

fn default_repositories() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("solana".to_string(), "solana-labs/solana".to_string()),
        ("spl".to_string(), "solana-labs/solana-program-library".to_string()),
        (
            "metaplex".to_string(),
            "metaplex-foundation/metaplex-program-library".to_string(),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_address_fixed_resolves_everywhere() {
        let addr = ProgramAddress::Fixed("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s".into());
        assert_eq!(
            addr.for_cluster("devnet"),
            Some("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s")
        );
        assert_eq!(
            addr.for_cluster("mainnet-beta"),
            Some("metaqbxxUerdq28cj1RbAWkYQm3ybzjb6a8bt518x1s")
        );
    }

    #[test]
    fn program_address_per_cluster_misses_unlisted() {
        let addr = ProgramAddress::PerCluster(BTreeMap::from([(
            "devnet".to_string(),
            "Dev111111111111111111111111111111111111111".to_string(),
        )]));
        assert_eq!(
            addr.for_cluster("devnet"),
            Some("Dev111111111111111111111111111111111111111")
        );
        assert_eq!(addr.for_cluster("testnet"), None);
    }

    #[test]
    fn program_address_deserializes_plain_string() {
        let addr: ProgramAddress = serde_json::from_str(r#""SomeAddr111""#).unwrap();
        assert_eq!(addr, ProgramAddress::Fixed("SomeAddr111".into()));
    }

    #[test]
    fn program_address_deserializes_map() {
        let addr: ProgramAddress =
            serde_json::from_str(r#"{"devnet": "A", "testnet": "B"}"#).unwrap();
        assert_eq!(addr.for_cluster("testnet"), Some("B"));
    }

    #[test]
    fn programs_env_parses_mixed_shapes() {
        let programs: BTreeMap<String, ProgramAddress> =
            serde_json::from_str(r#"{"fixed": "Addr1", "split": {"devnet": "Addr2"}}"#).unwrap();
        assert_eq!(programs["fixed"].for_cluster("testnet"), Some("Addr1"));
        assert_eq!(programs["split"].for_cluster("testnet"), None);
    }

    #[test]
    fn env_json_or_malformed_falls_back() {
        std::env::set_var("CHAINWATCH_TEST_BAD_JSON", "{not json");
        let map: BTreeMap<String, String> =
            env_json_or("CHAINWATCH_TEST_BAD_JSON", BTreeMap::new);
        assert!(map.is_empty());
        std::env::remove_var("CHAINWATCH_TEST_BAD_JSON");
    }

    #[test]
    fn env_json_or_parses_valid_map() {
        std::env::set_var("CHAINWATCH_TEST_GOOD_JSON", r#"{"a": "b"}"#);
        let map: BTreeMap<String, String> =
            env_json_or("CHAINWATCH_TEST_GOOD_JSON", BTreeMap::new);
        assert_eq!(map["a"], "b");
        std::env::remove_var("CHAINWATCH_TEST_GOOD_JSON");
    }

    #[test]
    fn default_targets_cover_public_clusters() {
        let clusters = default_clusters();
        assert_eq!(clusters.len(), 3);
        assert!(clusters.contains_key("devnet"));
        assert!(clusters.contains_key("testnet"));
        assert!(clusters.contains_key("mainnet-beta"));
        assert!(!default_programs().is_empty());
        assert!(!default_repositories().is_empty());
    }
}
