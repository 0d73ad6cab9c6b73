//! Repository tag collector.
//!
//! Fetches the most recent tags of each tracked repository and passes the
//! names through verbatim: pre-release and oddly named tags are
//! observations like any other.

use std::collections::BTreeMap;

use chainwatch_store::Observation;

use crate::report::{CollectOutput, ItemReport};
use crate::sources::RepositoryDataSource;

pub async fn collect_repository_tags(
    source: &dyn RepositoryDataSource,
    repositories: &BTreeMap<String, String>,
    limit: usize,
) -> CollectOutput {
    let mut output = CollectOutput::default();

    for (name, repository) in repositories {
        match source.list_tags(repository, limit).await {
            Ok(tags) => {
                tracing::info!(%name, %repository, count = tags.len(), "collected repository tags");
                output.reports.push(ItemReport::collected(name, tags.len()));
                output
                    .observations
                    .extend(tags.into_iter().map(|tag| Observation::RepositoryTag {
                        repository: name.clone(),
                        tag,
                    }));
            }
            Err(e) => {
                tracing::warn!(%name, %repository, error = %e, "tag collection failed");
                output.reports.push(ItemReport::failed(name, &e));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use crate::error::SourceError;
    use crate::report::ItemStatus;

    struct MockTags {
        by_repository: BTreeMap<String, Vec<String>>,
        seen_limit: std::sync::Mutex<Option<usize>>,
    }

    #[async_trait]
    impl RepositoryDataSource for MockTags {
        async fn list_tags(
            &self,
            repository: &str,
            limit: usize,
        ) -> Result<Vec<String>, SourceError> {
            *self.seen_limit.lock().unwrap() = Some(limit);
            self.by_repository
                .get(repository)
                .map(|tags| tags.iter().take(limit).cloned().collect())
                .ok_or_else(|| SourceError::Api(format!("no such repository {repository}")))
        }
    }

    fn mock(entries: &[(&str, &[&str])]) -> MockTags {
        MockTags {
            by_repository: entries
                .iter()
                .map(|(repo, tags)| {
                    (
                        repo.to_string(),
                        tags.iter().map(|t| t.to_string()).collect(),
                    )
                })
                .collect(),
            seen_limit: std::sync::Mutex::new(None),
        }
    }

    #[tokio::test]
    async fn tags_become_observations_keyed_by_tracked_name() {
        let source = mock(&[("solana-labs/solana", &["v1.17.0", "v1.16.2"])]);
        let repositories =
            BTreeMap::from([("solana".to_string(), "solana-labs/solana".to_string())]);

        let output = collect_repository_tags(&source, &repositories, 10).await;

        assert_eq!(output.observations.len(), 2);
        assert!(output.observations.contains(&Observation::RepositoryTag {
            repository: "solana".into(),
            tag: "v1.17.0".into(),
        }));
        assert_eq!(output.reports, [ItemReport::collected("solana", 2)]);
        assert_eq!(*source.seen_limit.lock().unwrap(), Some(10));
    }

    #[tokio::test]
    async fn prerelease_tags_pass_through_verbatim() {
        let source = mock(&[("org/repo", &["v2.0.0-rc.1", "weird tag name"])]);
        let repositories = BTreeMap::from([("repo".to_string(), "org/repo".to_string())]);

        let output = collect_repository_tags(&source, &repositories, 10).await;

        let tags: Vec<&str> = output
            .observations
            .iter()
            .map(|o| match o {
                Observation::RepositoryTag { tag, .. } => tag.as_str(),
                other => panic!("unexpected observation: {other:?}"),
            })
            .collect();
        assert_eq!(tags, ["v2.0.0-rc.1", "weird tag name"]);
    }

    #[tokio::test]
    async fn one_failing_repository_does_not_block_the_rest() {
        let source = mock(&[("org/ok", &["v1.0.0"])]);
        let repositories = BTreeMap::from([
            ("broken".to_string(), "org/broken".to_string()),
            ("ok".to_string(), "org/ok".to_string()),
        ]);

        let output = collect_repository_tags(&source, &repositories, 10).await;

        assert_eq!(output.observations.len(), 1);
        assert!(matches!(output.reports[0].status, ItemStatus::Failed(_)));
        assert_eq!(output.reports[1], ItemReport::collected("ok", 1));
    }
}
