//! Repository tag listing via the GitHub REST API.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::SourceError;
use crate::sources::RepositoryDataSource;

const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Lists repository tags through `GET /repos/{owner}/{repo}/tags`.
///
/// Works unauthenticated; a bearer token raises the rate limit and is taken
/// from config when present.
#[derive(Debug, Clone)]
pub struct GithubTagSource {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl GithubTagSource {
    pub fn new(token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: GITHUB_API.to_string(),
            token,
        }
    }

    /// Point at a different API root (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl RepositoryDataSource for GithubTagSource {
    async fn list_tags(&self, repository: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/repos/{}/tags", self.base_url, repository);

        // GitHub rejects requests without a User-Agent.
        let mut request = self
            .client
            .get(&url)
            .query(&[("per_page", limit.to_string())])
            .header(reqwest::header::USER_AGENT, "chainwatch")
            .header(reqwest::header::ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(SourceError::Api(format!(
                "tag listing for {repository} returned {status}: {body}"
            )));
        }

        let tags: Vec<TagEntry> = response.json().await?;
        tracing::debug!(repository, count = tags.len(), "fetched repository tags");
        Ok(tags.into_iter().map(|tag| tag.name).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_entries_deserialize_from_api_shape() {
        let body = r#"[
            {"name": "v1.17.0", "commit": {"sha": "abc", "url": "https://x"}, "node_id": "n1"},
            {"name": "v1.16.2-rc1", "commit": {"sha": "def", "url": "https://y"}, "node_id": "n2"}
        ]"#;
        let tags: Vec<TagEntry> = serde_json::from_str(body).unwrap();
        let names: Vec<String> = tags.into_iter().map(|t| t.name).collect();
        assert_eq!(names, ["v1.17.0", "v1.16.2-rc1"]);
    }
}
