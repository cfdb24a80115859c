use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::de::DeserializeOwned;

use crate::{
    errors::Error,
    github::models::{
        CommitEntry, Contributor, LanguageBytes, Release, RepositorySummary, RepositoryTopics, Tag,
    },
    Result,
};

pub const GITHUB_JSON: &str = "application/vnd.github+json";

#[derive(Clone, Debug)]
pub struct GithubClientConfig {
    pub api_base: String,
    pub user_agent: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

/// Thin unauthenticated client for the handful of GitHub REST endpoints the
/// report needs. One call, one request: no retries, no caching.
#[derive(Clone, Debug)]
pub struct GithubClient {
    api_base: String,
    http: reqwest::Client,
}

impl GithubClient {
    pub fn new(cfg: GithubClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(cfg.timeout)
            .user_agent(cfg.user_agent)
            .build()
            .map_err(|e| Error::External(format!("http client build error: {e}")))?;

        Ok(Self {
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub async fn repository(&self, full_name: &str) -> Result<RepositorySummary> {
        self.get_json(&format!("repos/{full_name}"), &[], None).await
    }

    /// Repository metadata requested with the explicit GitHub JSON media type.
    pub async fn repository_topics(&self, full_name: &str) -> Result<RepositoryTopics> {
        self.get_json(&format!("repos/{full_name}"), &[], Some(GITHUB_JSON))
            .await
    }

    pub async fn latest_commits(&self, full_name: &str) -> Result<Vec<CommitEntry>> {
        self.get_json(
            &format!("repos/{full_name}/commits"),
            &[("per_page", "1")],
            None,
        )
        .await
    }

    pub async fn languages(&self, full_name: &str) -> Result<LanguageBytes> {
        self.get_json(&format!("repos/{full_name}/languages"), &[], None)
            .await
    }

    /// Raw body of the open pull request listing (first 100).
    pub async fn open_pulls(&self, full_name: &str) -> Result<serde_json::Value> {
        self.get_json(
            &format!("repos/{full_name}/pulls"),
            &[("state", "open"), ("per_page", "100")],
            None,
        )
        .await
    }

    pub async fn latest_release(&self, full_name: &str) -> Result<Release> {
        self.get_json(&format!("repos/{full_name}/releases/latest"), &[], None)
            .await
    }

    pub async fn latest_tags(&self, full_name: &str) -> Result<Vec<Tag>> {
        self.get_json(&format!("repos/{full_name}/tags"), &[("per_page", "1")], None)
            .await
    }

    /// Raw body of the root directory listing.
    pub async fn root_contents(&self, full_name: &str) -> Result<serde_json::Value> {
        self.get_json(&format!("repos/{full_name}/contents"), &[], None)
            .await
    }

    pub async fn top_contributors(&self, full_name: &str) -> Result<Vec<Contributor>> {
        self.get_json(
            &format!("repos/{full_name}/contributors"),
            &[("per_page", "3")],
            None,
        )
        .await
    }

    /// Download an arbitrary absolute URL (avatars). Non-success is an error.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::External(format!("github request error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::External(format!("github body error: {e}")))?;
        Ok(bytes.to_vec())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        accept: Option<&str>,
    ) -> Result<T> {
        let url = format!("{}/{path}", self.api_base);

        let mut req = self.http.get(&url).query(query);
        if let Some(accept) = accept {
            req = req.header(ACCEPT, accept);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| Error::External(format!("github request error: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Http {
                url,
                status: status.as_u16(),
            });
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::External(format!("github body error: {e}")))?;
        Ok(serde_json::from_slice(&body)?)
    }
}
