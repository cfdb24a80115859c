//! Subset of GitHub REST API payloads used by the report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// `GET /repos/{owner}/{repo}`.
#[derive(Clone, Debug, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub full_name: String,
    pub html_url: String,
    /// Kilobytes.
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    pub owner: Owner,
    #[serde(default)]
    pub topics: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Owner {
    pub login: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Only the topics of a repository (the accept-header refetch).
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RepositoryTopics {
    #[serde(default)]
    pub topics: Vec<String>,
}

/// Element of `GET /repos/{owner}/{repo}/commits`.
#[derive(Clone, Debug, Deserialize)]
pub struct CommitEntry {
    #[serde(default)]
    pub commit: Option<CommitDetail>,
    #[serde(default)]
    pub author: Option<Account>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CommitDetail {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<GitSignature>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GitSignature {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Account {
    pub login: String,
}

/// `GET /repos/{owner}/{repo}/languages`: language name to byte count.
pub type LanguageBytes = BTreeMap<String, u64>;

/// `GET /repos/{owner}/{repo}/releases/latest`.
#[derive(Clone, Debug, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub tag_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Element of `GET /repos/{owner}/{repo}/tags`.
#[derive(Clone, Debug, Deserialize)]
pub struct Tag {
    pub name: String,
}

/// Element of `GET /repos/{owner}/{repo}/contributors`.
#[derive(Clone, Debug, Deserialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub contributions: u64,
}
