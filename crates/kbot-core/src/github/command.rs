//! The repository report command.
//!
//! One primary fetch gates the whole report. Everything after it is
//! best-effort: each request is turned into an `Option` on its own, so a
//! failing endpoint only drops its section.

use std::{future::Future, path::PathBuf};

use chrono::{FixedOffset, Utc};
use tracing::{debug, info, warn};

use crate::{
    channel::CHANNEL_INFO,
    domain::{ChatId, MessageRef},
    github::{
        client::GithubClient,
        models::RepositorySummary,
        report::{pick_mood, render_report, CommitFact, ReleaseLabel, ReportContext, SecondaryFacts},
    },
    messaging::{
        port::MessagingPort,
        types::{OutgoingMessage, SendOptions},
    },
    Result,
};

/// Sent in place of the report when the primary fetch fails.
pub const FETCH_ERROR_TEXT: &str = "❌ Error fetching repository information.";

#[derive(Clone, Debug)]
pub struct ReportSettings {
    /// `owner/name` of the repository to report on.
    pub repository: String,
    /// Bundled image sent with the report, when present.
    pub image_path: PathBuf,
    pub utc_offset: FixedOffset,
}

/// Image decided for one report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttachmentChoice {
    Bundled(Vec<u8>),
    Avatar(Vec<u8>),
    None,
}

impl AttachmentChoice {
    pub fn into_bytes(self) -> Option<Vec<u8>> {
        match self {
            Self::Bundled(bytes) | Self::Avatar(bytes) => Some(bytes),
            Self::None => None,
        }
    }
}

pub struct RepoReportBuilder {
    github: GithubClient,
    settings: ReportSettings,
}

impl RepoReportBuilder {
    pub fn new(github: GithubClient, settings: ReportSettings) -> Self {
        Self { github, settings }
    }

    /// Build the report and send it, quoting `trigger`. Sends exactly one
    /// message: the report, or [`FETCH_ERROR_TEXT`] if the repository itself
    /// could not be fetched.
    pub async fn run(&self, messenger: &dyn MessagingPort, chat_id: ChatId, trigger: MessageRef) {
        info!(repository = %self.settings.repository, chat_id = chat_id.0, "repo report requested");

        let message = match self.build().await {
            Ok(message) => message,
            Err(e) => {
                warn!(repository = %self.settings.repository, error = %e, "repository fetch failed");
                OutgoingMessage::text(FETCH_ERROR_TEXT)
            }
        };

        let options = SendOptions::reply_to(trigger, &CHANNEL_INFO);
        if let Err(e) = messenger.send_message(chat_id, message, options).await {
            warn!(chat_id = chat_id.0, error = %e, "failed to send repo report");
        }
    }

    /// Fetch and compose the report message. Fails only when the primary
    /// repository fetch fails.
    pub async fn build(&self) -> Result<OutgoingMessage> {
        let repo = self.github.repository(&self.settings.repository).await?;
        let facts = self.gather_facts(&repo).await;

        let ctx = ReportContext {
            now: Utc::now(),
            utc_offset: self.settings.utc_offset,
            mood: pick_mood(&mut rand::rng()),
        };
        let text = render_report(&repo, &facts, &ctx);

        Ok(match self.choose_attachment(&repo).await.into_bytes() {
            Some(bytes) => OutgoingMessage::Image {
                bytes,
                caption: text,
            },
            None => OutgoingMessage::Text(text),
        })
    }

    async fn gather_facts(&self, repo: &RepositorySummary) -> SecondaryFacts {
        let gh = &self.github;
        let full = repo.full_name.as_str();

        let (commits, languages, pulls, release, contents, topics) = tokio::join!(
            best_effort("commits", gh.latest_commits(full)),
            best_effort("languages", gh.languages(full)),
            best_effort("pulls", gh.open_pulls(full)),
            best_effort("release", gh.latest_release(full)),
            best_effort("contents", gh.root_contents(full)),
            best_effort("topics", gh.repository_topics(full)),
        );

        // A fetched release without a tag yields no line and no tag lookup.
        let release = match release {
            Some(release) => ReleaseLabel::from_release(&release),
            None => best_effort("tags", gh.latest_tags(full))
                .await
                .and_then(|tags| ReleaseLabel::from_tags(&tags)),
        };

        let contributors = best_effort("contributors", gh.top_contributors(full))
            .await
            .unwrap_or_default();

        SecondaryFacts {
            latest_commit: commits
                .as_deref()
                .and_then(<[_]>::first)
                .map(CommitFact::from_entry),
            languages,
            open_pulls: pulls.as_ref().map(array_len).unwrap_or(0),
            release,
            fallback_topics: topics.map(|t| t.topics).unwrap_or_default(),
            top_level_items: contents.as_ref().map(array_len),
            contributors,
        }
    }

    /// Bundled image first, owner avatar second, otherwise nothing.
    async fn choose_attachment(&self, repo: &RepositorySummary) -> AttachmentChoice {
        match tokio::fs::read(&self.settings.image_path).await {
            Ok(bytes) if !bytes.is_empty() => return AttachmentChoice::Bundled(bytes),
            Ok(_) => debug!(path = %self.settings.image_path.display(), "bundled image is empty"),
            Err(e) => {
                debug!(path = %self.settings.image_path.display(), error = %e, "bundled image unavailable")
            }
        }

        let Some(url) = repo.owner.avatar_url.as_deref() else {
            return AttachmentChoice::None;
        };
        match best_effort("avatar", self.github.download(url)).await {
            Some(bytes) if !bytes.is_empty() => AttachmentChoice::Avatar(bytes),
            _ => AttachmentChoice::None,
        }
    }
}

async fn best_effort<T>(section: &'static str, fut: impl Future<Output = Result<T>>) -> Option<T> {
    match fut.await {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(section, error = %e, "enrichment unavailable");
            None
        }
    }
}

fn array_len(v: &serde_json::Value) -> usize {
    v.as_array().map(Vec::len).unwrap_or(0)
}
