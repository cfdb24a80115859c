//! Report composition: turns a repository summary plus whichever enrichment
//! facts were fetched into the chat text.
//!
//! Everything here is pure; fetching and fault isolation live in
//! [`crate::github::command`].

use chrono::{DateTime, FixedOffset, Utc};
use rand::Rng;

use crate::{
    formatting::{format_size_mb, format_timestamp, relative_time},
    github::models::{CommitEntry, Contributor, LanguageBytes, Release, RepositorySummary, Tag},
};

const TITLE: &str = "*乂  Knight Bot MD  乂*";
const DEVELOPER: &str = "Navida Wijesuriya";
const FEATURES: &str = "Auto-Reply, Group Tools, Fun Commands";
const STATUS: &str = "🚀 Live and Improving";
const BOT_NAME: &str = "KnightBot MD";
const COMMAND_HINTS: &str = ".tagall | .tts | .sticker | .welcome";

const MAX_LANGUAGES: usize = 4;
const MAX_TOPICS: usize = 6;

/// Community mood lines; one is picked per report.
pub const MOODS: [&str; 4] = [
    "🌟 Open to contributors",
    "🔥 Active development",
    "🤝 Welcomes PRs & ideas",
    "✨ Community-driven",
];

/// Uniform pick among [`MOODS`].
pub fn pick_mood<R: Rng>(rng: &mut R) -> &'static str {
    MOODS[rng.random_range(0..MOODS.len())]
}

/// Latest commit, reduced to what the report shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommitFact {
    pub message: String,
    pub author: String,
    pub date: Option<DateTime<Utc>>,
}

impl CommitFact {
    pub fn from_entry(entry: &CommitEntry) -> Self {
        let detail = entry.commit.as_ref();

        let message = detail
            .and_then(|c| c.message.as_deref())
            .and_then(|m| m.lines().next())
            .filter(|first| !first.is_empty())
            .unwrap_or("No message")
            .to_string();

        let signature = detail.and_then(|c| c.author.as_ref());
        let author = signature
            .and_then(|a| a.name.clone())
            .filter(|n| !n.is_empty())
            .or_else(|| entry.author.as_ref().map(|a| a.login.clone()))
            .unwrap_or_else(|| "Unknown".to_string());

        Self {
            message,
            author,
            date: signature.and_then(|a| a.date),
        }
    }
}

/// Latest release, or the most recent tag when no release could be fetched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReleaseLabel {
    Release { tag: String, name: Option<String> },
    Tag(String),
}

impl ReleaseLabel {
    /// `None` when the release carries no tag name.
    pub fn from_release(release: &Release) -> Option<Self> {
        let tag = release.tag_name.clone().filter(|t| !t.is_empty())?;
        Some(Self::Release {
            tag,
            name: release.name.clone(),
        })
    }

    pub fn from_tags(tags: &[Tag]) -> Option<Self> {
        tags.first().map(|t| Self::Tag(t.name.clone()))
    }

    fn line(&self) -> String {
        match self {
            Self::Release { tag, name } => {
                let name = name.as_deref().unwrap_or("");
                format!("🏷️ Latest release: {tag} — {name}")
                    .trim_end()
                    .to_string()
            }
            Self::Tag(tag) => format!("🏷️ Latest tag: {tag}"),
        }
    }
}

/// Best-effort enrichment gathered after the primary fetch. Each field is
/// independently present or absent.
#[derive(Clone, Debug, Default)]
pub struct SecondaryFacts {
    pub latest_commit: Option<CommitFact>,
    pub languages: Option<LanguageBytes>,
    /// Zero when the listing failed or was not an array.
    pub open_pulls: usize,
    pub release: Option<ReleaseLabel>,
    /// Used only when the primary response has no topics.
    pub fallback_topics: Vec<String>,
    pub top_level_items: Option<usize>,
    pub contributors: Vec<Contributor>,
}

/// Per-invocation inputs that are not fetched.
#[derive(Clone, Copy, Debug)]
pub struct ReportContext {
    pub now: DateTime<Utc>,
    pub utc_offset: FixedOffset,
    pub mood: &'static str,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LanguageShare {
    pub name: String,
    pub percent: u32,
}

/// Top languages by byte count with their share of the whole repository.
///
/// Shares are computed against every language (not only the ones shown) and
/// rounded to the nearest integer; if rounding pushes the shown total above
/// 100, the most rounded-up entries give the excess back.
pub fn language_breakdown(langs: &LanguageBytes) -> Vec<LanguageShare> {
    let total: u64 = langs.values().sum();
    let divisor = total.max(1) as f64;

    let mut ranked: Vec<(&String, u64)> = langs.iter().map(|(n, b)| (n, *b)).collect();
    // Stable: equal byte counts keep name order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(MAX_LANGUAGES);

    let mut shares: Vec<(LanguageShare, f64)> = ranked
        .into_iter()
        .map(|(name, bytes)| {
            let exact = bytes as f64 / divisor * 100.0;
            let share = LanguageShare {
                name: name.clone(),
                percent: exact.round() as u32,
            };
            (share, exact)
        })
        .collect();

    let mut shown: u32 = shares.iter().map(|(s, _)| s.percent).sum();
    while shown > 100 {
        let most_rounded_up = shares
            .iter_mut()
            .filter(|(s, _)| s.percent > 0)
            .max_by(|a, b| {
                let over_a = a.0.percent as f64 - a.1;
                let over_b = b.0.percent as f64 - b.1;
                over_a.total_cmp(&over_b)
            });
        let Some((share, _)) = most_rounded_up else {
            break;
        };
        share.percent -= 1;
        shown -= 1;
    }

    shares.into_iter().map(|(s, _)| s).collect()
}

/// Shields.io badge URLs for the repository.
pub fn badge_urls(full_name: &str) -> [String; 3] {
    [
        format!("https://img.shields.io/github/v/release/{full_name}?style=for-the-badge"),
        format!("https://img.shields.io/github/license/{full_name}?style=for-the-badge"),
        format!("https://img.shields.io/github/commit-activity/y/{full_name}?style=for-the-badge"),
    ]
}

/// Compose the report text. Section order is fixed.
pub fn render_report(
    repo: &RepositorySummary,
    facts: &SecondaryFacts,
    ctx: &ReportContext,
) -> String {
    let mut out = String::new();

    let updated = repo
        .updated_at
        .map(|ts| format_timestamp(ts, ctx.utc_offset))
        .unwrap_or_else(|| "unknown".to_string());

    out.push_str(&format!("{TITLE}\n\n"));
    out.push_str(&format!("✩ *Name*: {}\n", repo.name));
    out.push_str(&format!("✩ *Size*: {}\n", format_size_mb(repo.size)));
    out.push_str(&format!("✩ *Last Updated*: {updated}\n"));
    out.push_str(&format!("✩ *URL*: {}\n", repo.html_url));
    out.push_str(&format!("✩ *Developer*: {DEVELOPER}\n"));
    out.push_str(&format!("✩ *Features*: {FEATURES}\n"));
    out.push_str(&format!("✩ *Status*: {STATUS}\n\n"));
    out.push_str(&format!("💥 *{BOT_NAME}*\n\n✨ *Extra Info* ✨\n"));

    if let Some(commit) = &facts.latest_commit {
        let age = commit
            .date
            .map(|d| relative_time(d, ctx.now))
            .unwrap_or_else(|| "unknown time".to_string());
        out.push_str(&format!(
            "🔧 Latest commit: \"{}\" — {} ({age})\n",
            commit.message, commit.author
        ));
    }

    if let Some(langs) = &facts.languages {
        let shares = language_breakdown(langs);
        if !shares.is_empty() {
            let joined = shares
                .iter()
                .map(|s| format!("{} {}%", s.name, s.percent))
                .collect::<Vec<_>>()
                .join(" • ");
            out.push_str(&format!("🧩 Languages: {joined}\n"));
        }
    }

    out.push_str(&format!("🔁 Open PRs: {}\n", facts.open_pulls));

    if let Some(release) = &facts.release {
        out.push_str(&release.line());
        out.push('\n');
    }

    let topics = if repo.topics.is_empty() {
        &facts.fallback_topics
    } else {
        &repo.topics
    };
    if !topics.is_empty() {
        let shown = topics
            .iter()
            .take(MAX_TOPICS)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" · ");
        out.push_str(&format!("🏷️ Topics: {shown}\n"));
    }

    if let Some(count) = facts.top_level_items {
        out.push_str(&format!("📁 Top-level items: {count} (files & folders)\n"));
    }

    out.push_str(&format!(
        "\n💡 Quick Tip: Clone → `git clone {}.git`\n",
        repo.html_url
    ));
    out.push_str(&format!("🚀 Try commands: {COMMAND_HINTS}\n"));

    out.push_str(&format!("\n🔔 Community: {}\n", ctx.mood));

    out.push_str("\n🔗 Badges:\n");
    for url in badge_urls(&repo.full_name) {
        out.push_str(&url);
        out.push('\n');
    }

    if !facts.contributors.is_empty() {
        out.push_str("\n👥 Top Contributors:\n");
        for (i, c) in facts.contributors.iter().enumerate() {
            out.push_str(&format!("{}. {} — {} contribs\n", i + 1, c.login, c.contributions));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::TimeZone;

    use super::*;
    use crate::github::models::{Account, CommitDetail, GitSignature, Owner};

    fn repo() -> RepositorySummary {
        RepositorySummary {
            name: "Knightbot-MD".to_string(),
            full_name: "wijesuriya2017/Knightbot-MD".to_string(),
            html_url: "https://github.com/wijesuriya2017/Knightbot-MD".to_string(),
            size: 2048,
            updated_at: Some(Utc.with_ymd_and_hms(2025, 5, 30, 8, 15, 0).unwrap()),
            owner: Owner {
                login: "wijesuriya2017".to_string(),
                avatar_url: None,
            },
            topics: vec![],
        }
    }

    fn ctx() -> ReportContext {
        ReportContext {
            now: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            utc_offset: FixedOffset::east_opt(0).unwrap(),
            mood: MOODS[1],
        }
    }

    fn langs(pairs: &[(&str, u64)]) -> LanguageBytes {
        pairs.iter().map(|(n, b)| (n.to_string(), *b)).collect()
    }

    fn full_facts() -> SecondaryFacts {
        SecondaryFacts {
            latest_commit: Some(CommitFact {
                message: "fix: welcome message".to_string(),
                author: "Navida".to_string(),
                date: Some(Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap()),
            }),
            languages: Some(langs(&[("JavaScript", 900), ("HTML", 100)])),
            open_pulls: 3,
            release: Some(ReleaseLabel::Release {
                tag: "v2.1.0".to_string(),
                name: Some("Summer".to_string()),
            }),
            fallback_topics: vec!["whatsapp-bot".to_string()],
            top_level_items: Some(12),
            contributors: vec![
                Contributor {
                    login: "alice".to_string(),
                    contributions: 120,
                },
                Contributor {
                    login: "bob".to_string(),
                    contributions: 7,
                },
            ],
        }
    }

    #[test]
    fn header_block_and_size() {
        let text = render_report(&repo(), &SecondaryFacts::default(), &ctx());
        assert!(text.starts_with("*乂  Knight Bot MD  乂*\n\n✩ *Name*: Knightbot-MD\n"));
        assert!(text.contains("✩ *Size*: 2.00 MB\n"));
        assert!(text.contains("✩ *Last Updated*: 30/05/25 - 08:15:00\n"));
        assert!(text.contains("✩ *URL*: https://github.com/wijesuriya2017/Knightbot-MD\n"));
        assert!(text.contains("✩ *Status*: 🚀 Live and Improving\n\n💥 *KnightBot MD*\n"));
    }

    #[test]
    fn no_enrichment_renders_only_fixed_sections() {
        let text = render_report(&repo(), &SecondaryFacts::default(), &ctx());

        for absent in [
            "Latest commit",
            "Languages",
            "Latest release",
            "Latest tag",
            "Topics",
            "Top-level items",
            "Top Contributors",
        ] {
            assert!(!text.contains(absent), "unexpected {absent}");
        }
        assert!(text.contains("🔁 Open PRs: 0\n"));
        assert!(text.contains(
            "💡 Quick Tip: Clone → `git clone https://github.com/wijesuriya2017/Knightbot-MD.git`\n"
        ));
        assert!(text.contains("🚀 Try commands: .tagall | .tts | .sticker | .welcome\n"));
        assert_eq!(text.matches("🔔 Community: ").count(), 1);
        assert_eq!(text.matches("https://img.shields.io/github/").count(), 3);
        assert!(text.ends_with("commit-activity/y/wijesuriya2017/Knightbot-MD?style=for-the-badge\n"));
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let text = render_report(&repo(), &full_facts(), &ctx());
        let markers = [
            "✩ *Name*",
            "✨ *Extra Info* ✨",
            "🔧 Latest commit: \"fix: welcome message\" — Navida (3 hours ago)",
            "🧩 Languages: JavaScript 90% • HTML 10%",
            "🔁 Open PRs: 3",
            "🏷️ Latest release: v2.1.0 — Summer",
            "🏷️ Topics: whatsapp-bot",
            "📁 Top-level items: 12 (files & folders)",
            "💡 Quick Tip",
            "🔔 Community: 🔥 Active development",
            "🔗 Badges:",
            "👥 Top Contributors:\n1. alice — 120 contribs\n2. bob — 7 contribs\n",
        ];

        let mut last = 0;
        for marker in markers {
            let idx = text
                .find(marker)
                .unwrap_or_else(|| panic!("missing {marker:?} in\n{text}"));
            assert!(idx >= last, "{marker:?} out of order");
            last = idx;
        }
    }

    #[test]
    fn primary_topics_win_over_fallback() {
        let mut r = repo();
        r.topics = (1..=8).map(|i| format!("t{i}")).collect();
        let text = render_report(&r, &full_facts(), &ctx());
        assert!(text.contains("🏷️ Topics: t1 · t2 · t3 · t4 · t5 · t6\n"));
        assert!(!text.contains("whatsapp-bot"));
    }

    #[test]
    fn release_line_variants() {
        let bare = ReleaseLabel::Release {
            tag: "v1".to_string(),
            name: None,
        };
        assert_eq!(bare.line(), "🏷️ Latest release: v1 —");
        assert_eq!(
            ReleaseLabel::Tag("v0.9".to_string()).line(),
            "🏷️ Latest tag: v0.9"
        );

        let untagged = Release {
            tag_name: None,
            name: Some("nightly".to_string()),
        };
        assert_eq!(ReleaseLabel::from_release(&untagged), None);
        assert_eq!(ReleaseLabel::from_tags(&[]), None);
    }

    #[test]
    fn languages_use_whole_total_and_top_four() {
        let shares = language_breakdown(&langs(&[
            ("A", 400),
            ("B", 300),
            ("C", 150),
            ("D", 100),
            ("E", 50),
        ]));
        let got: Vec<(&str, u32)> = shares.iter().map(|s| (s.name.as_str(), s.percent)).collect();
        assert_eq!(got, vec![("A", 40), ("B", 30), ("C", 15), ("D", 10)]);
    }

    #[test]
    fn language_percentages_never_exceed_100() {
        // 50.5 / 49.5 would round to 51 + 50.
        let shares = language_breakdown(&langs(&[("Rust", 505), ("Shell", 495)]));
        let total: u32 = shares.iter().map(|s| s.percent).sum();
        assert!(total <= 100, "{shares:?}");
        assert_eq!(shares[0].name, "Rust");

        let thirds = language_breakdown(&langs(&[("A", 1), ("B", 1), ("C", 1)]));
        assert!(thirds.iter().all(|s| s.percent == 33));
    }

    #[test]
    fn empty_language_map_renders_no_line() {
        let facts = SecondaryFacts {
            languages: Some(LanguageBytes::new()),
            ..SecondaryFacts::default()
        };
        let text = render_report(&repo(), &facts, &ctx());
        assert!(!text.contains("Languages"));
    }

    #[test]
    fn commit_fact_fallbacks() {
        let entry = CommitEntry {
            commit: Some(CommitDetail {
                message: Some("first line\n\nbody".to_string()),
                author: None,
            }),
            author: Some(Account {
                login: "octocat".to_string(),
            }),
        };
        let fact = CommitFact::from_entry(&entry);
        assert_eq!(fact.message, "first line");
        assert_eq!(fact.author, "octocat");
        assert_eq!(fact.date, None);

        let empty = CommitEntry {
            commit: Some(CommitDetail {
                message: Some(String::new()),
                author: Some(GitSignature {
                    name: Some("Navida".to_string()),
                    date: None,
                }),
            }),
            author: None,
        };
        let fact = CommitFact::from_entry(&empty);
        assert_eq!(fact.message, "No message");
        assert_eq!(fact.author, "Navida");

        let bare = CommitFact::from_entry(&CommitEntry {
            commit: None,
            author: None,
        });
        assert_eq!(bare.author, "Unknown");

        let facts = SecondaryFacts {
            latest_commit: Some(bare),
            ..SecondaryFacts::default()
        };
        let text = render_report(&repo(), &facts, &ctx());
        assert!(text.contains("🔧 Latest commit: \"No message\" — Unknown (unknown time)\n"));
    }

    #[test]
    fn mood_sampling_covers_all_four() {
        let mut rng = rand::rng();
        let seen: HashSet<&str> = (0..1_000).map(|_| pick_mood(&mut rng)).collect();
        assert_eq!(seen.len(), MOODS.len());
        assert!(seen.iter().all(|m| MOODS.contains(m)));
    }
}
