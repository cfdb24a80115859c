use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use chrono::{FixedOffset, Offset, Utc};

use crate::{
    errors::Error,
    github::{client::GithubClientConfig, command::ReportSettings},
    Result,
};

pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_REPOSITORY: &str = "wijesuriya2017/Knightbot-MD";
pub const DEFAULT_BOT_IMAGE_PATH: &str = "assets/bot_image.jpg";
pub const DEFAULT_USER_AGENT: &str = "knightbot-md";

/// Typed configuration, loaded from the environment (and `.env`).
#[derive(Clone, Debug)]
pub struct Config {
    // Telegram
    pub telegram_bot_token: String,

    // GitHub
    pub github_api_base: String,
    pub github_repository: String,
    pub http_timeout: Duration,
    pub http_user_agent: String,

    // Report
    pub bot_image_path: PathBuf,
    pub report_utc_offset: FixedOffset,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let telegram_bot_token = env_str("TELEGRAM_BOT_TOKEN").unwrap_or_default();
        if telegram_bot_token.trim().is_empty() {
            return Err(Error::Config(
                "TELEGRAM_BOT_TOKEN environment variable is required".to_string(),
            ));
        }

        let github_api_base = env_str("GITHUB_API_BASE")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE.to_string());
        let github_repository = env_str("GITHUB_REPOSITORY")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_REPOSITORY.to_string());
        if !is_owner_repo(&github_repository) {
            return Err(Error::Config(format!(
                "GITHUB_REPOSITORY must look like owner/name, got {github_repository:?}"
            )));
        }

        let http_timeout = Duration::from_millis(env_u64("HTTP_TIMEOUT_MS").unwrap_or(8_000));
        let http_user_agent = env_str("HTTP_USER_AGENT")
            .and_then(non_empty)
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());

        let bot_image_path =
            env_path("BOT_IMAGE_PATH").unwrap_or_else(|| PathBuf::from(DEFAULT_BOT_IMAGE_PATH));

        let report_utc_offset = match env_str("REPORT_UTC_OFFSET").and_then(non_empty) {
            Some(raw) => parse_utc_offset(&raw).ok_or_else(|| {
                Error::Config(format!(
                    "REPORT_UTC_OFFSET must look like +05:30 or -03:00, got {raw:?}"
                ))
            })?,
            None => utc(),
        };

        Ok(Self {
            telegram_bot_token,
            github_api_base,
            github_repository,
            http_timeout,
            http_user_agent,
            bot_image_path,
            report_utc_offset,
        })
    }

    pub fn github_client_config(&self) -> GithubClientConfig {
        GithubClientConfig {
            api_base: self.github_api_base.clone(),
            user_agent: self.http_user_agent.clone(),
            timeout: self.http_timeout,
        }
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            repository: self.github_repository.clone(),
            image_path: self.bot_image_path.clone(),
            utc_offset: self.report_utc_offset,
        }
    }
}

/// Parse `+HH:MM`, `-HH:MM`, `+HHMM` or `Z` into a fixed offset.
pub fn parse_utc_offset(raw: &str) -> Option<FixedOffset> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("z") || raw.eq_ignore_ascii_case("utc") {
        return Some(utc());
    }

    let (sign, rest) = match raw.split_at_checked(1)? {
        ("+", rest) => (1, rest),
        ("-", rest) => (-1, rest),
        _ => return None,
    };
    let (hh, mm) = match rest.split_once(':') {
        Some((hh, mm)) => (hh, mm),
        None if rest.len() == 4 => rest.split_at_checked(2)?,
        None => return None,
    };
    let two_digits = |s: &str| s.len() == 2 && s.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hh) || !two_digits(mm) {
        return None;
    }

    let hours: i32 = hh.parse().ok()?;
    let minutes: i32 = mm.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn is_owner_repo(s: &str) -> bool {
    matches!(
        s.split_once('/'),
        Some((owner, name)) if !owner.is_empty() && !name.is_empty() && !name.contains('/')
    )
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_offsets() {
        assert_eq!(parse_utc_offset("+05:30").map(|o| o.local_minus_utc()), Some(19_800));
        assert_eq!(parse_utc_offset("-0300").map(|o| o.local_minus_utc()), Some(-10_800));
        assert_eq!(parse_utc_offset("Z").map(|o| o.local_minus_utc()), Some(0));
        assert_eq!(parse_utc_offset(" +00:00 ").map(|o| o.local_minus_utc()), Some(0));
    }

    #[test]
    fn rejects_malformed_offsets() {
        for raw in [
            "", "05:30", "+5:30", "+24:00", "+05:60", "+05", "abc", "+0a:00", "++5:00",
            // Non-ASCII inputs whose byte length looks like `HHMM`.
            "+aé0", "-éé",
        ] {
            assert!(parse_utc_offset(raw).is_none(), "accepted {raw:?}");
        }
    }

    #[test]
    fn owner_repo_shape() {
        assert!(is_owner_repo("wijesuriya2017/Knightbot-MD"));
        assert!(!is_owner_repo("Knightbot-MD"));
        assert!(!is_owner_repo("/Knightbot-MD"));
        assert!(!is_owner_repo("a/b/c"));
    }
}
