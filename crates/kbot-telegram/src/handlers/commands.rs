use std::sync::Arc;

use teloxide::prelude::*;
use tracing::{debug, warn};

use kbot_core::{
    channel::CHANNEL_INFO,
    domain::{ChatId, MessageId, MessageRef},
    messaging::{
        port::MessagingPort,
        types::{OutgoingMessage, SendOptions},
    },
};

use crate::router::AppState;

/// Names that trigger the repository report.
const REPO_COMMANDS: [&str; 5] = ["github", "git", "repo", "sc", "script"];

/// Split `/cmd@botname args` or `.cmd args` into a lowercase command name and
/// the remaining arguments. `None` when the text is not a command.
pub(crate) fn parse_command(text: &str) -> Option<(String, String)> {
    let text = text.trim();
    let body = text
        .strip_prefix('/')
        .or_else(|| text.strip_prefix('.'))?;

    let mut parts = body.splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("").trim();
    let rest = parts.next().unwrap_or("").trim().to_string();

    let cmd = first.split('@').next().unwrap_or("").to_lowercase();
    if cmd.is_empty() {
        return None;
    }

    Some((cmd, rest))
}

fn help_text(repository: &str) -> String {
    format!(
        "🤖 KnightBot MD\n\n\
Commands:\n\
/github - Info about {repository} ({})\n\
/help - Show this help message",
        REPO_COMMANDS
            .iter()
            .map(|c| format!(".{c}"))
            .collect::<Vec<_>>()
            .join(", ")
    )
}

/// Reply to `trigger` with the help text, tagged like every other outgoing message.
async fn send_help(
    messenger: &dyn MessagingPort,
    chat_id: ChatId,
    trigger: MessageRef,
    repository: &str,
) {
    let help = OutgoingMessage::text(help_text(repository));
    let options = SendOptions::reply_to(trigger, &CHANNEL_INFO);
    if let Err(e) = messenger.send_message(chat_id, help, options).await {
        warn!(chat_id = chat_id.0, error = %e, "failed to send help");
    }
}

pub async fn handle_command(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some((cmd, _args)) = parse_command(text) else {
        return Ok(());
    };

    let chat_id = ChatId(msg.chat.id.0);
    let trigger = MessageRef {
        chat_id,
        message_id: MessageId(msg.id.0),
    };

    match cmd.as_str() {
        c if REPO_COMMANDS.contains(&c) => {
            state
                .repo_report
                .run(state.messenger.as_ref(), chat_id, trigger)
                .await;
        }
        "start" | "help" => {
            send_help(
                state.messenger.as_ref(),
                chat_id,
                trigger,
                &state.cfg.github_repository,
            )
            .await;
        }
        other => debug!(command = other, "ignoring unknown command"),
    }

    Ok(())
}
