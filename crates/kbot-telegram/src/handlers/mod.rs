//! Telegram update handlers.
//!
//! Each handler is a small adapter that turns a Telegram update into a call
//! on a `kbot-core` command; replies go through the messaging port.

use std::sync::Arc;

use teloxide::prelude::*;

use crate::router::AppState;

mod commands;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    match msg.text() {
        Some(text) if text.starts_with('/') || text.starts_with('.') => {
            commands::handle_command(msg, state).await
        }
        _ => Ok(()),
    }
}
