//! Telegram adapter (teloxide).
//!
//! This crate implements the `kbot-core` MessagingPort over Telegram Bot API.

use async_trait::async_trait;

use teloxide::{prelude::*, types::InputFile};

use tokio::time::sleep;
use tracing::debug;

pub mod handlers;
pub mod router;

use kbot_core::{
    domain::{ChatId, MessageId, MessageRef},
    errors::Error,
    messaging::{
        port::MessagingPort,
        types::{MessagingCapabilities, OutgoingMessage, SendOptions},
    },
    Result,
};

/// Telegram caps photo captions well below regular messages. Both limits are
/// in UTF-16 code units.
const MAX_CAPTION_LEN: usize = 1024;
const MAX_MESSAGE_LEN: usize = 4096;

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
}

impl TelegramMessenger {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    fn tg_chat(chat_id: ChatId) -> teloxide::types::ChatId {
        teloxide::types::ChatId(chat_id.0)
    }

    fn tg_msg_id(message_id: MessageId) -> teloxide::types::MessageId {
        teloxide::types::MessageId(message_id.0)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::External(format!("telegram error: {e}"))
    }

    async fn with_retry<T, Fut>(&self, mut op: impl FnMut() -> Fut) -> Result<T>
    where
        Fut: std::future::IntoFuture<Output = std::result::Result<T, teloxide::RequestError>>,
        Fut::IntoFuture: Send,
    {
        const MAX_RETRIES: usize = 1;
        let mut attempts = 0usize;
        loop {
            match op().await {
                Ok(v) => return Ok(v),
                Err(e) => match e {
                    teloxide::RequestError::RetryAfter(d) if attempts < MAX_RETRIES => {
                        attempts += 1;
                        sleep(d).await;
                        continue;
                    }
                    other => return Err(Self::map_err(other)),
                },
            }
        }
    }

    async fn send_text(
        &self,
        chat_id: ChatId,
        text: &str,
        quoted: Option<MessageRef>,
    ) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                let mut req = self
                    .bot
                    .send_message(Self::tg_chat(chat_id), text.to_string())
                    .allow_sending_without_reply(true);
                if let Some(q) = quoted {
                    req = req.reply_to_message_id(Self::tg_msg_id(q.message_id));
                }
                req
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }

    async fn send_photo(
        &self,
        chat_id: ChatId,
        bytes: &[u8],
        caption: Option<&str>,
        quoted: Option<MessageRef>,
    ) -> Result<MessageRef> {
        let msg = self
            .with_retry(|| {
                let mut req = self
                    .bot
                    .send_photo(
                        Self::tg_chat(chat_id),
                        InputFile::memory(bytes.to_vec()).file_name("repo.jpg"),
                    )
                    .allow_sending_without_reply(true);
                if let Some(c) = caption {
                    req = req.caption(c.to_string());
                }
                if let Some(q) = quoted {
                    req = req.reply_to_message_id(Self::tg_msg_id(q.message_id));
                }
                req
            })
            .await?;

        Ok(MessageRef {
            chat_id,
            message_id: MessageId(msg.id.0),
        })
    }
}

/// Length as Telegram counts it (UTF-16 code units).
fn telegram_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Cut `text` so it fits in `limit` UTF-16 units, ending with an ellipsis when
/// anything was dropped.
fn fit_to_limit(text: &str, limit: usize) -> String {
    if telegram_len(text) <= limit {
        return text.to_string();
    }

    let budget = limit.saturating_sub(1);
    let mut used = 0usize;
    let mut out = String::new();
    for ch in text.chars() {
        used += ch.len_utf16();
        if used > budget {
            break;
        }
        out.push(ch);
    }
    out.push('…');
    out
}

/// Prepend the forwarding banner: bots cannot mark their own messages as
/// forwarded from a channel.
fn decorate(body: &str, options: &SendOptions) -> String {
    match options.context.and_then(|c| c.banner()) {
        Some(banner) => format!("{banner}\n\n{body}"),
        None => body.to_string(),
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    fn capabilities(&self) -> MessagingCapabilities {
        MessagingCapabilities {
            max_message_len: MAX_MESSAGE_LEN,
            max_caption_len: MAX_CAPTION_LEN,
        }
    }

    async fn send_message(
        &self,
        chat_id: ChatId,
        message: OutgoingMessage,
        options: SendOptions,
    ) -> Result<MessageRef> {
        let caps = self.capabilities();
        let text = decorate(message.body(), &options);
        let len = telegram_len(&text);

        match message {
            OutgoingMessage::Image { bytes, .. } if len <= caps.max_caption_len => {
                self.send_photo(chat_id, &bytes, Some(&text), options.quoted)
                    .await
            }
            OutgoingMessage::Image { bytes, .. } => {
                debug!(
                    chat_id = chat_id.0,
                    len, "caption too long, sending photo and text separately"
                );
                let photo = self
                    .send_photo(chat_id, &bytes, None, options.quoted)
                    .await?;
                let text = fit_to_limit(&text, caps.max_message_len);
                self.send_text(chat_id, &text, Some(photo)).await
            }
            OutgoingMessage::Text(_) => {
                let text = fit_to_limit(&text, caps.max_message_len);
                self.send_text(chat_id, &text, options.quoted).await
            }
        }
    }
}
