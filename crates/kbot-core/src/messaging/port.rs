use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{MessagingCapabilities, OutgoingMessage, SendOptions},
    Result,
};

/// Cross-messenger port.
///
/// Commands only ever talk to the chat through this trait; the transport and
/// its plumbing stay in adapter crates.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    async fn send_message(
        &self,
        chat_id: ChatId,
        message: OutgoingMessage,
        options: SendOptions,
    ) -> Result<MessageRef>;
}
