use crate::{channel::ChannelForwardingTag, domain::MessageRef};

/// Outgoing payload: plain text, or an image with a caption.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutgoingMessage {
    Text(String),
    Image { bytes: Vec<u8>, caption: String },
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Text body of the message (the caption for images).
    pub fn body(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Image { caption, .. } => caption,
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Self::Image { .. })
    }
}

/// Per-send options: the quoted message and the context metadata merged into
/// the outgoing payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendOptions {
    pub quoted: Option<MessageRef>,
    pub context: Option<&'static ChannelForwardingTag>,
}

impl SendOptions {
    /// Reply to `trigger`, tagged with the given forwarding context.
    pub fn reply_to(trigger: MessageRef, context: &'static ChannelForwardingTag) -> Self {
        Self {
            quoted: Some(trigger),
            context: Some(context),
        }
    }
}

/// Limits of a messenger implementation, in the transport's own length unit.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub max_message_len: usize,
    pub max_caption_len: usize,
}
