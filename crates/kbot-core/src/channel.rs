//! Channel forwarding metadata attached to every outgoing message.

/// Newsletter (channel) the messages claim to be forwarded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewsletterInfo {
    pub jid: &'static str,
    pub name: &'static str,
    pub server_message_id: i64,
}

/// Context metadata that makes receiving clients render a message as
/// forwarded from a channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelForwardingTag {
    pub is_forwarded: bool,
    pub forwarding_score: u32,
    pub newsletter: NewsletterInfo,
}

/// The bot's official channel.
pub const CHANNEL_INFO: ChannelForwardingTag = ChannelForwardingTag {
    is_forwarded: true,
    forwarding_score: 999,
    newsletter: NewsletterInfo {
        jid: "120363421047540687@newsletter",
        name: "KnightBot MD",
        server_message_id: -1,
    },
};

impl ChannelForwardingTag {
    /// One-line banner for transports that cannot mark a message as forwarded.
    pub fn banner(&self) -> Option<String> {
        self.is_forwarded
            .then(|| format!("↪️ Forwarded from {}", self.newsletter.name))
    }
}
