//! Cross-messenger abstractions (Telegram today; WhatsApp-style transports later).

pub mod port;
pub mod types;
