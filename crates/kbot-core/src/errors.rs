/// Core error type for the bot.
///
/// Adapter crates map their specific errors into this type so the command
/// layer can decide what is fatal (user-facing message) and what is degraded.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("http {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
