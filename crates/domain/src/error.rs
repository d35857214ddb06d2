/// Shared error type used across all AlgoScales crates.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("IO: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid problem {path}: {message}")]
    InvalidFormat { path: String, message: String },

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("timed out: {0}")]
    Timeout(String),

    #[error("cancelled")]
    Cancelled,

    #[error("no entry point found (tried {0})")]
    EntryPointMissing(String),

    #[error("not permitted in {0} mode")]
    ModeForbidden(String),

    #[error("session already finished")]
    SessionEnded,

    #[error("busy: {0}")]
    Busy(String),

    #[error("no problem matches: {0}")]
    NoMatch(String),

    #[error("config: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
