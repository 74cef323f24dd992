use thiserror::Error;

#[derive(Error, Debug)]
pub enum RsWikiError {
    #[error("HTTP exception in {request}: status {status}: {body}")]
    Http {
        request: String,
        status: u16,
        body: String,
    },

    #[error("Transport failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Transport has been closed")]
    TransportClosed,

    #[error("Missing required argument: {argument}")]
    MissingArgument { argument: String },

    #[error("Arguments conflict: {}", arguments.join(", "))]
    ConflictingArgument { arguments: Vec<String> },

    #[error("Unwrap failed: {message}")]
    Unwrap { message: String },

    #[error("Decode error: {message}")]
    Decode { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Argument,
    Decode,
    Usage,
    Configuration,
}

impl RsWikiError {
    pub fn missing(argument: impl Into<String>) -> Self {
        Self::MissingArgument {
            argument: argument.into(),
        }
    }

    pub fn conflicting<I, S>(arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::ConflictingArgument {
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Http { .. } | Self::Transport(_) | Self::TransportClosed => {
                ErrorCategory::Transport
            }
            Self::MissingArgument { .. } | Self::ConflictingArgument { .. } => {
                ErrorCategory::Argument
            }
            Self::Decode { .. } | Self::Serialization(_) => ErrorCategory::Decode,
            Self::Unwrap { .. } => ErrorCategory::Usage,
            Self::Config { .. }
            | Self::InvalidConfigValue { .. }
            | Self::Io(_)
            | Self::Toml(_) => ErrorCategory::Configuration,
        }
    }
}

pub type Result<T> = std::result::Result<T, RsWikiError>;
