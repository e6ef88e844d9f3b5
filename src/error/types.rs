use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Invalid file: {message}")]
    InvalidFile { message: String },

    #[error("No file selected")]
    MissingFile,

    #[error("Not logged in or session expired")]
    Unauthenticated,

    #[error("Request failed with status {status}: {detail}")]
    Remote { status: u16, detail: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    #[error("IO error: {message}")]
    Io { message: String },

    #[error("Form handlers are detached")]
    Detached,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ClientError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ClientError::InvalidFile { .. } => "INVALID_FILE",
            ClientError::MissingFile => "MISSING_FILE",
            ClientError::Unauthenticated => "UNAUTHENTICATED",
            ClientError::Remote { .. } => "REMOTE_FAILURE",
            ClientError::Transport { .. } => "TRANSPORT_ERROR",
            ClientError::Decode { .. } => "DECODE_ERROR",
            ClientError::Io { .. } => "IO_ERROR",
            ClientError::Detached => "DETACHED",
            ClientError::Internal { .. } => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure was caught locally, before any request was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::InvalidFile { .. }
                | ClientError::MissingFile
                | ClientError::Io { .. }
                | ClientError::Detached
        )
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ClientError::Decode {
                message: err.to_string(),
            }
        } else {
            ClientError::Transport {
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode {
            message: format!("JSON parsing error: {}", err),
        }
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        ClientError::Io {
            message: err.to_string(),
        }
    }
}

impl From<anyhow::Error> for ClientError {
    fn from(err: anyhow::Error) -> Self {
        ClientError::Internal {
            message: err.to_string(),
        }
    }
}

impl ClientError {
    pub fn invalid_file(message: impl Into<String>) -> Self {
        ClientError::InvalidFile {
            message: message.into(),
        }
    }

    pub fn remote(status: u16, detail: impl Into<String>) -> Self {
        ClientError::Remote {
            status,
            detail: detail.into(),
        }
    }
}
