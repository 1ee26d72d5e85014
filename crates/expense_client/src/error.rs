use thiserror::Error;

/// Failure of a Store call. The `Display` text is what a view shows the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Erreur {status}")]
    Status { status: u16, detail: Option<String> },
    #[error("Erreur réseau: {0}")]
    Transport(String),
    #[error("Réponse invalide du serveur: {0}")]
    Decode(String),
    #[error("{0}")]
    Message(String),
}

impl StoreError {
    pub fn status(status: u16) -> Self {
        Self::Status {
            status,
            detail: None,
        }
    }

    pub fn message(message: impl Into<String>) -> Self {
        Self::Message(message.into())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            Self::status(status.as_u16())
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// A raw bill date that could not be read as a calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("invalid bill date {raw:?}")]
    InvalidDate { raw: String },
}

#[derive(Debug, Error)]
pub enum NewBillError {
    #[error("unsupported receipt extension for {file_name:?}; expected jpg, jpeg or png")]
    UnsupportedExtension { file_name: String },
    #[error("failed to encode bill payload: {0}")]
    Encode(#[from] serde_json::Error),
}
