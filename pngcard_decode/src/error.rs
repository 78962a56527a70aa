use thiserror::Error;

/// Why a payload could not be turned into a card.
#[derive(Debug, Error)]
pub enum DecodeFailure {
    #[error("payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("decoded bytes match none of the configured text encodings")]
    Encoding,

    #[error("decoded text holds no JSON value")]
    Empty,

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecoverable trailing data at byte {offset}")]
    TrailingData { offset: usize },

    #[error("expected a JSON object, found {0}")]
    NotAnObject(&'static str),
}

impl DecodeFailure {
    /// Pipeline stage that failed, for diagnostics.
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::InvalidBase64(_) => "base64",
            Self::Encoding => "text",
            Self::Empty | Self::Json(_) | Self::TrailingData { .. } => "json",
            Self::NotAnObject(_) => "shape",
        }
    }
}
