use thiserror::Error;

/// Generic message shown when a fetch fails without a backend explanation.
pub const GENERIC_FETCH_ERROR: &str = "Error al cargar las citas";

/// Errors returned by an appointment source.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The backend answered and reported a failure with a message.
    #[error("Backend reported an error: {0}")]
    Reported(String),
    /// The request did not complete (network, decoding, unexpected status).
    #[error("Transport failure: {0}")]
    Transport(String),
}

impl SourceError {
    /// Message suitable for the visible error state.
    ///
    /// Backend-reported messages are surfaced verbatim; anything else is
    /// reduced to a generic localized message.
    pub fn user_message(&self) -> String {
        match self {
            SourceError::Reported(message) => message.clone(),
            SourceError::Transport(_) => GENERIC_FETCH_ERROR.to_string(),
        }
    }
}

/// Result type for appointment source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
