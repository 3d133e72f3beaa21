// ============================================================================
// ERRORS - Client error taxonomy
// ============================================================================
// Every operation returns AppResult. Errors are caught at the viewmodel
// boundary, turned into a visible message, and state is left as it was
// before the call.
// ============================================================================

/// Why an authenticated operation could not proceed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthFailure {
    /// No token in the session: the request was never sent.
    #[error("Authorization token is missing")]
    MissingToken,
    /// Token `exp` is in the past (client-side estimate). Tokens whose
    /// payload cannot be decoded count as expired.
    #[error("Session expired")]
    Expired,
    /// The server refused the token (HTTP 401).
    #[error("{0}")]
    Rejected(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("Sorry, this animal is currently out of stock.")]
    StockExhausted { animal_id: String },

    #[error("Authentication required: {0}")]
    Auth(AuthFailure),

    #[error("{message}")]
    Transport { status: Option<u16>, message: String },

    #[error("Unexpected response: {0}")]
    DataShape(String),

    #[error("{0} is already in progress")]
    InFlight(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    pub fn transport(status: Option<u16>, msg: impl Into<String>) -> Self {
        AppError::Transport {
            status,
            message: msg.into(),
        }
    }

    pub fn data_shape(msg: impl Into<String>) -> Self {
        AppError::DataShape(msg.into())
    }

    /// Text shown to the user. Shape errors are reported like transport
    /// failures.
    pub fn user_message(&self) -> String {
        match self {
            AppError::DataShape(_) => GENERIC_FAILURE.to_string(),
            AppError::Auth(failure) => failure.to_string(),
            other => other.to_string(),
        }
    }

    /// Network failures and 5xx responses may succeed if the user tries again.
    pub fn is_retryable(&self) -> bool {
        match self {
            AppError::Transport { status: None, .. } => true,
            AppError::Transport { status: Some(s), .. } => *s >= 500,
            _ => false,
        }
    }

    /// Errors that must end the session.
    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }

    /// True when the error was raised locally and nothing was sent.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            AppError::Validation(_)
                | AppError::StockExhausted { .. }
                | AppError::InFlight(_)
                | AppError::Auth(AuthFailure::MissingToken)
                | AppError::Auth(AuthFailure::Expired)
        )
    }
}

pub const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";
