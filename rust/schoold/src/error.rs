//! Error taxonomy shared by the credential service, the color allocator and
//! the record store. Handlers map these onto response statuses; components
//! never build responses themselves.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    /// Same value for "no such user" and "wrong password".
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("select a workspace first")]
    NoWorkspace,

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn status(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 400,
            ServiceError::NoWorkspace => 400,
            ServiceError::Conflict(_) => 409,
            ServiceError::InvalidCredentials => 401,
            ServiceError::Configuration(_) => 500,
            ServiceError::Store(_) => 500,
            ServiceError::Internal(_) => 500,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "bad_params",
            ServiceError::NoWorkspace => "no_workspace",
            ServiceError::Conflict(_) => "conflict",
            ServiceError::InvalidCredentials => "invalid_credentials",
            ServiceError::Configuration(_) => "config_error",
            ServiceError::Store(_) => "internal",
            ServiceError::Internal(_) => "internal",
        }
    }

    /// Message safe to hand to a caller. Store and internal failures collapse
    /// to a generic text; their detail only goes to the log.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Store(_) | ServiceError::Internal(_) | ServiceError::Configuration(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn is_internal(&self) -> bool {
        self.status() >= 500
    }
}
