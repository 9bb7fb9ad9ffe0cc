use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Internal Server Error: {0}")]
    Internal(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),

    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

impl AppError {
    /// Maps a non-success HTTP status and its body to an error.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            400 => AppError::BadRequest(body.to_string()),
            401 | 403 => AppError::Auth(body.to_string()),
            404 => AppError::NotFound(body.to_string()),
            409 => AppError::Conflict(body.to_string()),
            500 => AppError::Internal(body.to_string()),
            _ => AppError::ExternalService(format!("({}) {}", status, body)),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, AppError::Auth(_))
    }

    /// The backend was never reached.
    pub fn is_transport(&self) -> bool {
        matches!(self, AppError::Transport(_))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Decode(err.to_string())
    }
}
