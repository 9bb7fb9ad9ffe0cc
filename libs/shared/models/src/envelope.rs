use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::AppError;

/// Standard wrapper the backend puts around most payloads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    pub const STATUS_OK: &'static str = "OK";

    pub fn is_ok(&self) -> bool {
        self.status == Self::STATUS_OK
    }

    /// Unwraps `data`, failing closed when the status is not `OK` or the
    /// payload is missing.
    pub fn into_data(self) -> Result<T, AppError> {
        if !self.is_ok() {
            let reason = self
                .error_message
                .filter(|m| !m.is_empty())
                .or(self.message)
                .unwrap_or_else(|| format!("status {}", self.status));
            warn!("Backend answered with status {}: {}", self.status, reason);
            return Err(AppError::ExternalService(reason));
        }

        self.data
            .ok_or_else(|| AppError::Decode("envelope has no data".to_string()))
    }
}
