use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Which seven days the booking screens offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateWindowMode {
    /// Monday-start week containing today.
    Week,
    /// Today plus the next six days.
    Rolling,
}

impl DateWindowMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "week" => Some(Self::Week),
            "rolling" => Some(Self::Rolling),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub session_file: PathBuf,
    pub date_window_mode: DateWindowMode,
    pub session_ttl_hours: i64,
}

impl AppConfig {
    pub const DEFAULT_API_BASE_URL: &'static str = "http://localhost:8080";
    pub const DEFAULT_SESSION_FILE: &'static str = ".clinic-session.json";
    pub const DEFAULT_SESSION_TTL_HOURS: i64 = 12;

    pub fn from_env() -> Self {
        let config = Self {
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| {
                    warn!("API_BASE_URL not set, using {}", Self::DEFAULT_API_BASE_URL);
                    Self::DEFAULT_API_BASE_URL.to_string()
                }),
            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(Self::DEFAULT_SESSION_FILE)),
            date_window_mode: env::var("DATE_WINDOW_MODE")
                .ok()
                .and_then(|raw| {
                    let mode = DateWindowMode::parse(&raw);
                    if mode.is_none() {
                        warn!("DATE_WINDOW_MODE '{}' not recognised, using rolling", raw);
                    }
                    mode
                })
                .unwrap_or(DateWindowMode::Rolling),
            session_ttl_hours: env::var("SESSION_TTL_HOURS")
                .ok()
                .and_then(|raw| match raw.parse::<i64>() {
                    Ok(hours) if hours > 0 => Some(hours),
                    _ => {
                        warn!("SESSION_TTL_HOURS '{}' is not a positive integer, using default", raw);
                        None
                    }
                })
                .unwrap_or(Self::DEFAULT_SESSION_TTL_HOURS),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    /// Config pointing at `base_url` with every other field defaulted.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: base_url.into(),
            session_file: PathBuf::from(Self::DEFAULT_SESSION_FILE),
            date_window_mode: DateWindowMode::Rolling,
            session_ttl_hours: Self::DEFAULT_SESSION_TTL_HOURS,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
            && !self.session_file.as_os_str().is_empty()
    }
}
