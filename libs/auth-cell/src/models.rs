use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::auth::User;
use shared_models::AppError;
use shared_utils::jwt;

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Username must be at least 3 characters")]
    InvalidUsername,

    #[error("Password must be at least 6 characters")]
    InvalidPassword,

    #[error("Sign-in rejected, check your username and password")]
    InvalidCredentials,

    #[error("Invalid access token: {0}")]
    InvalidToken(String),

    #[error("Session storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Api(#[from] AppError),
}

/// Authenticated identity handed to every workflow that calls protected
/// endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Builds a session from a freshly issued token. The session lives for
    /// `ttl_hours` or until the token expires, whichever comes first.
    pub fn from_token(token: &str, ttl_hours: i64, now: DateTime<Utc>) -> Result<Self, AuthError> {
        let claims = jwt::decode_claims(token).map_err(AuthError::InvalidToken)?;

        if jwt::is_expired(&claims, now) {
            return Err(AuthError::InvalidToken("token already expired".to_string()));
        }

        let ttl_expiry = now + Duration::hours(ttl_hours);
        let expires_at = match jwt::expires_at(&claims) {
            Some(token_expiry) if token_expiry < ttl_expiry => token_expiry,
            _ => ttl_expiry,
        };

        Ok(Self {
            access_token: token.to_string(),
            user: User::from(claims),
            expires_at,
        })
    }

    pub fn bearer(&self) -> &str {
        &self.access_token
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    pub fn is_admin(&self) -> bool {
        self.user.is_admin()
    }
}

pub fn validate_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    if username.trim().chars().count() < MIN_USERNAME_LEN {
        return Err(AuthError::InvalidUsername);
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidPassword);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use shared_utils::test_utils::{JwtTestUtils, TestUser};

    #[test]
    fn credentials_have_minimum_lengths() {
        assert_matches!(validate_credentials("ab", "secret1"), Err(AuthError::InvalidUsername));
        assert_matches!(validate_credentials("abc", "12345"), Err(AuthError::InvalidPassword));
        assert!(validate_credentials("abc", "123456").is_ok());
    }

    #[test]
    fn session_expiry_is_capped_by_ttl() {
        let now = Utc::now();
        let token = JwtTestUtils::create_test_token(&TestUser::patient("lan"), "s", Some(48));

        let session = Session::from_token(&token, 12, now).unwrap();
        assert_eq!(session.expires_at, now + Duration::hours(12));
        assert_eq!(session.user.username, "lan");
        assert!(!session.is_admin());
    }

    #[test]
    fn session_expiry_follows_short_token() {
        let now = Utc::now();
        let token = JwtTestUtils::create_test_token(&TestUser::admin("boss"), "s", Some(1));

        let session = Session::from_token(&token, 12, now).unwrap();
        assert!(session.expires_at < now + Duration::hours(2));
        assert!(session.is_admin());
    }

    #[test]
    fn expired_token_cannot_start_a_session() {
        let token = JwtTestUtils::create_expired_token(&TestUser::patient("lan"), "s");
        assert_matches!(Session::from_token(&token, 12, Utc::now()), Err(AuthError::InvalidToken(_)));
    }
}
