use chrono::Utc;
use reqwest::Method;
use tracing::{debug, info, warn};

use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::auth::SignInRequest;
use shared_models::AppError;

use crate::models::{validate_credentials, AuthError, Session};

pub struct SignInService {
    api: ApiClient,
    session_ttl_hours: i64,
}

impl SignInService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
            session_ttl_hours: config.session_ttl_hours,
        }
    }

    /// Exchanges credentials for a session. Inputs are checked locally
    /// before anything is sent.
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        validate_credentials(username, password)?;
        debug!("Signing in {}", username);

        let request = SignInRequest {
            username: username.trim().to_string(),
            password: password.to_string(),
        };

        let token: String = match self.api
            .request_enveloped(Method::POST, "/auth/signin", &[], None, Some(&request))
            .await
        {
            Ok(token) => token,
            Err(AppError::Auth(_)) | Err(AppError::BadRequest(_)) => {
                warn!("Sign-in rejected for {}", username);
                return Err(AuthError::InvalidCredentials);
            }
            Err(e) => return Err(AuthError::Api(e)),
        };

        let session = Session::from_token(&token, self.session_ttl_hours, Utc::now())?;
        info!("Sign-in succeeded for {} (admin: {})", session.user.username, session.is_admin());

        Ok(session)
    }
}
