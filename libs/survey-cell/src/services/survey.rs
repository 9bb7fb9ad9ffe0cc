use reqwest::Method;
use tracing::{info, warn};

use auth_cell::Session;
use shared_api::ApiClient;
use shared_config::AppConfig;
use shared_models::Notice;

use crate::models::{Question, SurveyError, SurveySubmission};
use crate::services::engine::SurveyEngine;

/// Who the result is filed under. Prefilled from the signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Submitter {
    pub full_name: String,
    pub email: String,
}

impl Submitter {
    pub fn from_session(session: Option<&Session>) -> Self {
        match session {
            Some(session) => Self {
                full_name: session.user.full_name.clone(),
                email: session.user.email.clone(),
            },
            None => Self::default(),
        }
    }

    fn validate(&self) -> Result<(), SurveyError> {
        if self.full_name.trim().is_empty() {
            return Err(SurveyError::MissingSubmitter("full name"));
        }
        if self.email.trim().is_empty() {
            return Err(SurveyError::MissingSubmitter("email"));
        }
        Ok(())
    }
}

pub struct SurveyService {
    api: ApiClient,
}

impl SurveyService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            api: ApiClient::new(config),
        }
    }

    pub async fn get_questions(&self) -> Result<Vec<Question>, SurveyError> {
        let questions: Vec<Question> = self.api.get("/questions", None).await?;
        info!("Fetched {} survey questions", questions.len());
        Ok(questions)
    }

    /// Fetches the questions and starts `engine`. On failure the engine stays
    /// on the intro screen.
    pub async fn start(&self, engine: &mut SurveyEngine) -> Result<(), SurveyError> {
        match self.get_questions().await {
            Ok(questions) => {
                engine.start(questions);
                Ok(())
            }
            Err(e) => {
                warn!("Could not load survey questions: {}", e);
                Err(e)
            }
        }
    }

    /// Uploads a question bank file. The file must hold a JSON array; anything
    /// else is refused before upload.
    pub async fn import_questions(&self, file_name: &str, content: Vec<u8>,
                                  auth_token: &str) -> Result<(), SurveyError> {
        check_import(&content)?;

        self.api
            .upload("/questions/import", Some(auth_token), file_name, content)
            .await?;

        info!("Imported question bank from {}", file_name);
        Ok(())
    }

    /// Sends the finished survey. Nothing is kept locally either way.
    pub async fn submit(&self, engine: &SurveyEngine, submitter: &Submitter) -> Result<(), SurveyError> {
        if !engine.is_finished() {
            return Err(SurveyError::NotFinished);
        }
        submitter.validate()?;

        let submission = SurveySubmission {
            email: submitter.email.trim().to_string(),
            full_name: submitter.full_name.trim().to_string(),
            content: engine.responses(),
        };

        self.api
            .execute(Method::POST, "/questions/submit", None, Some(&submission))
            .await?;

        info!("Submitted survey with {} points", engine.total_points());
        Ok(())
    }
}

fn check_import(content: &[u8]) -> Result<(), SurveyError> {
    let value: serde_json::Value = serde_json::from_slice(content)
        .map_err(|e| SurveyError::InvalidImport(format!("not valid JSON ({})", e)))?;

    match value.as_array() {
        Some(entries) if !entries.is_empty() => Ok(()),
        Some(_) => Err(SurveyError::InvalidImport("the file has no questions".to_string())),
        None => Err(SurveyError::InvalidImport("expected a JSON array of questions".to_string())),
    }
}

/// User-facing outcome of [`SurveyService::submit`].
pub fn submission_notice(result: &Result<(), SurveyError>) -> Notice {
    match result {
        Ok(()) => Notice::success("Kết quả đã được lưu thành công!"),
        Err(SurveyError::Api(e)) if e.is_transport() => Notice::error("Không thể kết nối đến máy chủ!"),
        Err(SurveyError::Api(_)) => Notice::error("Đã có lỗi xảy ra khi lưu kết quả!"),
        Err(e) => Notice::error(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn import_accepts_a_question_array() {
        assert!(check_import(br#"[{"content": "Buon ba", "answers": []}]"#).is_ok());
    }

    #[test]
    fn import_refuses_other_shapes() {
        assert_matches!(check_import(b"not json"), Err(SurveyError::InvalidImport(_)));
        assert_matches!(check_import(b"[]"), Err(SurveyError::InvalidImport(_)));
        assert_matches!(check_import(br#"{"content": "Buon ba"}"#), Err(SurveyError::InvalidImport(_)));
    }
}
