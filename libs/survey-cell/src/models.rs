// libs/survey-cell/src/models.rs
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared_models::AppError;

// ==============================================================================
// QUESTION MODELS
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i64,
    pub question_title: String,
    #[serde(default)]
    pub answers: Vec<Answer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub answer: String,
    pub point: i32,
}

/// `A`, `B`, `C`... for the answer at `index`.
pub fn answer_label(index: usize) -> Option<char> {
    u8::try_from(index)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| char::from(b'A' + i))
}

// ==============================================================================
// SUBMISSION MODELS
// ==============================================================================

/// One answered question as the backend stores it. `index` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
    pub question_id: i64,
    pub index: usize,
    pub answer_id: i64,
}

/// Body of `POST /questions/submit`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveySubmission {
    pub email: String,
    pub full_name: String,
    pub content: Vec<SurveyResponse>,
}

// ==============================================================================
// SCORING
// ==============================================================================

/// Beck depression inventory band of a total score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepressionLevel {
    None,
    Mild,
    Moderate,
    Severe,
}

impl DepressionLevel {
    pub fn from_points(total: i32) -> Self {
        match total {
            t if t < 14 => DepressionLevel::None,
            14..=19 => DepressionLevel::Mild,
            20..=29 => DepressionLevel::Moderate,
            _ => DepressionLevel::Severe,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DepressionLevel::None => "Không biểu hiện trầm cảm",
            DepressionLevel::Mild => "Trầm cảm nhẹ",
            DepressionLevel::Moderate => "Trầm cảm vừa",
            DepressionLevel::Severe => "Trầm cảm nặng",
        }
    }
}

impl fmt::Display for DepressionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Error)]
pub enum SurveyError {
    #[error("The survey has not started")]
    NotStarted,

    #[error("The survey is already finished")]
    AlreadyFinished,

    #[error("The survey is not finished yet")]
    NotFinished,

    #[error("Choose an answer first")]
    NoAnswerSelected,

    #[error("Answer {0} does not exist for this question")]
    InvalidAnswer(usize),

    #[error("Already at the first question")]
    AtFirstQuestion,

    #[error("{0} is required")]
    MissingSubmitter(&'static str),

    #[error("Import file rejected: {0}")]
    InvalidImport(String),

    #[error(transparent)]
    Api(#[from] AppError),
}
