pub mod engine;
pub mod survey;

pub use engine::{AnswerRecord, SurveyEngine, SurveyPhase};
pub use survey::{submission_notice, Submitter, SurveyService};
