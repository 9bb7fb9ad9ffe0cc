use tracing::debug;

use crate::models::{DepressionLevel, Question, SurveyError, SurveyResponse};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyPhase {
    Intro,
    InProgress,
    Result,
}

/// One answered question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub answer_index: usize,
    pub answer_id: i64,
    pub point: i32,
}

impl AnswerRecord {
    pub fn response(&self) -> SurveyResponse {
        SurveyResponse {
            question_id: self.question_id,
            index: self.answer_index + 1,
            answer_id: self.answer_id,
        }
    }
}

/// Walks an ordered question list. The answer history is the only score
/// state: the current question is its length and the total is its sum, so
/// stepping back can never leave the score out of step.
#[derive(Debug, Clone)]
pub struct SurveyEngine {
    questions: Vec<Question>,
    phase: SurveyPhase,
    history: Vec<AnswerRecord>,
    pending: Option<usize>,
}

impl Default for SurveyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyEngine {
    pub fn new() -> Self {
        Self {
            questions: Vec::new(),
            phase: SurveyPhase::Intro,
            history: Vec::new(),
            pending: None,
        }
    }

    /// Begins the survey over `questions`. An empty list goes straight to the
    /// result with a zero score.
    pub fn start(&mut self, questions: Vec<Question>) {
        debug!("Starting survey with {} questions", questions.len());

        self.questions = questions;
        self.history.clear();
        self.pending = None;
        self.phase = if self.questions.is_empty() {
            SurveyPhase::Result
        } else {
            SurveyPhase::InProgress
        };
    }

    pub fn phase(&self) -> SurveyPhase {
        self.phase
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn current_question_index(&self) -> usize {
        self.history.len()
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SurveyPhase::InProgress => self.questions.get(self.history.len()),
            _ => None,
        }
    }

    pub fn selected_answer_index(&self) -> Option<usize> {
        self.pending
    }

    fn ensure_in_progress(&self) -> Result<&Question, SurveyError> {
        match self.phase {
            SurveyPhase::Intro => Err(SurveyError::NotStarted),
            SurveyPhase::Result => Err(SurveyError::AlreadyFinished),
            SurveyPhase::InProgress => self
                .questions
                .get(self.history.len())
                .ok_or(SurveyError::AlreadyFinished),
        }
    }

    /// Marks `answer_index` as the pending choice without advancing.
    pub fn select_answer(&mut self, answer_index: usize) -> Result<(), SurveyError> {
        let question = self.ensure_in_progress()?;
        if answer_index >= question.answers.len() {
            return Err(SurveyError::InvalidAnswer(answer_index));
        }

        self.pending = Some(answer_index);
        Ok(())
    }

    /// Records the pending choice and moves on. After the last question the
    /// survey enters `Result`.
    pub fn next(&mut self) -> Result<(), SurveyError> {
        let question = self.ensure_in_progress()?;
        let answer_index = self.pending.ok_or(SurveyError::NoAnswerSelected)?;
        let answer = question
            .answers
            .get(answer_index)
            .ok_or(SurveyError::InvalidAnswer(answer_index))?;

        let record = AnswerRecord {
            question_id: question.id,
            answer_index,
            answer_id: answer.id,
            point: answer.point,
        };
        self.history.push(record);
        self.pending = None;

        if self.history.len() == self.questions.len() {
            self.phase = SurveyPhase::Result;
            debug!("Survey finished with {} points", self.total_points());
        }
        Ok(())
    }

    /// Undoes the last answer, restoring it as the pending choice. Also
    /// allowed from `Result`, which reopens the last question.
    pub fn previous(&mut self) -> Result<(), SurveyError> {
        if self.phase == SurveyPhase::Intro {
            return Err(SurveyError::NotStarted);
        }

        let record = self.history.pop().ok_or(SurveyError::AtFirstQuestion)?;
        self.pending = Some(record.answer_index);
        self.phase = SurveyPhase::InProgress;
        Ok(())
    }

    pub fn history(&self) -> &[AnswerRecord] {
        &self.history
    }

    /// Chosen answer index per answered question.
    pub fn user_answers(&self) -> Vec<usize> {
        self.history.iter().map(|r| r.answer_index).collect()
    }

    pub fn responses(&self) -> Vec<SurveyResponse> {
        self.history.iter().map(AnswerRecord::response).collect()
    }

    pub fn total_points(&self) -> i32 {
        self.history.iter().map(|r| r.point).sum()
    }

    /// Band of the final score, once the survey is finished.
    pub fn level(&self) -> Option<DepressionLevel> {
        match self.phase {
            SurveyPhase::Result => Some(DepressionLevel::from_points(self.total_points())),
            _ => None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.phase == SurveyPhase::Result
    }
}
