use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info, warn};

use super::questions::{Question, LAST_QUESTION, QUESTIONS};
use crate::remote::PersonalityAnalyzer;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum QuestionnaireError {
    #[error("An answer is required before moving on")]
    EmptyAnswer,
    #[error("The answers are already being analyzed")]
    AlreadySubmitting,
    #[error("Question {0} is not reachable yet")]
    OutOfRange(usize),
    #[error("Every question must be answered before the analysis")]
    Incomplete,
    #[error("The questionnaire is already complete")]
    Finished,
    #[error("No analysis is in progress")]
    NotSubmitting,
    #[error("{0}")]
    AnalysisFailed(String),
}

/// One entry of the payload sent to the analysis collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: u8,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    AskingQuestion(usize),
    Submitting,
    Complete(String),
    /// The analysis failed; the last question is shown again and a retry is allowed.
    Failed(String),
}

/// What the caller should do after [`QuestionnaireFlow::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Question(usize),
    ReadyToSubmit,
}

/// The five question wizard.
///
/// `current` keeps pointing at the last question while submitting and after
/// a failure, so a retry resumes exactly where the user left off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionnaireFlow {
    state: FlowState,
    current: usize,
    answers: BTreeMap<u8, String>,
}

impl Default for QuestionnaireFlow {
    fn default() -> Self {
        QuestionnaireFlow::new()
    }
}

impl QuestionnaireFlow {
    pub fn new() -> Self {
        QuestionnaireFlow {
            state: FlowState::AskingQuestion(0),
            current: 0,
            answers: BTreeMap::new(),
        }
    }

    pub fn state(&self) -> &FlowState {
        &self.state
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &'static Question {
        &QUESTIONS[self.current]
    }

    pub fn answers(&self) -> &BTreeMap<u8, String> {
        &self.answers
    }

    pub fn answer_at(&self, index: usize) -> Option<&str> {
        QUESTIONS
            .get(index)
            .and_then(|q| self.answers.get(&q.id))
            .map(String::as_str)
    }

    /// Percentage shown next to "Question i/5".
    pub fn progress(&self) -> u8 {
        (((self.current + 1) * 100) / QUESTIONS.len()) as u8
    }

    /// An answer of only whitespace counts as no answer, so it blocks
    /// `advance` and submission alike.
    fn is_answered(&self, index: usize) -> bool {
        self.answer_at(index)
            .is_some_and(|answer| !answer.trim().is_empty())
    }

    fn ensure_editable(&self) -> Result<(), QuestionnaireError> {
        match self.state {
            FlowState::AskingQuestion(_) | FlowState::Failed(_) => Ok(()),
            FlowState::Submitting => Err(QuestionnaireError::AlreadySubmitting),
            FlowState::Complete(_) => Err(QuestionnaireError::Finished),
        }
    }

    /// Records the answer of the current question. Editing after a failed
    /// analysis brings the flow back to asking.
    pub fn answer(&mut self, text: &str) -> Result<(), QuestionnaireError> {
        self.ensure_editable()?;
        let id = self.current_question().id;
        self.answers.insert(id, text.to_string());
        self.state = FlowState::AskingQuestion(self.current);
        Ok(())
    }

    /// Moves to the next question. On the last one, tells the caller to submit.
    pub fn advance(&mut self) -> Result<Step, QuestionnaireError> {
        self.ensure_editable()?;
        if !self.is_answered(self.current) {
            warn!(index = self.current, "advance blocked on empty answer");
            return Err(QuestionnaireError::EmptyAnswer);
        }
        if self.current == LAST_QUESTION {
            return Ok(Step::ReadyToSubmit);
        }
        self.current += 1;
        self.state = FlowState::AskingQuestion(self.current);
        Ok(Step::Question(self.current))
    }

    /// Jumps back to an answered question, or to the first unanswered one.
    /// Later answers are kept.
    pub fn select(&mut self, index: usize) -> Result<(), QuestionnaireError> {
        self.ensure_editable()?;
        let reachable = (0..QUESTIONS.len())
            .find(|i| !self.is_answered(*i))
            .unwrap_or(LAST_QUESTION);
        if index > reachable {
            return Err(QuestionnaireError::OutOfRange(index));
        }
        self.current = index;
        self.state = FlowState::AskingQuestion(index);
        Ok(())
    }

    /// Single-flight guard: enters `Submitting` and hands back the ordered
    /// payload, or refuses while another submission is outstanding.
    pub fn begin_submission(&mut self) -> Result<Vec<QuestionResponse>, QuestionnaireError> {
        self.ensure_editable()?;
        if self.current != LAST_QUESTION || !(0..QUESTIONS.len()).all(|i| self.is_answered(i)) {
            return Err(QuestionnaireError::Incomplete);
        }
        self.state = FlowState::Submitting;
        info!("questionnaire submitted for analysis");
        Ok(self.responses())
    }

    /// Resolves an outstanding submission.
    pub fn finish(&mut self, outcome: Result<String, String>) -> Result<(), QuestionnaireError> {
        if self.state != FlowState::Submitting {
            return Err(QuestionnaireError::NotSubmitting);
        }
        self.state = match outcome {
            Ok(analysis) => FlowState::Complete(analysis),
            Err(message) => {
                error!(%message, "personality analysis failed");
                FlowState::Failed(message)
            },
        };
        Ok(())
    }

    /// begin, call the analyzer, finish.
    pub async fn submit(
        &mut self,
        analyzer: &dyn PersonalityAnalyzer,
    ) -> Result<String, QuestionnaireError> {
        let responses = self.begin_submission()?;
        match analyzer.analyze(&responses).await {
            Ok(analysis) => {
                self.finish(Ok(analysis.clone()))?;
                Ok(analysis)
            },
            Err(err) => {
                let message = err.message();
                self.finish(Err(message.clone()))?;
                Err(QuestionnaireError::AnalysisFailed(message))
            },
        }
    }

    pub fn responses(&self) -> Vec<QuestionResponse> {
        QUESTIONS
            .iter()
            .map(|q| QuestionResponse {
                id: q.id,
                question: q.question.to_string(),
                answer: self.answers.get(&q.id).cloned().unwrap_or_default(),
            })
            .collect()
    }
}
