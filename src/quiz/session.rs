use super::generator::generate_question;
use super::mode::{QuestionKind, TestMode, TestSource, TestType};
use super::source::SourceSelection;
use super::Question;
use crate::error::{QuizError, StoreError};
use crate::word::Word;
use chrono::{DateTime, Local};
use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizConfig {
    pub mode: TestMode,
    pub test_type: TestType,
    pub question_count: usize,
    /// Finish as soon as the last open question gets an answer
    #[serde(default)]
    pub auto_finish: bool,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            mode: TestMode::DeTr,
            test_type: TestType::Multiple,
            question_count: 10,
            auto_finish: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No eligible words, nothing to ask
    Empty,
    Ready,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizOutcome {
    pub correct_count: usize,
    pub total_questions: usize,
    pub score: u32,
}

impl QuizOutcome {
    fn compute(questions: &[Question], answers: &BTreeMap<usize, String>) -> Self {
        let correct_count = questions
            .iter()
            .filter(|q| q.is_correct(answers.get(&q.id).map(String::as_str).unwrap_or("")))
            .count();
        let total_questions = questions.len();
        let score = if total_questions == 0 {
            0
        } else {
            (correct_count as f64 / total_questions as f64 * 100.0).round() as u32
        };
        Self {
            correct_count,
            total_questions,
            score,
        }
    }
}

/// Persisted summary of a finished session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    pub id: Option<i64>,
    pub mode: TestMode,
    pub test_type: TestType,
    pub source: TestSource,
    pub category: Option<String>,
    pub favorite_list: Option<String>,
    pub question_count: usize,
    pub correct_answers: usize,
    pub total_questions: usize,
    pub score: u32,
    pub taken_at: DateTime<Local>,
}

/// Sink for finished sessions
pub trait ResultRecorder {
    fn record_result(&mut self, result: &TestResult) -> Result<i64, StoreError>;
}

/// One answered question after the session is completed
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewItem {
    pub question: Question,
    pub given: Option<String>,
    pub is_correct: bool,
}

/// Owns one quiz run: sampled questions, the user's answers and the final score
#[derive(Debug)]
pub struct QuizSession<R: Rng = ThreadRng> {
    config: QuizConfig,
    rng: R,
    pool: Vec<Word>,
    questions: Vec<Question>,
    answers: BTreeMap<usize, String>,
    state: SessionState,
    outcome: Option<QuizOutcome>,
}

impl QuizSession<ThreadRng> {
    pub fn new(config: QuizConfig) -> Self {
        Self::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn with_rng(config: QuizConfig, rng: R) -> Self {
        Self {
            config,
            rng,
            pool: Vec::new(),
            questions: Vec::new(),
            answers: BTreeMap::new(),
            state: SessionState::Empty,
            outcome: None,
        }
    }

    /// Filters `pool` to words usable in the configured mode, samples up to
    /// `question_count` of them and generates one question per sampled word.
    ///
    /// Returns the number of questions. An empty eligible pool leaves the session in
    /// [`SessionState::Empty`].
    pub fn start(&mut self, pool: Vec<Word>) -> Result<usize, QuizError> {
        let mode = self.config.mode;
        self.pool = pool.into_iter().filter(|w| mode.is_eligible(w)).collect();
        self.generate()
    }

    /// Fresh sample and fresh option order with the same configuration
    pub fn restart(&mut self) -> Result<usize, QuizError> {
        if self.state != SessionState::Completed {
            return Err(QuizError::NotCompleted);
        }
        self.generate()
    }

    fn generate(&mut self) -> Result<usize, QuizError> {
        self.questions.clear();
        self.answers.clear();
        self.outcome = None;
        self.state = SessionState::Empty;

        let count = self.config.question_count.min(self.pool.len());
        if count == 0 {
            tracing::debug!(mode = %self.config.mode, "no eligible words, session stays empty");
            return Err(QuizError::EmptyPool);
        }

        let mut sample: Vec<&Word> = self.pool.choose_multiple(&mut self.rng, count).collect();
        sample.shuffle(&mut self.rng);

        let mut questions = Vec::with_capacity(count);
        for word in sample {
            let kind = match self.config.test_type {
                TestType::Multiple => QuestionKind::Multiple,
                TestType::Fill => QuestionKind::Fill,
                TestType::Mixed => {
                    if self.rng.gen_bool(0.5) {
                        QuestionKind::Multiple
                    } else {
                        QuestionKind::Fill
                    }
                }
            };
            let id = questions.len();
            if let Some(question) =
                generate_question(id, self.config.mode, kind, word, &self.pool, &mut self.rng)
            {
                questions.push(question);
            }
        }

        if questions.is_empty() {
            return Err(QuizError::EmptyPool);
        }

        tracing::debug!(
            mode = %self.config.mode,
            test_type = %self.config.test_type,
            pool = self.pool.len(),
            questions = questions.len(),
            "quiz session ready"
        );
        self.questions = questions;
        self.state = SessionState::Ready;
        Ok(self.questions.len())
    }

    /// Stores or overwrites the answer for question `index`
    pub fn answer(
        &mut self,
        index: usize,
        text: impl Into<String>,
    ) -> Result<SessionState, QuizError> {
        match self.state {
            SessionState::Empty => return Err(QuizError::NotStarted),
            SessionState::Completed => return Err(QuizError::AlreadyCompleted),
            SessionState::Ready | SessionState::InProgress => {}
        }
        if index >= self.questions.len() {
            return Err(QuizError::QuestionOutOfRange {
                index,
                total: self.questions.len(),
            });
        }

        self.answers.insert(index, text.into());
        self.state = SessionState::InProgress;

        if self.config.auto_finish && self.answers.len() == self.questions.len() {
            self.finish()?;
        }
        Ok(self.state)
    }

    /// Scores the session. Calling it again once completed returns the same outcome.
    pub fn finish(&mut self) -> Result<QuizOutcome, QuizError> {
        match self.state {
            SessionState::Empty => Err(QuizError::NotStarted),
            SessionState::Completed => self.outcome.ok_or(QuizError::NotStarted),
            SessionState::Ready | SessionState::InProgress => {
                let outcome = QuizOutcome::compute(&self.questions, &self.answers);
                tracing::debug!(
                    correct = outcome.correct_count,
                    total = outcome.total_questions,
                    score = outcome.score,
                    "quiz session completed"
                );
                self.outcome = Some(outcome);
                self.state = SessionState::Completed;
                Ok(outcome)
            }
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn answer_for(&self, index: usize) -> Option<&str> {
        self.answers.get(&index).map(String::as_str)
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    /// Number of eligible words the session samples from
    pub fn pool_size(&self) -> usize {
        self.pool.len()
    }

    pub fn is_completed(&self) -> bool {
        self.state == SessionState::Completed
    }

    pub fn outcome(&self) -> Option<QuizOutcome> {
        self.outcome
    }

    /// Correct answers so far; final once completed
    pub fn correct_count(&self) -> usize {
        match self.outcome {
            Some(outcome) => outcome.correct_count,
            None => QuizOutcome::compute(&self.questions, &self.answers).correct_count,
        }
    }

    pub fn review(&self) -> Result<Vec<ReviewItem>, QuizError> {
        if !self.is_completed() {
            return Err(QuizError::NotCompleted);
        }
        Ok(self
            .questions
            .iter()
            .map(|q| {
                let given = self.answers.get(&q.id).cloned();
                let is_correct = q.is_correct(given.as_deref().unwrap_or(""));
                ReviewItem {
                    question: q.clone(),
                    given,
                    is_correct,
                }
            })
            .collect())
    }

    /// Summary to persist, available once completed
    pub fn summary(&self, selection: &SourceSelection) -> Option<TestResult> {
        let outcome = self.outcome?;
        Some(TestResult {
            id: None,
            mode: self.config.mode,
            test_type: self.config.test_type,
            source: selection.source,
            category: selection.category.clone(),
            favorite_list: selection.favorite_list.clone(),
            question_count: self.config.question_count,
            correct_answers: outcome.correct_count,
            total_questions: outcome.total_questions,
            score: outcome.score,
            taken_at: Local::now(),
        })
    }

    /// Hands the summary to `recorder`. A failure is returned for reporting but leaves the
    /// computed outcome untouched.
    pub fn record_with<Rec: ResultRecorder + ?Sized>(
        &self,
        selection: &SourceSelection,
        recorder: &mut Rec,
    ) -> crate::Result<i64> {
        let result = self.summary(selection).ok_or(QuizError::NotCompleted)?;
        let id = recorder.record_result(&result).inspect_err(|err| {
            tracing::warn!(error = %err, "failed to record test result");
        })?;
        Ok(id)
    }
}
