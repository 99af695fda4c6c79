pub mod generator;
pub mod mode;
pub mod session;
pub mod source;

// Re-export the main types for convenience
pub use generator::{generate_question, normalize_answer, ModeRule};
pub use mode::{QuestionKind, TestMode, TestSource, TestType};
pub use session::{
    QuizConfig, QuizOutcome, QuizSession, ResultRecorder, ReviewItem, SessionState, TestResult,
};
pub use source::{resolve_pool, select_words, SourceSelection, WordRepository, ALL_FAVORITES};

use serde::{Deserialize, Serialize};

/// A generated quiz question. Immutable once the session has created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: usize,
    pub word_id: i64,
    pub question: String,
    pub correct_answer: String,
    pub options: Option<Vec<String>>,
    pub kind: QuestionKind,
}

impl Question {
    /// True when `answer` matches the correct answer ignoring case and surrounding whitespace
    pub fn is_correct(&self, answer: &str) -> bool {
        normalize_answer(answer) == normalize_answer(&self.correct_answer)
    }
}
