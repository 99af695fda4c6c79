//! Question generation: one target word plus its peers become one question.
//!
//! Every mode is described by a [`ModeRule`]: how to phrase the prompt, which field holds the
//! answer and which field of the peers feeds the distractors. Artikel questions fall back to
//! the three articles when no peer has one.

use super::mode::{QuestionKind, TestMode};
use super::Question;
use crate::word::{non_empty, Article, Word};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Upper bound on wrong options offered next to the correct answer
pub const MAX_DISTRACTORS: usize = 3;

/// Pure field extraction rules for one test mode
#[derive(Clone, Copy)]
pub struct ModeRule {
    pub prompt: fn(&Word) -> String,
    pub answer: fn(&Word) -> Option<String>,
    pub distractor: fn(&Word) -> Option<String>,
    /// Option set used when no peer carries the distractor field
    pub fallback_options: Option<fn(&Word) -> Vec<String>>,
}

impl ModeRule {
    pub fn for_mode(mode: TestMode) -> ModeRule {
        match mode {
            TestMode::Artikel => ModeRule {
                prompt: |w| format!("Welcher Artikel gehört zu „{}“?", w.german),
                answer: |w| w.article.map(|a| a.to_string()),
                distractor: |w| w.article.map(|a| a.to_string()),
                fallback_options: Some(other_articles),
            },
            TestMode::Plural => ModeRule {
                prompt: |w| format!("Wie lautet der Plural von „{}“?", w.with_article()),
                answer: |w| non_empty(&w.plural).map(str::to_string),
                distractor: |w| non_empty(&w.plural).map(str::to_string),
                fallback_options: None,
            },
            TestMode::TrDe => ModeRule {
                prompt: |w| format!("Was heißt „{}“ auf Deutsch?", w.turkish),
                answer: |w| Some(w.with_article()),
                distractor: |w| Some(w.with_article()),
                fallback_options: None,
            },
            TestMode::DeTr => ModeRule {
                prompt: |w| format!("„{}“ kelimesinin Türkçesi nedir?", w.with_article()),
                answer: |w| Some(w.turkish.clone()),
                distractor: |w| Some(w.turkish.clone()),
                fallback_options: None,
            },
            TestMode::Sentence => ModeRule {
                prompt: |w| {
                    let source = non_empty(&w.example_translation).unwrap_or(&w.turkish);
                    format!("Übersetze ins Deutsche: „{}“", source)
                },
                answer: |w| {
                    Some(
                        non_empty(&w.example_sentence)
                            .unwrap_or(&w.german)
                            .to_string(),
                    )
                },
                distractor: |w| non_empty(&w.example_sentence).map(str::to_string),
                fallback_options: None,
            },
            TestMode::Wo => ModeRule {
                prompt: |w| format!("Wo? ({})", w.with_article()),
                answer: |w| non_empty(&w.wo).map(capitalize_first),
                distractor: |w| non_empty(&w.wo).map(capitalize_first),
                fallback_options: None,
            },
            TestMode::Wohin => ModeRule {
                prompt: |w| format!("Wohin? ({})", w.with_article()),
                answer: |w| non_empty(&w.wohin).map(capitalize_first),
                distractor: |w| non_empty(&w.wohin).map(capitalize_first),
                fallback_options: None,
            },
            TestMode::Woher => ModeRule {
                prompt: |w| format!("Woher? ({})", w.with_article()),
                answer: |w| non_empty(&w.woher).map(capitalize_first),
                distractor: |w| non_empty(&w.woher).map(capitalize_first),
                fallback_options: None,
            },
        }
    }

    /// Distinct wrong answers available for `target`, never equal to `correct`
    fn distractor_candidates(&self, target: &Word, peers: &[Word], correct: &str) -> Vec<String> {
        let from_peers: Vec<String> = peers
            .iter()
            .filter(|peer| peer.id != target.id)
            .filter_map(|peer| (self.distractor)(peer))
            .filter(|candidate| !candidate.trim().is_empty())
            .collect();
        let raw = match self.fallback_options {
            Some(fallback) if from_peers.is_empty() => fallback(target),
            _ => from_peers,
        };

        let mut seen = HashSet::new();
        seen.insert(normalize_answer(correct));
        raw.into_iter()
            .filter(|candidate| seen.insert(normalize_answer(candidate)))
            .collect()
    }
}

fn other_articles(word: &Word) -> Vec<String> {
    Article::ALL
        .into_iter()
        .filter(|article| Some(*article) != word.article)
        .map(|article| article.to_string())
        .collect()
}

/// Comparison key for answers: trimmed and lowercased
pub fn normalize_answer(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Upper-cases the first letter and lower-cases the rest ("zu Hause" -> "Zu hause")
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

/// Builds the question for `word`, or `None` when the word lacks the field the mode asks for.
///
/// `peers` is the pool distractors are drawn from; the target itself is skipped by id.
pub fn generate_question<R: Rng + ?Sized>(
    id: usize,
    mode: TestMode,
    kind: QuestionKind,
    word: &Word,
    peers: &[Word],
    rng: &mut R,
) -> Option<Question> {
    let rule = ModeRule::for_mode(mode);
    let correct_answer = (rule.answer)(word).filter(|answer| !answer.trim().is_empty())?;

    let options = match kind {
        QuestionKind::Fill => None,
        QuestionKind::Multiple => {
            let candidates = rule.distractor_candidates(word, peers, &correct_answer);
            let mut options: Vec<String> = candidates
                .choose_multiple(rng, MAX_DISTRACTORS)
                .cloned()
                .collect();
            options.push(correct_answer.clone());
            options.shuffle(rng);
            Some(options)
        }
    };

    Some(Question {
        id,
        word_id: word.id,
        question: (rule.prompt)(word),
        correct_answer,
        options,
        kind,
    })
}
