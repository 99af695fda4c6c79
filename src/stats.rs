use crate::quiz::session::TestResult;
use crate::quiz::TestMode;
use crate::util::mean;
use chrono::{DateTime, Local};
use itertools::Itertools;

/// Aggregated history of one quiz mode
#[derive(Debug, Clone, PartialEq)]
pub struct ModeSummary {
    pub mode: TestMode,
    pub attempts: usize,
    pub average_score: f64,
    pub best_score: u32,
    pub last_taken: DateTime<Local>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultStats {
    pub attempts: usize,
    pub average_score: Option<f64>,
    pub questions_answered: usize,
    pub correct_answers: usize,
    /// One entry per mode that was played, in [`TestMode::ALL`] order
    pub per_mode: Vec<ModeSummary>,
}

impl ResultStats {
    /// Share of correct answers over all recorded sessions, in percent
    pub fn accuracy(&self) -> Option<f64> {
        if self.questions_answered == 0 {
            return None;
        }
        Some(self.correct_answers as f64 / self.questions_answered as f64 * 100.0)
    }

    pub fn for_mode(&self, mode: TestMode) -> Option<&ModeSummary> {
        self.per_mode.iter().find(|m| m.mode == mode)
    }
}

pub fn summarize(results: &[TestResult]) -> ResultStats {
    let scores: Vec<f64> = results.iter().map(|r| r.score as f64).collect();

    let by_mode = results.iter().into_group_map_by(|r| r.mode);
    let per_mode = TestMode::ALL
        .iter()
        .filter_map(|mode| {
            let group = by_mode.get(mode)?;
            let scores: Vec<f64> = group.iter().map(|r| r.score as f64).collect();
            Some(ModeSummary {
                mode: *mode,
                attempts: group.len(),
                average_score: mean(&scores)?,
                best_score: group.iter().map(|r| r.score).max()?,
                last_taken: group.iter().map(|r| r.taken_at).max()?,
            })
        })
        .collect();

    ResultStats {
        attempts: results.len(),
        average_score: mean(&scores),
        questions_answered: results.iter().map(|r| r.total_questions).sum(),
        correct_answers: results.iter().map(|r| r.correct_answers).sum(),
        per_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::{TestSource, TestType};
    use chrono::Duration;

    fn result(mode: TestMode, correct: usize, total: usize, days_ago: i64) -> TestResult {
        TestResult {
            id: None,
            mode,
            test_type: TestType::Multiple,
            source: TestSource::Wordlist,
            category: None,
            favorite_list: None,
            question_count: total,
            correct_answers: correct,
            total_questions: total,
            score: (correct as f64 / total as f64 * 100.0).round() as u32,
            taken_at: Local::now() - Duration::days(days_ago),
        }
    }

    #[test]
    fn test_empty_history() {
        let stats = summarize(&[]);
        assert_eq!(stats.attempts, 0);
        assert_eq!(stats.average_score, None);
        assert_eq!(stats.accuracy(), None);
        assert!(stats.per_mode.is_empty());
    }

    #[test]
    fn test_groups_by_mode() {
        let history = vec![
            result(TestMode::Artikel, 4, 5, 0),
            result(TestMode::DeTr, 5, 10, 1),
            result(TestMode::Artikel, 2, 5, 3),
        ];
        let stats = summarize(&history);

        assert_eq!(stats.attempts, 3);
        assert_eq!(stats.questions_answered, 20);
        assert_eq!(stats.correct_answers, 11);
        assert_eq!(stats.accuracy(), Some(55.0));
        assert_eq!(stats.average_score, Some((80.0 + 50.0 + 40.0) / 3.0));

        assert_eq!(stats.per_mode.len(), 2);
        assert_eq!(stats.per_mode[0].mode, TestMode::Artikel);

        let artikel = stats.for_mode(TestMode::Artikel).unwrap();
        assert_eq!(artikel.attempts, 2);
        assert_eq!(artikel.average_score, 60.0);
        assert_eq!(artikel.best_score, 80);
        assert_eq!(artikel.last_taken, history[0].taken_at);

        assert!(stats.for_mode(TestMode::Woher).is_none());
    }
}
