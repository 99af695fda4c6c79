use std::collections::HashSet;

use assert_matches::assert_matches;
use rand::rngs::StdRng;
use rand::SeedableRng;
use wortquiz::quiz::{QuestionKind, QuizConfig, QuizSession, SessionState, TestMode, TestType};
use wortquiz::{Article, NewWord, QuizError, Word};

fn session(mode: TestMode, test_type: TestType, count: usize, seed: u64) -> QuizSession<StdRng> {
    QuizSession::with_rng(
        QuizConfig {
            mode,
            test_type,
            question_count: count,
            auto_finish: false,
        },
        StdRng::seed_from_u64(seed),
    )
}

fn nouns() -> Vec<Word> {
    [
        (Article::Der, "Bahnhof", "istasyon"),
        (Article::Die, "Schule", "okul"),
        (Article::Das, "Haus", "ev"),
        (Article::Der, "Tisch", "masa"),
        (Article::Die, "Tür", "kapı"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (article, german, turkish))| {
        NewWord::new(german, turkish, "Allgemein")
            .article(article)
            .into_word(i as i64 + 1)
    })
    .collect()
}

#[test]
fn artikel_quiz_offers_all_three_articles() {
    let words = nouns();
    let mut quiz = session(TestMode::Artikel, TestType::Multiple, 10, 7);
    assert_eq!(quiz.start(words.clone()).unwrap(), 5);
    assert_eq!(quiz.state(), SessionState::Ready);

    let asked: HashSet<i64> = quiz.questions().iter().map(|q| q.word_id).collect();
    assert_eq!(asked.len(), 5);

    for question in quiz.questions() {
        assert_eq!(question.kind, QuestionKind::Multiple);
        let options: HashSet<&str> = question
            .options
            .as_ref()
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(options, HashSet::from(["der", "die", "das"]));

        let word = words.iter().find(|w| w.id == question.word_id).unwrap();
        assert_eq!(question.correct_answer, word.article.unwrap().as_str());
    }
}

#[test]
fn artikel_options_only_use_articles_present_in_the_pool() {
    let words: Vec<Word> = nouns()
        .into_iter()
        .filter(|w| w.article != Some(Article::Das))
        .collect();
    let mut quiz = session(TestMode::Artikel, TestType::Multiple, 10, 21);
    assert_eq!(quiz.start(words).unwrap(), 4);

    for question in quiz.questions() {
        let options: HashSet<&str> = question
            .options
            .as_ref()
            .unwrap()
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(options, HashSet::from(["der", "die"]));
    }
}

#[test]
fn single_wo_word_has_one_capitalized_option() {
    let word = Word {
        wo: Some("zu Hause".to_string()),
        ..NewWord::new("Haus", "ev", "Wohnen")
            .article(Article::Das)
            .into_word(1)
    };
    let mut quiz = session(TestMode::Wo, TestType::Multiple, 10, 1);
    assert_eq!(quiz.start(vec![word]).unwrap(), 1);

    let question = quiz.question(0).unwrap().clone();
    assert_eq!(question.correct_answer, "Zu hause");
    assert_eq!(question.options, Some(vec!["Zu hause".to_string()]));

    quiz.answer(0, "  zu HAUSE ").unwrap();
    let outcome = quiz.finish().unwrap();
    assert_eq!(outcome.correct_count, 1);
    assert_eq!(outcome.score, 100);
}

#[test]
fn answering_everything_correctly_scores_100() {
    let mut quiz = session(TestMode::TrDe, TestType::Mixed, 4, 3);
    quiz.start(nouns()).unwrap();

    let answers: Vec<String> = quiz
        .questions()
        .iter()
        .map(|q| format!(" {} ", q.correct_answer.to_uppercase()))
        .collect();
    for (index, answer) in answers.into_iter().enumerate() {
        assert_eq!(quiz.answer(index, answer).unwrap(), SessionState::InProgress);
    }

    let outcome = quiz.finish().unwrap();
    assert_eq!(outcome.total_questions, 4);
    assert_eq!(outcome.correct_count, 4);
    assert_eq!(outcome.score, 100);
    assert_eq!(quiz.finish().unwrap(), outcome);
}

#[test]
fn partial_answers_round_the_score() {
    let mut quiz = session(TestMode::DeTr, TestType::Fill, 3, 11);
    quiz.start(nouns()).unwrap();
    let first = quiz.question(0).unwrap().correct_answer.clone();
    quiz.answer(0, first).unwrap();
    quiz.answer(1, "yanlış").unwrap();

    let outcome = quiz.finish().unwrap();
    assert_eq!(outcome.correct_count, 1);
    assert_eq!(outcome.score, 33);
    assert_matches!(quiz.answer(2, "geç"), Err(QuizError::AlreadyCompleted));
}

#[test]
fn restart_gives_a_fresh_ready_session() {
    let mut quiz = session(TestMode::DeTr, TestType::Multiple, 3, 5);
    quiz.start(nouns()).unwrap();
    quiz.answer(0, "masa").unwrap();
    quiz.finish().unwrap();

    assert_eq!(quiz.restart().unwrap(), 3);
    assert_eq!(quiz.state(), SessionState::Ready);
    assert_eq!(quiz.answered_count(), 0);
    assert_eq!(quiz.outcome(), None);
    let asked: HashSet<i64> = quiz.questions().iter().map(|q| q.word_id).collect();
    assert_eq!(asked.len(), 3);
}

#[test]
fn empty_pool_leaves_session_empty() {
    let words: Vec<Word> = ["schnell", "langsam"]
        .into_iter()
        .enumerate()
        .map(|(i, german)| NewWord::new(german, "-", "Adjektive").into_word(i as i64 + 1))
        .collect();

    let mut quiz = session(TestMode::Artikel, TestType::Multiple, 10, 0);
    assert_matches!(quiz.start(words), Err(QuizError::EmptyPool));
    assert_eq!(quiz.state(), SessionState::Empty);
    assert!(quiz.questions().is_empty());
    assert_matches!(quiz.answer(0, "der"), Err(QuizError::NotStarted));
    assert_matches!(quiz.finish(), Err(QuizError::NotStarted));
}

#[test]
fn auto_finish_completes_on_last_answer() {
    let mut quiz = QuizSession::with_rng(
        QuizConfig {
            mode: TestMode::Artikel,
            test_type: TestType::Fill,
            question_count: 2,
            auto_finish: true,
        },
        StdRng::seed_from_u64(9),
    );
    quiz.start(nouns()).unwrap();
    assert_eq!(quiz.answer(0, "der").unwrap(), SessionState::InProgress);
    assert_eq!(quiz.answer(1, "die").unwrap(), SessionState::Completed);
    assert!(quiz.outcome().is_some());
}
