use std::collections::HashSet;

use wortquiz::quiz::{
    resolve_pool, QuizConfig, QuizSession, SourceSelection, TestMode, TestSource, TestType,
};
use wortquiz::{Article, NewWord, WordStore};

fn filled_store(path: &std::path::Path) -> WordStore {
    let store = WordStore::open(path).unwrap();
    for (article, german, turkish, category, favorite) in [
        (Article::Der, "Apfel", "elma", "Essen", true),
        (Article::Die, "Birne", "armut", "Essen", false),
        (Article::Das, "Brot", "ekmek", "Essen", false),
        (Article::Der, "Bus", "otobüs", "Verkehr", true),
        (Article::Die, "Bahn", "tren", "Verkehr", false),
    ] {
        store
            .add_word(&NewWord {
                is_favorite: favorite,
                ..NewWord::new(german, turkish, category).article(article)
            })
            .unwrap();
    }
    store
}

fn germans(words: &[wortquiz::Word]) -> HashSet<String> {
    words.iter().map(|w| w.german.clone()).collect()
}

#[test]
fn pools_resolve_through_the_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = filled_store(&dir.path().join("words.db"));

    let all = resolve_pool(&store, &SourceSelection::wordlist()).unwrap();
    assert_eq!(all.len(), 5);

    let essen = resolve_pool(&store, &SourceSelection::category("Essen")).unwrap();
    assert_eq!(germans(&essen), HashSet::from(["Apfel", "Birne", "Brot"].map(String::from)));

    let favorites = resolve_pool(&store, &SourceSelection::favorites("all")).unwrap();
    assert_eq!(germans(&favorites), HashSet::from(["Apfel", "Bus"].map(String::from)));

    let list = store.create_favorite_list("Schwer").unwrap();
    store.add_to_favorite_list(list.id, 2).unwrap();
    store.add_to_favorite_list(list.id, 5).unwrap();
    let from_list =
        resolve_pool(&store, &SourceSelection::favorites(list.id.to_string())).unwrap();
    assert_eq!(germans(&from_list), HashSet::from(["Birne", "Bahn"].map(String::from)));

    let unknown = resolve_pool(&store, &SourceSelection::favorites("99")).unwrap();
    assert!(unknown.is_empty());

    let no_category = SourceSelection {
        source: TestSource::Category,
        category: None,
        favorite_list: None,
    };
    assert!(resolve_pool(&store, &no_category).unwrap().is_empty());
}

#[test]
fn finished_session_is_recorded_and_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("words.db");
    let selection = SourceSelection::category("Verkehr");

    {
        let mut store = filled_store(&path);
        let pool = resolve_pool(&store, &selection).unwrap();
        let mut quiz = QuizSession::new(QuizConfig {
            mode: TestMode::Artikel,
            test_type: TestType::Multiple,
            question_count: 5,
            auto_finish: false,
        });
        assert_eq!(quiz.start(pool).unwrap(), 2);
        let first = quiz.question(0).unwrap().correct_answer.clone();
        quiz.answer(0, first).unwrap();
        quiz.finish().unwrap();

        let id = quiz.record_with(&selection, &mut store).unwrap();
        assert!(id > 0);
    }

    let store = WordStore::open(&path).unwrap();
    let results = store.list_test_results(None).unwrap();
    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.mode, TestMode::Artikel);
    assert_eq!(result.source, TestSource::Category);
    assert_eq!(result.category.as_deref(), Some("Verkehr"));
    assert_eq!(result.total_questions, 2);
    assert_eq!(result.correct_answers, 1);
    assert_eq!(result.score, 50);
}

#[test]
fn deleted_word_leaves_favorite_lists() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = filled_store(&dir.path().join("words.db"));
    let list = store.create_favorite_list("Obst").unwrap();
    store.add_to_favorite_list(list.id, 1).unwrap();
    store.add_to_favorite_list(list.id, 2).unwrap();

    store.delete_word(1).unwrap();

    let list = store.get_favorite_list(list.id).unwrap().unwrap();
    assert_eq!(list.word_ids, vec!["2".to_string()]);
    let pool = resolve_pool(&store, &SourceSelection::favorites(list.id.to_string())).unwrap();
    assert_eq!(pool.len(), 1);
}
