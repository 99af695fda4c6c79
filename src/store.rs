use crate::app_dirs::AppDirs;
use crate::error::StoreError;
use crate::quiz::session::{ResultRecorder, TestResult};
use crate::quiz::source::WordRepository;
use crate::word::{Article, FavoriteList, NewWord, Word, WordFilter};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};
use std::str::FromStr;

type Result<T> = std::result::Result<T, StoreError>;

const WORD_COLUMNS: &str = "id, article, german, plural, plural_suffix, turkish, category, \
     is_favorite, wo, wohin, woher, description, notes, example_sentence, example_translation";

/// SQLite backed store for words, categories, favorite lists and test results
#[derive(Debug)]
pub struct WordStore {
    conn: Connection,
}

impl WordStore {
    /// Opens the database at the default location
    pub fn open_default() -> Result<Self> {
        let path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("wortquiz.db"));
        Self::open(path)
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened word database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = WordStore { conn };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS words (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                article TEXT,
                german TEXT NOT NULL,
                plural TEXT,
                plural_suffix TEXT,
                turkish TEXT NOT NULL,
                category TEXT NOT NULL,
                is_favorite BOOLEAN NOT NULL DEFAULT 0,
                wo TEXT,
                wohin TEXT,
                woher TEXT,
                description TEXT,
                notes TEXT,
                example_sentence TEXT,
                example_translation TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );
            CREATE INDEX IF NOT EXISTS idx_words_category ON words(category);

            CREATE TABLE IF NOT EXISTS categories (
                name TEXT PRIMARY KEY
            );

            CREATE TABLE IF NOT EXISTS favorite_lists (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                word_ids TEXT NOT NULL DEFAULT '[]'
            );

            CREATE TABLE IF NOT EXISTS test_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                mode TEXT NOT NULL,
                test_type TEXT NOT NULL,
                source TEXT NOT NULL,
                category TEXT,
                favorite_list TEXT,
                question_count INTEGER NOT NULL,
                correct_answers INTEGER NOT NULL,
                total_questions INTEGER NOT NULL,
                score INTEGER NOT NULL,
                taken_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_test_results_taken_at ON test_results(taken_at);
            "#,
        )?;
        Ok(())
    }

    // Words

    pub fn add_word(&self, word: &NewWord) -> Result<Word> {
        validate(word)?;
        self.add_category(&word.category)?;
        self.conn.execute(
            r#"
            INSERT INTO words
            (article, german, plural, plural_suffix, turkish, category, is_favorite,
             wo, wohin, woher, description, notes, example_sentence, example_translation)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
            "#,
            params![
                word.article.map(|a| a.as_str()),
                word.german.trim(),
                word.plural,
                word.plural_suffix,
                word.turkish.trim(),
                word.category.trim(),
                word.is_favorite,
                word.wo,
                word.wohin,
                word.woher,
                word.description,
                word.notes,
                word.example_sentence,
                word.example_translation,
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, german = %word.german, "added word");
        self.require_word(id)
    }

    pub fn get_word(&self, id: i64) -> Result<Option<Word>> {
        let sql = format!("SELECT {WORD_COLUMNS} FROM words WHERE id = ?1");
        Ok(self.conn.query_row(&sql, [id], word_from_row).optional()?)
    }

    fn require_word(&self, id: i64) -> Result<Word> {
        self.get_word(id)?
            .ok_or_else(|| StoreError::not_found("word", id))
    }

    /// Replaces every field of word `id`, keeping its favorite flag unless `word` sets it
    pub fn update_word(&self, id: i64, word: &NewWord) -> Result<Word> {
        validate(word)?;
        let existing = self.require_word(id)?;
        self.add_category(&word.category)?;
        self.conn.execute(
            r#"
            UPDATE words SET
                article = ?1, german = ?2, plural = ?3, plural_suffix = ?4, turkish = ?5,
                category = ?6, is_favorite = ?7, wo = ?8, wohin = ?9, woher = ?10,
                description = ?11, notes = ?12, example_sentence = ?13, example_translation = ?14
            WHERE id = ?15
            "#,
            params![
                word.article.map(|a| a.as_str()),
                word.german.trim(),
                word.plural,
                word.plural_suffix,
                word.turkish.trim(),
                word.category.trim(),
                word.is_favorite || existing.is_favorite,
                word.wo,
                word.wohin,
                word.woher,
                word.description,
                word.notes,
                word.example_sentence,
                word.example_translation,
                id,
            ],
        )?;
        tracing::info!(id, "updated word");
        self.require_word(id)
    }

    /// Deletes a word and drops it from every favorite list
    pub fn delete_word(&mut self, id: i64) -> Result<()> {
        let key = id.to_string();
        let lists = self.list_favorite_lists()?;
        let tx = self.conn.transaction()?;
        let deleted = tx.execute("DELETE FROM words WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(StoreError::not_found("word", id));
        }
        for list in lists.into_iter().filter(|l| l.word_ids.contains(&key)) {
            let remaining: Vec<&String> = list.word_ids.iter().filter(|w| **w != key).collect();
            tx.execute(
                "UPDATE favorite_lists SET word_ids = ?1 WHERE id = ?2",
                params![serde_json::to_string(&remaining)?, list.id],
            )?;
        }
        tx.commit()?;
        tracing::info!(id, "deleted word");
        Ok(())
    }

    pub fn set_favorite(&self, id: i64, favorite: bool) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE words SET is_favorite = ?1 WHERE id = ?2",
            params![favorite, id],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("word", id));
        }
        Ok(())
    }

    /// Flips the favorite flag and returns the new value
    pub fn toggle_favorite(&self, id: i64) -> Result<bool> {
        let word = self.require_word(id)?;
        self.set_favorite(id, !word.is_favorite)?;
        Ok(!word.is_favorite)
    }

    pub fn count_words(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM words", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    // Categories

    pub fn add_category(&self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid("category", "must not be empty"));
        }
        self.conn
            .execute("INSERT OR IGNORE INTO categories (name) VALUES (?1)", [name])?;
        Ok(())
    }

    /// Removes an unused category
    pub fn delete_category(&self, name: &str) -> Result<()> {
        let in_use: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM words WHERE category = ?1",
            [name],
            |row| row.get(0),
        )?;
        if in_use > 0 {
            return Err(StoreError::invalid(
                "category",
                format!("'{name}' is still used by {in_use} words"),
            ));
        }
        self.conn
            .execute("DELETE FROM categories WHERE name = ?1", [name])?;
        Ok(())
    }

    // Favorite lists

    pub fn create_favorite_list(&self, name: &str) -> Result<FavoriteList> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid("name", "must not be empty"));
        }
        self.conn.execute(
            "INSERT INTO favorite_lists (name, word_ids) VALUES (?1, '[]')",
            [name],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, name, "created favorite list");
        self.require_favorite_list(id)
    }

    pub fn get_favorite_list(&self, id: i64) -> Result<Option<FavoriteList>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, word_ids FROM favorite_lists WHERE id = ?1",
                [id],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        row.map(favorite_list_from_parts).transpose()
    }

    fn require_favorite_list(&self, id: i64) -> Result<FavoriteList> {
        self.get_favorite_list(id)?
            .ok_or_else(|| StoreError::not_found("favorite list", id))
    }

    pub fn rename_favorite_list(&self, id: i64, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::invalid("name", "must not be empty"));
        }
        let changed = self.conn.execute(
            "UPDATE favorite_lists SET name = ?1 WHERE id = ?2",
            params![name, id],
        )?;
        if changed == 0 {
            return Err(StoreError::not_found("favorite list", id));
        }
        Ok(())
    }

    pub fn delete_favorite_list(&self, id: i64) -> Result<()> {
        let deleted = self
            .conn
            .execute("DELETE FROM favorite_lists WHERE id = ?1", [id])?;
        if deleted == 0 {
            return Err(StoreError::not_found("favorite list", id));
        }
        tracing::info!(id, "deleted favorite list");
        Ok(())
    }

    /// Appends a word to a list. Returns false when the word was already in it.
    pub fn add_to_favorite_list(&self, list_id: i64, word_id: i64) -> Result<bool> {
        self.require_word(word_id)?;
        let mut list = self.require_favorite_list(list_id)?;
        let key = word_id.to_string();
        if list.word_ids.contains(&key) {
            return Ok(false);
        }
        list.word_ids.push(key);
        self.save_word_ids(&list)?;
        Ok(true)
    }

    /// Returns false when the word was not in the list
    pub fn remove_from_favorite_list(&self, list_id: i64, word_id: i64) -> Result<bool> {
        let mut list = self.require_favorite_list(list_id)?;
        let key = word_id.to_string();
        let before = list.word_ids.len();
        list.word_ids.retain(|id| *id != key);
        if list.word_ids.len() == before {
            return Ok(false);
        }
        self.save_word_ids(&list)?;
        Ok(true)
    }

    fn save_word_ids(&self, list: &FavoriteList) -> Result<()> {
        self.conn.execute(
            "UPDATE favorite_lists SET word_ids = ?1 WHERE id = ?2",
            params![serde_json::to_string(&list.word_ids)?, list.id],
        )?;
        Ok(())
    }

    // Test results

    pub fn record_test_result(&self, result: &TestResult) -> Result<i64> {
        self.conn.execute(
            r#"
            INSERT INTO test_results
            (mode, test_type, source, category, favorite_list, question_count,
             correct_answers, total_questions, score, taken_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                result.mode.to_string(),
                result.test_type.to_string(),
                result.source.to_string(),
                result.category,
                result.favorite_list,
                result.question_count as i64,
                result.correct_answers as i64,
                result.total_questions as i64,
                result.score,
                utc_timestamp(&result.taken_at),
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        tracing::info!(id, mode = %result.mode, score = result.score, "recorded test result");
        Ok(id)
    }

    /// Most recent results first
    pub fn list_test_results(&self, limit: Option<usize>) -> Result<Vec<TestResult>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, mode, test_type, source, category, favorite_list, question_count,
                   correct_answers, total_questions, score, taken_at
            FROM test_results
            ORDER BY taken_at DESC, id DESC
            LIMIT ?1
            "#,
        )?;
        let limit = limit.map(|l| l as i64).unwrap_or(-1);
        let rows = stmt.query_map([limit], test_result_from_row)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }
        Ok(results)
    }

    pub fn clear_test_results(&self) -> Result<()> {
        self.conn.execute("DELETE FROM test_results", [])?;
        Ok(())
    }
}

impl WordRepository for WordStore {
    fn list_words(&self, filter: &WordFilter) -> Result<Vec<Word>> {
        let mut clauses = Vec::new();
        let mut values: Vec<Value> = Vec::new();
        if let Some(ref category) = filter.category {
            values.push(Value::Text(category.clone()));
            clauses.push(format!("category = ?{}", values.len()));
        }
        if filter.favorites_only {
            clauses.push("is_favorite = 1".to_string());
        }
        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };
        let sql = format!("SELECT {WORD_COLUMNS} FROM words {where_clause} ORDER BY id");

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), word_from_row)?;

        let mut words = Vec::new();
        for row in rows {
            let word = row?;
            // ids and unicode aware search are applied here
            if filter.matches(&word) {
                words.push(word);
            }
        }
        Ok(words)
    }

    fn list_favorite_words(&self) -> Result<Vec<Word>> {
        self.list_words(&WordFilter::favorites())
    }

    fn list_favorite_lists(&self) -> Result<Vec<FavoriteList>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, word_ids FROM favorite_lists ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut lists = Vec::new();
        for row in rows {
            lists.push(favorite_list_from_parts(row?)?);
        }
        Ok(lists)
    }

    fn list_categories(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT name FROM categories UNION SELECT category FROM words ORDER BY 1",
        )?;
        let rows = stmt.query_map([], |row| row.get(0))?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row?);
        }
        Ok(categories)
    }
}

impl ResultRecorder for WordStore {
    fn record_result(&mut self, result: &TestResult) -> Result<i64> {
        self.record_test_result(result)
    }
}

fn validate(word: &NewWord) -> Result<()> {
    for (field, value) in [
        ("german", &word.german),
        ("turkish", &word.turkish),
        ("category", &word.category),
    ] {
        if value.trim().is_empty() {
            return Err(StoreError::invalid(field, "must not be empty"));
        }
    }
    Ok(())
}

fn parse_column<T>(idx: usize, text: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    text.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn word_from_row(row: &Row<'_>) -> rusqlite::Result<Word> {
    let article: Option<String> = row.get(1)?;
    let article = match article.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => Some(parse_column::<Article>(1, text)?),
        _ => None,
    };

    Ok(Word {
        id: row.get(0)?,
        article,
        german: row.get(2)?,
        plural: row.get(3)?,
        plural_suffix: row.get(4)?,
        turkish: row.get(5)?,
        category: row.get(6)?,
        is_favorite: row.get(7)?,
        wo: row.get(8)?,
        wohin: row.get(9)?,
        woher: row.get(10)?,
        description: row.get(11)?,
        notes: row.get(12)?,
        example_sentence: row.get(13)?,
        example_translation: row.get(14)?,
    })
}

fn favorite_list_from_parts((id, name, word_ids): (i64, String, String)) -> Result<FavoriteList> {
    Ok(FavoriteList {
        id,
        name,
        word_ids: serde_json::from_str(&word_ids)?,
    })
}

/// Fixed-width UTC text so that ordering by the column is ordering by time
fn utc_timestamp(at: &DateTime<Local>) -> String {
    at.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn test_result_from_row(row: &Row<'_>) -> rusqlite::Result<TestResult> {
    let taken_at: String = row.get(10)?;
    let taken_at = DateTime::parse_from_rfc3339(&taken_at)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(10, Type::Text, Box::new(e)))?
        .with_timezone(&Local);

    Ok(TestResult {
        id: Some(row.get(0)?),
        mode: parse_column(1, &row.get::<_, String>(1)?)?,
        test_type: parse_column(2, &row.get::<_, String>(2)?)?,
        source: parse_column(3, &row.get::<_, String>(3)?)?,
        category: row.get(4)?,
        favorite_list: row.get(5)?,
        question_count: row.get::<_, i64>(6)? as usize,
        correct_answers: row.get::<_, i64>(7)? as usize,
        total_questions: row.get::<_, i64>(8)? as usize,
        score: row.get(9)?,
        taken_at,
    })
}
