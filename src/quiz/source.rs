use super::mode::TestSource;
use crate::error::StoreError;
use crate::word::{FavoriteList, Word, WordFilter};
use serde::{Deserialize, Serialize};

/// Favorite list selector value meaning "every word flagged as favorite"
pub const ALL_FAVORITES: &str = "all";

/// Read access the quiz needs from the word store
pub trait WordRepository {
    fn list_words(&self, filter: &WordFilter) -> Result<Vec<Word>, StoreError>;
    fn list_favorite_words(&self) -> Result<Vec<Word>, StoreError>;
    fn list_favorite_lists(&self) -> Result<Vec<FavoriteList>, StoreError>;
    fn list_categories(&self) -> Result<Vec<String>, StoreError>;
}

/// Configured source of a quiz plus the filter value its variant requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSelection {
    pub source: TestSource,
    pub category: Option<String>,
    pub favorite_list: Option<String>,
}

impl SourceSelection {
    pub fn wordlist() -> Self {
        Self {
            source: TestSource::Wordlist,
            category: None,
            favorite_list: None,
        }
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            source: TestSource::Category,
            category: Some(category.into()),
            favorite_list: None,
        }
    }

    pub fn favorites(list: impl Into<String>) -> Self {
        Self {
            source: TestSource::Favorites,
            category: None,
            favorite_list: Some(list.into()),
        }
    }

    /// A source whose filter value is missing cannot produce a pool yet
    pub fn is_ready(&self) -> bool {
        match self.source {
            TestSource::Wordlist => true,
            TestSource::Category => selected(&self.category).is_some(),
            TestSource::Favorites => selected(&self.favorite_list).is_some(),
        }
    }

    /// Short human readable description, e.g. "category Essen"
    pub fn describe(&self) -> String {
        match self.source {
            TestSource::Wordlist => "all words".to_string(),
            TestSource::Category => {
                format!("category {}", selected(&self.category).unwrap_or("-"))
            }
            TestSource::Favorites => match selected(&self.favorite_list) {
                Some(ALL_FAVORITES) => "all favorites".to_string(),
                Some(list) => format!("favorite list {list}"),
                None => "favorites".to_string(),
            },
        }
    }
}

impl Default for SourceSelection {
    fn default() -> Self {
        Self::wordlist()
    }
}

fn selected(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Resolves the candidate pool from in-memory words and favorite lists.
///
/// Missing selections and unknown list ids give an empty pool rather than an error.
pub fn select_words(
    words: &[Word],
    favorite_lists: &[FavoriteList],
    selection: &SourceSelection,
) -> Vec<Word> {
    match selection.source {
        TestSource::Wordlist => words.to_vec(),
        TestSource::Category => match selected(&selection.category) {
            Some(category) => words
                .iter()
                .filter(|w| w.category == category)
                .cloned()
                .collect(),
            None => Vec::new(),
        },
        TestSource::Favorites => match selected(&selection.favorite_list) {
            Some(ALL_FAVORITES) => words.iter().filter(|w| w.is_favorite).cloned().collect(),
            Some(list_id) => favorite_lists
                .iter()
                .find(|list| list.id.to_string() == list_id)
                .map(|list| words.iter().filter(|w| list.contains(w)).cloned().collect())
                .unwrap_or_default(),
            None => Vec::new(),
        },
    }
}

/// Resolves the candidate pool through a repository
pub fn resolve_pool<R: WordRepository + ?Sized>(
    repo: &R,
    selection: &SourceSelection,
) -> Result<Vec<Word>, StoreError> {
    let pool = match selection.source {
        TestSource::Wordlist => repo.list_words(&WordFilter::default())?,
        TestSource::Category => match selected(&selection.category) {
            Some(category) => repo.list_words(&WordFilter::category(category))?,
            None => Vec::new(),
        },
        TestSource::Favorites => match selected(&selection.favorite_list) {
            Some(ALL_FAVORITES) => repo.list_favorite_words()?,
            Some(list_id) => {
                let lists = repo.list_favorite_lists()?;
                match lists.into_iter().find(|list| list.id.to_string() == list_id) {
                    Some(list) => {
                        let ids: Vec<i64> = list
                            .word_ids
                            .iter()
                            .filter_map(|id| id.trim().parse().ok())
                            .collect();
                        repo.list_words(&WordFilter {
                            ids: Some(ids),
                            ..Default::default()
                        })?
                    }
                    None => Vec::new(),
                }
            }
            None => Vec::new(),
        },
    };

    tracing::debug!(source = %selection.describe(), words = pool.len(), "resolved word pool");
    Ok(pool)
}
