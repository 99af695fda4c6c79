use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grammatical article of a German noun
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Article {
    Der,
    Die,
    Das,
}

impl Article {
    pub const ALL: [Article; 3] = [Article::Der, Article::Die, Article::Das];

    pub fn as_str(&self) -> &'static str {
        match self {
            Article::Der => "der",
            Article::Die => "die",
            Article::Das => "das",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseArticleError(pub String);

impl fmt::Display for ParseArticleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown article '{}', expected der, die or das", self.0)
    }
}

impl std::error::Error for ParseArticleError {}

impl FromStr for Article {
    type Err = ParseArticleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "der" => Ok(Article::Der),
            "die" => Ok(Article::Die),
            "das" => Ok(Article::Das),
            other => Err(ParseArticleError(other.to_string())),
        }
    }
}

/// A single vocabulary entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub id: i64,
    pub article: Option<Article>,
    pub german: String,
    pub plural: Option<String>,
    pub plural_suffix: Option<String>,
    pub turkish: String,
    pub category: String,
    pub is_favorite: bool,
    pub wo: Option<String>,
    pub wohin: Option<String>,
    pub woher: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub example_sentence: Option<String>,
    pub example_translation: Option<String>,
}

impl Word {
    /// German form with its article in front, e.g. "der Bahnhof"
    pub fn with_article(&self) -> String {
        match self.article {
            Some(article) => format!("{} {}", article, self.german),
            None => self.german.clone(),
        }
    }

    /// Id as used by favorite lists
    pub fn id_key(&self) -> String {
        self.id.to_string()
    }
}

/// Insert payload for a word; everything but the id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewWord {
    pub article: Option<Article>,
    pub german: String,
    pub plural: Option<String>,
    pub plural_suffix: Option<String>,
    pub turkish: String,
    pub category: String,
    #[serde(default)]
    pub is_favorite: bool,
    pub wo: Option<String>,
    pub wohin: Option<String>,
    pub woher: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
    pub example_sentence: Option<String>,
    pub example_translation: Option<String>,
}

impl NewWord {
    pub fn new(
        german: impl Into<String>,
        turkish: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            german: german.into(),
            turkish: turkish.into(),
            category: category.into(),
            ..Default::default()
        }
    }

    pub fn article(mut self, article: Article) -> Self {
        self.article = Some(article);
        self
    }

    pub fn plural(mut self, plural: impl Into<String>) -> Self {
        self.plural = Some(plural.into());
        self
    }

    pub fn into_word(self, id: i64) -> Word {
        Word {
            id,
            article: self.article,
            german: self.german,
            plural: self.plural,
            plural_suffix: self.plural_suffix,
            turkish: self.turkish,
            category: self.category,
            is_favorite: self.is_favorite,
            wo: self.wo,
            wohin: self.wohin,
            woher: self.woher,
            description: self.description,
            notes: self.notes,
            example_sentence: self.example_sentence,
            example_translation: self.example_translation,
        }
    }
}

/// Named, user curated subset of word ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteList {
    pub id: i64,
    pub name: String,
    pub word_ids: Vec<String>,
}

impl FavoriteList {
    pub fn contains(&self, word: &Word) -> bool {
        let key = word.id_key();
        self.word_ids.iter().any(|id| *id == key)
    }
}

/// Criteria for word retrieval. Present criteria are combined with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WordFilter {
    pub category: Option<String>,
    pub favorites_only: bool,
    pub search: Option<String>,
    pub ids: Option<Vec<i64>>,
}

impl WordFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Default::default()
        }
    }

    pub fn favorites() -> Self {
        Self {
            favorites_only: true,
            ..Default::default()
        }
    }

    pub fn matches(&self, word: &Word) -> bool {
        if let Some(ref category) = self.category {
            if word.category != *category {
                return false;
            }
        }
        if self.favorites_only && !word.is_favorite {
            return false;
        }
        if let Some(ref ids) = self.ids {
            if !ids.contains(&word.id) {
                return false;
            }
        }
        if let Some(ref search) = self.search {
            let needle = search.trim().to_lowercase();
            if !needle.is_empty() {
                let hit = [Some(&word.german), Some(&word.turkish), word.plural.as_ref()]
                    .into_iter()
                    .flatten()
                    .any(|text| text.to_lowercase().contains(&needle));
                if !hit {
                    return false;
                }
            }
        }
        true
    }
}

/// Returns the value if it carries non-whitespace text
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
}
