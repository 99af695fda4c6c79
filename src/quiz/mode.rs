use crate::word::{non_empty, Word};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quiz category; decides prompt template and which word field is the answer
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TestMode {
    Artikel,
    Plural,
    TrDe,
    DeTr,
    Sentence,
    Wo,
    Wohin,
    Woher,
}

impl TestMode {
    pub const ALL: [TestMode; 8] = [
        TestMode::Artikel,
        TestMode::Plural,
        TestMode::TrDe,
        TestMode::DeTr,
        TestMode::Sentence,
        TestMode::Wo,
        TestMode::Wohin,
        TestMode::Woher,
    ];

    /// Whether a word carries the field this mode asks for
    pub fn is_eligible(&self, word: &Word) -> bool {
        match self {
            TestMode::Artikel => word.article.is_some(),
            TestMode::Plural => non_empty(&word.plural).is_some(),
            TestMode::TrDe | TestMode::DeTr => true,
            TestMode::Sentence => non_empty(&word.example_sentence).is_some(),
            TestMode::Wo => non_empty(&word.wo).is_some(),
            TestMode::Wohin => non_empty(&word.wohin).is_some(),
            TestMode::Woher => non_empty(&word.woher).is_some(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TestMode::Artikel => "Artikel",
            TestMode::Plural => "Plural",
            TestMode::TrDe => "Türkisch → Deutsch",
            TestMode::DeTr => "Deutsch → Türkisch",
            TestMode::Sentence => "Beispielsätze",
            TestMode::Wo => "Wo?",
            TestMode::Wohin => "Wohin?",
            TestMode::Woher => "Woher?",
        }
    }
}

/// How questions are answered
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TestType {
    Multiple,
    Fill,
    Mixed,
}

/// Answer form of a single generated question
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum QuestionKind {
    Multiple,
    Fill,
}

/// Where the candidate words of a session come from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TestSource {
    Wordlist,
    Category,
    Favorites,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl fmt::Display for ParseEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseEnumError {}

fn parse_err(kind: &'static str, value: &str) -> ParseEnumError {
    ParseEnumError {
        kind,
        value: value.to_string(),
    }
}

impl FromStr for TestMode {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TestMode::ALL
            .into_iter()
            .find(|mode| mode.to_string() == s.trim().to_lowercase())
            .ok_or_else(|| parse_err("test mode", s))
    }
}

impl FromStr for TestType {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "multiple" => Ok(TestType::Multiple),
            "fill" => Ok(TestType::Fill),
            "mixed" => Ok(TestType::Mixed),
            _ => Err(parse_err("test type", s)),
        }
    }
}

impl FromStr for TestSource {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "wordlist" => Ok(TestSource::Wordlist),
            "category" => Ok(TestSource::Category),
            "favorites" => Ok(TestSource::Favorites),
            _ => Err(parse_err("test source", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word::tests::word;
    use crate::word::Article;

    #[test]
    fn test_mode_names_roundtrip() {
        let names: Vec<String> = TestMode::ALL.iter().map(|m| m.to_string()).collect();
        assert_eq!(
            names,
            vec!["artikel", "plural", "tr-de", "de-tr", "sentence", "wo", "wohin", "woher"]
        );
        for mode in TestMode::ALL {
            assert_eq!(mode.to_string().parse::<TestMode>().unwrap(), mode);
        }
        assert!("de_tr".parse::<TestMode>().is_err());
    }

    #[test]
    fn test_mode_serde_matches_display() {
        let json = serde_json::to_string(&TestMode::TrDe).unwrap();
        assert_eq!(json, "\"tr-de\"");
        let back: TestMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TestMode::TrDe);
    }

    #[test]
    fn test_eligibility_by_field_presence() {
        let mut w = word(1, None, "Haus", "ev");
        assert!(!TestMode::Artikel.is_eligible(&w));
        assert!(TestMode::DeTr.is_eligible(&w));
        assert!(TestMode::TrDe.is_eligible(&w));
        assert!(!TestMode::Wo.is_eligible(&w));

        w.article = Some(Article::Das);
        w.wo = Some("  ".to_string());
        w.wohin = Some("nach Hause".to_string());
        assert!(TestMode::Artikel.is_eligible(&w));
        assert!(!TestMode::Wo.is_eligible(&w));
        assert!(TestMode::Wohin.is_eligible(&w));
        assert!(!TestMode::Sentence.is_eligible(&w));
        assert!(!TestMode::Plural.is_eligible(&w));
    }

    #[test]
    fn test_parse_type_and_source() {
        assert_eq!("Mixed".parse::<TestType>().unwrap(), TestType::Mixed);
        assert_eq!("favorites".parse::<TestSource>().unwrap(), TestSource::Favorites);
        assert_eq!(
            "list".parse::<TestSource>().unwrap_err().to_string(),
            "unknown test source 'list'"
        );
    }
}
