//! Bulk import of words from comma, semicolon or tab separated files.
//!
//! The first row names the columns. `german`, `turkish` and `category` are required, every
//! other column is optional and may be left empty. Column names are matched in snake_case
//! or camelCase, case-insensitively (`example_sentence` / `exampleSentence`).

use crate::error::ImportError;
use crate::quiz::source::WordRepository;
use crate::store::WordStore;
use crate::word::{Article, NewWord, WordFilter};
use serde::Deserialize;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ImportRecord {
    article: String,
    german: String,
    plural: String,
    #[serde(alias = "pluralsuffix")]
    plural_suffix: String,
    turkish: String,
    category: String,
    #[serde(alias = "isfavorite")]
    is_favorite: String,
    wo: String,
    wohin: String,
    woher: String,
    description: String,
    notes: String,
    #[serde(alias = "examplesentence")]
    example_sentence: String,
    #[serde(alias = "exampletranslation")]
    example_translation: String,
}

fn optional(text: String) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl ImportRecord {
    fn into_new_word(self) -> Result<NewWord, String> {
        let article = match optional(self.article) {
            Some(text) => Some(text.parse::<Article>().map_err(|e| e.to_string())?),
            None => None,
        };
        let word = NewWord {
            article,
            german: self.german.trim().to_string(),
            plural: optional(self.plural),
            plural_suffix: optional(self.plural_suffix),
            turkish: self.turkish.trim().to_string(),
            category: self.category.trim().to_string(),
            is_favorite: matches!(
                self.is_favorite.trim().to_lowercase().as_str(),
                "1" | "true" | "yes" | "ja" | "evet"
            ),
            wo: optional(self.wo),
            wohin: optional(self.wohin),
            woher: optional(self.woher),
            description: optional(self.description),
            notes: optional(self.notes),
            example_sentence: optional(self.example_sentence),
            example_translation: optional(self.example_translation),
        };
        for (name, value) in [
            ("german", &word.german),
            ("turkish", &word.turkish),
            ("category", &word.category),
        ] {
            if value.is_empty() {
                return Err(format!("missing {name}"));
            }
        }
        Ok(word)
    }
}

/// A row that was not imported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based line number in the source, header included
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub imported: usize,
    pub skipped: Vec<SkippedRow>,
}

/// Guesses the field delimiter from the file name and the header line
pub fn detect_delimiter(file_name: Option<&str>, header: &str) -> u8 {
    if let Some(name) = file_name {
        if name.to_lowercase().ends_with(".tsv") {
            return b'\t';
        }
    }
    if header.contains('\t') {
        b'\t'
    } else if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

/// Parses delimited text into insert payloads; rows that fail are reported, not fatal
pub fn parse_words<R: Read>(
    reader: R,
    delimiter: u8,
) -> Result<(Vec<(u64, NewWord)>, Vec<SkippedRow>), ImportError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    // Normalize header names so "German" and "german" both work
    let headers = rdr.headers()?.clone();
    let normalized: csv::StringRecord = headers
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_lowercase())
        .collect();
    rdr.set_headers(normalized);

    let mut words = Vec::new();
    let mut skipped = Vec::new();
    for (index, row) in rdr.deserialize::<ImportRecord>().enumerate() {
        // header is line 1
        let line = index as u64 + 2;
        match row.map_err(|e| e.to_string()).and_then(ImportRecord::into_new_word) {
            Ok(word) => words.push((line, word)),
            Err(reason) => skipped.push(SkippedRow { line, reason }),
        }
    }
    Ok((words, skipped))
}

/// Imports delimited text into the store, skipping words already present in the same category
pub fn import_str(
    store: &WordStore,
    data: &str,
    delimiter: u8,
) -> Result<ImportReport, ImportError> {
    let (words, mut skipped) = parse_words(data.as_bytes(), delimiter)?;

    let mut known: HashSet<(String, String)> = store
        .list_words(&WordFilter::default())?
        .into_iter()
        .map(|w| (w.german.to_lowercase(), w.category))
        .collect();

    let mut imported = 0;
    for (line, word) in words {
        let key = (word.german.to_lowercase(), word.category.clone());
        if known.contains(&key) {
            skipped.push(SkippedRow {
                line,
                reason: format!("'{}' already exists in {}", word.german, word.category),
            });
            continue;
        }
        store.add_word(&word)?;
        known.insert(key);
        imported += 1;
    }

    for row in &skipped {
        tracing::warn!(line = row.line, reason = %row.reason, "skipped import row");
    }
    tracing::info!(imported, skipped = skipped.len(), "import finished");
    Ok(ImportReport { imported, skipped })
}

pub fn import_file<P: AsRef<Path>>(
    store: &WordStore,
    path: P,
) -> Result<ImportReport, ImportError> {
    let path = path.as_ref();
    let data = std::fs::read_to_string(path)?;
    let header = data.lines().next().unwrap_or_default();
    let file_name = path.file_name().and_then(|n| n.to_str());
    let delimiter = detect_delimiter(file_name, header);
    import_str(store, &data, delimiter)
}
