use crate::error::ImportError;
use crate::import::{detect_delimiter, import_str, ImportReport};
use crate::store::WordStore;
use include_dir::{include_dir, Dir};

static SEED_DIR: Dir = include_dir!("src/seed");

/// Name of the vocabulary bundled with the binary
pub const DEFAULT_SEED: &str = "grundwortschatz";

/// Names of all bundled vocabularies
pub fn available() -> Vec<String> {
    let mut names: Vec<String> = SEED_DIR
        .files()
        .filter(|f| f.path().extension().is_some_and(|ext| ext == "tsv"))
        .filter_map(|f| f.path().file_stem()?.to_str().map(str::to_string))
        .collect();
    names.sort();
    names
}

fn read_seed(name: &str) -> Result<&'static str, ImportError> {
    SEED_DIR
        .get_file(format!("{name}.tsv"))
        .and_then(|file| file.contents_utf8())
        .ok_or_else(|| ImportError::MissingSeed(name.to_string()))
}

/// Imports a bundled vocabulary; words already in the store are skipped
pub fn load_seed(store: &WordStore, name: &str) -> Result<ImportReport, ImportError> {
    let data = read_seed(name)?;
    let header = data.lines().next().unwrap_or_default();
    import_str(store, data, detect_delimiter(Some(&format!("{name}.tsv")), header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::source::WordRepository;
    use crate::quiz::TestMode;
    use crate::word::WordFilter;
    use assert_matches::assert_matches;

    #[test]
    fn test_default_seed_is_bundled() {
        assert!(available().contains(&DEFAULT_SEED.to_string()));
    }

    #[test]
    fn test_load_seed_imports_every_row() {
        let store = WordStore::open_in_memory().unwrap();
        let report = load_seed(&store, DEFAULT_SEED).unwrap();
        assert!(report.skipped.is_empty(), "{:?}", report.skipped);
        assert_eq!(report.imported, 20);

        let words = store.list_words(&WordFilter::default()).unwrap();
        assert!(words.iter().any(|w| TestMode::Wo.is_eligible(w)));
        assert!(words.iter().any(|w| TestMode::Sentence.is_eligible(w)));
        assert!(words.iter().any(|w| !TestMode::Artikel.is_eligible(w)));
        assert_eq!(
            store.list_categories().unwrap(),
            vec!["Adjektive", "Essen", "Orte", "Verben", "Verkehr"]
        );
    }

    #[test]
    fn test_loading_twice_skips_duplicates() {
        let store = WordStore::open_in_memory().unwrap();
        load_seed(&store, DEFAULT_SEED).unwrap();
        let again = load_seed(&store, DEFAULT_SEED).unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(store.count_words().unwrap(), 20);
    }

    #[test]
    fn test_unknown_seed() {
        let store = WordStore::open_in_memory().unwrap();
        assert_matches!(
            load_seed(&store, "a1"),
            Err(ImportError::MissingSeed(name)) if name == "a1"
        );
    }
}
