use crate::app_dirs::AppDirs;
use crate::quiz::{QuizConfig, SourceSelection, TestMode, TestSource, TestType};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub question_count: usize,
    pub mode: TestMode,
    pub test_type: TestType,
    pub source: TestSource,
    pub category: Option<String>,
    pub favorite_list: Option<String>,
    pub auto_finish: bool,
    pub database_path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            question_count: 10,
            mode: TestMode::DeTr,
            test_type: TestType::Multiple,
            source: TestSource::Wordlist,
            category: None,
            favorite_list: None,
            auto_finish: false,
            database_path: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn quiz_config(&self) -> QuizConfig {
        QuizConfig {
            mode: self.mode,
            test_type: self.test_type,
            question_count: self.question_count,
            auto_finish: self.auto_finish,
        }
    }

    pub fn source_selection(&self) -> SourceSelection {
        SourceSelection {
            source: self.source,
            category: self.category.clone(),
            favorite_list: self.favorite_list.clone(),
        }
    }

    /// Copies the quiz settings of a session back into the config
    pub fn remember(&mut self, quiz: &QuizConfig, selection: &SourceSelection) {
        self.mode = quiz.mode;
        self.test_type = quiz.test_type;
        self.question_count = quiz.question_count;
        self.auto_finish = quiz.auto_finish;
        self.source = selection.source;
        self.category = selection.category.clone();
        self.favorite_list = selection.favorite_list.clone();
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(_) => return Config::default(),
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "ignoring unreadable config"
                );
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
