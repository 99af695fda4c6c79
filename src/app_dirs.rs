use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn db_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("wortquiz");
            Some(state_dir.join("words.db"))
        } else {
            ProjectDirs::from("", "", "wortquiz")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("words.db"))
        }
    }

    pub fn config_path() -> PathBuf {
        match ProjectDirs::from("", "", "wortquiz") {
            Some(pd) => pd.config_dir().join("config.json"),
            None => PathBuf::from("wortquiz_config.json"),
        }
    }
}
