// Library surface shared by the binary and the integration tests.
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod import;
pub mod logging;
pub mod quiz;
pub mod seed;
pub mod stats;
pub mod store;
pub mod util;
pub mod word;

pub use error::{Error, ImportError, QuizError, Result, StoreError};
pub use store::WordStore;
pub use word::{Article, FavoriteList, NewWord, Word, WordFilter};
