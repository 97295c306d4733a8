use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, UploaderError>;

#[derive(Debug, Error)]
pub enum UploaderError {
    #[error("config error: {0}")]
    Config(String),

    #[error("cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("folder walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("GUI error: {0}")]
    Gui(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
