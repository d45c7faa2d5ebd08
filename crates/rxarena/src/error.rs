use rxarena_corpus::ParseError;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read corpus file '{path}'")]
    ReadCorpus {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse corpus file '{path}': {message}")]
    ParseCorpus { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Walkdir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl Error {
    pub fn from_parse(path: &Path, err: ParseError) -> Self {
        match err {
            ParseError::Io(source) => Error::ReadCorpus {
                path: path.to_path_buf(),
                source,
            },
            ParseError::Parse { .. } => Error::ParseCorpus {
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
