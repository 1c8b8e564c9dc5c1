use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  /// Reading or writing one of the run's files failed.
  #[error("I/O error for {}: {}", .path.display(), .source)]
  Io {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// An I/O failure on a writer (or any stream) with no known path.
  #[error(transparent)]
  Stream(#[from] io::Error),

  /// Reading an input stream with no known path failed.
  #[error("read error: {0}")]
  Read(#[source] io::Error),

  #[error("pronunciation not found for word {word}")]
  PronunciationNotFound { word: String },

  /// A dictionary line that is neither a comment nor a well-formed entry.
  #[error("malformed dictionary line {line}: {message}")]
  Dictionary { line: usize, message: String },

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),
}

impl Error {
  pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
    Error::Io { path: path.into(), source }
  }

  /// Attaches `path` to a read failure.
  pub fn reading(self, path: &Path) -> Self {
    match self {
      Error::Read(source) => Error::Io { path: path.to_owned(), source },
      other => other,
    }
  }

  /// Attaches `path` to a bare stream failure.
  pub fn at(self, path: &Path) -> Self {
    match self {
      Error::Stream(source) => Error::Io { path: path.to_owned(), source },
      other => other,
    }
  }
}
