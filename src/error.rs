use std::{io, path::PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error for key `{key}`: {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },
    #[error("could not serialize value for key `{key}`: {source}")]
    Serialize {
        key: String,
        #[source]
        source: ron::Error,
    },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ron::error::SpannedError,
    },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("game session has shut down")]
    Closed,
    #[error("unexpected response from game session")]
    UnexpectedResponse,
}
