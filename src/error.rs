use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{file} is missing from {origin}")]
    MissingDataset { file: &'static str, origin: String },

    #[error("failed to parse {file}: {error}")]
    Parse {
        file: &'static str,
        #[source]
        error: serde_json::Error,
    },

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("snapshot directory does not exist: {0}")]
    DataDir(PathBuf),

    #[error("server error: {0}")]
    Server(String),
}
