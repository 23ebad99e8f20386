use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to initialize schema: {0}")]
    Schema(#[source] rusqlite::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("point already exists: {0}")]
    PointExists(String),

    #[error("photo already exists: {0}")]
    PhotoExists(String),

    #[error("point not found: {0}")]
    UnknownPoint(String),

    #[error("failed to copy {}: {source}", .path.display())]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source has no file name: {}", .0.display())]
    InvalidSource(PathBuf),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

pub type Result<T> = std::result::Result<T, Error>;
