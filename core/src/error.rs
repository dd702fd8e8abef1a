use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Project directory to scan, or stored index to read, is absent.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("invalid project path: {0}")]
    InvalidPath(String),

    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("corrupt index record: {0}")]
    Corrupt(#[from] bincode::Error),

    #[error("store metadata error: {0}")]
    Meta(#[from] serde_json::Error),

    #[error("unsupported store version {0}")]
    UnsupportedVersion(u32),
}
