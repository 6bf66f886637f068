use std::path::PathBuf;

/// Errors from reading files or walking a project.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} is {size} bytes, over the {limit} byte limit", path.display())]
    TooLarge { path: PathBuf, size: u64, limit: u64 },
    #[error("invalid exclude glob '{pattern}': {message}")]
    InvalidGlob { pattern: String, message: String },
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }
}
