use std::path::{Path, PathBuf};
use thiserror::Error;

/// Everything that can go wrong while listing a tree or moving a mesh between files.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("No such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid mesh data: {0}")]
    InvalidFormat(String),

    #[error("Unsupported mesh format: {0}")]
    UnsupportedFormat(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl MeshError {
    /// Classify an io error raised while touching `path`.
    ///
    /// The format codecs report malformed content as `InvalidData`,
    /// `InvalidInput` (ply-rs) or `UnexpectedEof`; all of those are `InvalidFormat`.
    pub fn from_io<P: AsRef<Path>>(error: std::io::Error, path: P) -> MeshError {
        match error.kind() {
            std::io::ErrorKind::NotFound => MeshError::NotFound(path.as_ref().to_path_buf()),
            std::io::ErrorKind::InvalidData
            | std::io::ErrorKind::InvalidInput
            | std::io::ErrorKind::UnexpectedEof => {
                MeshError::InvalidFormat(format!("{}: {}", path.as_ref().display(), error))
            }
            _ => MeshError::Io(error),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, MeshError::NotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, MeshError>;
