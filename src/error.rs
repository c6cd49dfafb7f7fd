use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Recoverable failures. Broken internal invariants panic instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrong command-line arguments.
    #[error("{0}")]
    Usage(String),

    #[error("File cannot be opened: {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode header: {0}")]
    Header(#[from] bincode::Error),

    /// The source contained a byte the tree has no leaf for.
    #[error("No code for byte {0:#04x}; input changed while packing?")]
    MissingCode(u8),

    #[error("Tree has no end-of-stream leaf")]
    NoEndMarker,
}

impl Error {
    /// Whether the CLI reports this and still exits as if successful.
    pub fn is_soft(&self) -> bool {
        matches!(self, Error::Usage(_) | Error::Open { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
