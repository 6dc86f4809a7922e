use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid input file {path:?}: {reason}")]
    InvalidInput { path: PathBuf, reason: String },

    #[error("Ghostscript not found: {0}")]
    ToolNotFound(String),

    #[error("Compression failed (exit code: {}): {diagnostics}", exit_code_display(.exit_code))]
    CompressionFailed {
        exit_code: Option<i32>,
        diagnostics: String,
    },

    #[error("Size reduction is not computable for a zero-byte original")]
    NotComputable,

    #[error("Compression timed out after {0:?}")]
    Timeout(Duration),

    #[error("Compression was cancelled")]
    Cancelled,

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error("No PDF files found in input path: {0}")]
    NoPdfFilesFound(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Batch file count limit exceeded: {0} files, maximum allowed {1}")]
    BatchFileLimitExceeded(usize, usize),

    #[error("Failed to load PDF: {0}")]
    PdfLoad(String),
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "terminated by signal".to_string(),
    }
}

impl CompressionError {
    pub fn invalid_input(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        CompressionError::InvalidInput {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Exit code of the external tool, when the error came from one
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            CompressionError::CompressionFailed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
