use crate::constants::{COMPRESSED_SIZE_PREFIX, ORIGINAL_SIZE_PREFIX, REDUCTION_PREFIX};
use crate::error::{CompressionError, Result};
use crate::utils::format_file_size;
use std::fmt;
use std::path::{Path, PathBuf};

/// Size change between the original and the compressed file
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reduction {
    /// `100 × (1 − compressed / original)`; negative when the output grew
    Percent(f64),
    /// The original was empty, so there is nothing to divide by
    NotComputable,
}

impl Reduction {
    pub fn from_sizes(original_size: u64, compressed_size: u64) -> Self {
        if original_size == 0 {
            return Reduction::NotComputable;
        }
        Reduction::Percent(100.0 * (1.0 - compressed_size as f64 / original_size as f64))
    }

    pub fn percent(&self) -> Option<f64> {
        match self {
            Reduction::Percent(value) => Some(*value),
            Reduction::NotComputable => None,
        }
    }
}

impl fmt::Display for Reduction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reduction::Percent(value) => write!(f, "{:.2}%", value),
            Reduction::NotComputable => f.write_str("not computable (original is empty)"),
        }
    }
}

/// Report of one successful compression run
#[derive(Debug, Clone, PartialEq)]
pub struct CompressionResult {
    pub output_path: PathBuf,
    pub original_size_bytes: u64,
    pub compressed_size_bytes: u64,
    pub reduction: Reduction,
}

impl CompressionResult {
    pub fn new(output_path: impl Into<PathBuf>, original_size: u64, compressed_size: u64) -> Self {
        Self {
            output_path: output_path.into(),
            original_size_bytes: original_size,
            compressed_size_bytes: compressed_size,
            reduction: Reduction::from_sizes(original_size, compressed_size),
        }
    }

    pub fn output(&self) -> &Path {
        &self.output_path
    }

    /// The reduction percentage, or `NotComputable` for an empty original
    pub fn reduction_percent(&self) -> Result<f64> {
        self.reduction
            .percent()
            .ok_or(CompressionError::NotComputable)
    }

    /// Bytes saved; negative when the output is larger
    pub fn bytes_saved(&self) -> i128 {
        self.original_size_bytes as i128 - self.compressed_size_bytes as i128
    }
}

/// Print the before/after report for a finished run
pub fn print_compression_result(result: &CompressionResult) {
    crate::success!("Compressed PDF saved at: {}", result.output_path.display());
    crate::info!(
        "{} {} ({})",
        ORIGINAL_SIZE_PREFIX,
        result.original_size_bytes,
        format_file_size(result.original_size_bytes)
    );
    crate::info!(
        "{} {} ({})",
        COMPRESSED_SIZE_PREFIX,
        result.compressed_size_bytes,
        format_file_size(result.compressed_size_bytes)
    );

    match result.reduction {
        Reduction::Percent(value) if value >= 0.0 => {
            crate::info!("{} {:.2}%", REDUCTION_PREFIX, value);
        }
        Reduction::Percent(value) => {
            crate::warn!("File size increased by {:.2}%", value.abs());
        }
        Reduction::NotComputable => {
            crate::warn!("Size reduction {}", result.reduction);
        }
    }
}
