use crate::error::{CompressionError, Result};
use std::fs::{self, File};
use std::path::Path;

/// Validate the input file and return its size in bytes.
///
/// Runs before Ghostscript is launched so a bad input never costs a process.
pub fn validate_input_file(path: &Path) -> Result<u64> {
    if !path.exists() {
        return Err(CompressionError::invalid_input(path, "file does not exist"));
    }

    if !path.is_file() {
        return Err(CompressionError::invalid_input(path, "not a regular file"));
    }

    File::open(path).map_err(|e| {
        CompressionError::invalid_input(path, format!("file is not readable: {}", e))
    })?;

    let metadata = fs::metadata(path)
        .map_err(|e| CompressionError::invalid_input(path, format!("cannot stat file: {}", e)))?;

    Ok(metadata.len())
}

/// Validate that the output path can be written: it names a file and its
/// parent directory already exists.
pub fn validate_output_path(path: &Path) -> Result<()> {
    if path.file_name().is_none() {
        return Err(CompressionError::InvalidArgument(format!(
            "output path {:?} does not name a file",
            path
        )));
    }

    if path.is_dir() {
        return Err(CompressionError::InvalidArgument(format!(
            "output path {:?} is a directory",
            path
        )));
    }

    // A bare file name lives in the current directory
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => return Ok(()),
    };

    if !parent.is_dir() {
        return Err(CompressionError::InvalidArgument(format!(
            "output directory {:?} does not exist",
            parent
        )));
    }

    Ok(())
}

/// True when both paths resolve to the same existing file
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Check if the file extension indicates a PDF
pub fn is_pdf_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(crate::constants::PDF_EXTENSION))
        .unwrap_or(false)
}
