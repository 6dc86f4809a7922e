use crate::error::{CompressionError, Result};
use crate::preset::QualityPreset;
use std::path::{Path, PathBuf};

/// One compression job: where to read, where to write, and how hard to squeeze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRequest {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub preset: QualityPreset,
}

impl CompressionRequest {
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        preset: QualityPreset,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            preset,
        }
    }

    /// Builds a request from the three raw strings a form or command line
    /// collects. Fails with `InvalidArgument` on an empty path or an
    /// unknown preset name.
    pub fn parse(input: &str, output: &str, preset: &str) -> Result<Self> {
        if input.trim().is_empty() {
            return Err(CompressionError::InvalidArgument(
                "input path must not be empty".to_string(),
            ));
        }
        if output.trim().is_empty() {
            return Err(CompressionError::InvalidArgument(
                "output path must not be empty".to_string(),
            ));
        }
        let preset = preset.parse::<QualityPreset>()?;
        Ok(Self::new(input, output, preset))
    }

    pub fn input(&self) -> &Path {
        &self.input_path
    }

    pub fn output(&self) -> &Path {
        &self.output_path
    }
}
