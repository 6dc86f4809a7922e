//! Ghostscript quality presets
//!
//! Each preset maps onto one of Ghostscript's `-dPDFSETTINGS` bundles, which
//! trade output size against image resolution and fidelity.

use crate::error::{CompressionError, Result};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum QualityPreset {
    /// 72 dpi images, smallest output
    #[default]
    Screen,
    /// 150 dpi images, suitable for e-readers
    Ebook,
    /// 300 dpi images for office printing
    Printer,
    /// 300 dpi with color preservation for press output
    Prepress,
}

impl QualityPreset {
    pub fn all() -> [QualityPreset; 4] {
        [
            QualityPreset::Screen,
            QualityPreset::Ebook,
            QualityPreset::Printer,
            QualityPreset::Prepress,
        ]
    }

    /// Name as Ghostscript spells it after the leading slash
    pub fn name(&self) -> &'static str {
        match self {
            QualityPreset::Screen => "screen",
            QualityPreset::Ebook => "ebook",
            QualityPreset::Printer => "printer",
            QualityPreset::Prepress => "prepress",
        }
    }

    pub fn pdf_settings_flag(&self) -> String {
        format!("-dPDFSETTINGS=/{}", self.name())
    }

    pub fn description(&self) -> &'static str {
        match self {
            QualityPreset::Screen => "Low resolution (72 dpi), smallest files for on-screen viewing",
            QualityPreset::Ebook => "Medium resolution (150 dpi), good balance for e-readers",
            QualityPreset::Printer => "High resolution (300 dpi) for desktop printing",
            QualityPreset::Prepress => "High resolution (300 dpi) preserving color for press",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::all().iter().map(QualityPreset::name).collect()
    }
}

impl fmt::Display for QualityPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityPreset {
    type Err = CompressionError;

    fn from_str(s: &str) -> Result<Self> {
        // Accept the Ghostscript spelling with a leading slash too
        match s.trim().trim_start_matches('/').to_lowercase().as_str() {
            "screen" => Ok(QualityPreset::Screen),
            "ebook" => Ok(QualityPreset::Ebook),
            "printer" => Ok(QualityPreset::Printer),
            "prepress" => Ok(QualityPreset::Prepress),
            _ => Err(CompressionError::InvalidArgument(format!(
                "unknown quality preset '{}', expected one of: {}",
                s,
                QualityPreset::names().join(", ")
            ))),
        }
    }
}
