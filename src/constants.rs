use std::time::Duration;

/// Ghostscript output device for PDF rewriting
pub const PDF_DEVICE: &str = "pdfwrite";
/// PDF compatibility level written into every output file
pub const COMPATIBILITY_LEVEL: &str = "1.4";

#[cfg(windows)]
pub const GHOSTSCRIPT_CANDIDATES: &[&str] = &["gswin64c", "gswin32c", "gs"];
#[cfg(not(windows))]
pub const GHOSTSCRIPT_CANDIDATES: &[&str] = &["gs"];

/// Environment variable overriding the Ghostscript binary
pub const GHOSTSCRIPT_ENV: &str = "PDF_SQUEEZE_GS";

pub const PDF_EXTENSION: &str = "pdf";
pub const PDF_HEADER_MAGIC: &[u8] = b"%PDF-";
pub const PDF_HEADER_PROBE_LEN: usize = 16;

pub const MAX_BATCH_FILES: usize = 1000;

/// How often a running child is polled for exit, timeout and cancellation
pub const CHILD_POLL_INTERVAL: Duration = Duration::from_millis(25);

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

// Size thresholds used for preset suggestions
pub const LARGE_PDF_BYTES: u64 = 20 * 1024 * 1024;
pub const MEDIUM_PDF_BYTES: u64 = 5 * 1024 * 1024;

// Common output message prefixes
pub const ORIGINAL_SIZE_PREFIX: &str = "📊 Original size:";
pub const COMPRESSED_SIZE_PREFIX: &str = "📈 Compressed size:";
pub const REDUCTION_PREFIX: &str = "🎯 Size reduced:";
pub const SUCCESS_PREFIX: &str = "✅";
pub const INFO_PREFIX: &str = "📋";
