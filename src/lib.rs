pub mod batch;
pub mod cli;
pub mod constants;
pub mod error;
pub mod info;
pub mod invocation;
pub mod launcher;
pub mod logger;
pub mod preset;
pub mod report;
pub mod request;
pub mod runner;
pub mod utils;
pub mod validation;
pub mod worker;

pub use batch::{batch_compress_pdfs, collect_pdf_files, generate_output_path, BatchSummary};
pub use error::{CompressionError, Result};
pub use info::{get_pdf_info, print_pdf_info, PdfInfo};
pub use invocation::Invocation;
pub use launcher::{
    locate_ghostscript, CancelToken, LaunchOptions, ProcessLauncher, SystemLauncher, ToolOutput,
};
pub use preset::QualityPreset;
pub use report::{CompressionResult, Reduction};
pub use request::CompressionRequest;
pub use runner::{compress_pdf, CompressionRunner};
pub use worker::{spawn_compression, CompressionJob};
