use crate::constants::{
    INFO_PREFIX, LARGE_PDF_BYTES, MEDIUM_PDF_BYTES, PDF_HEADER_MAGIC, PDF_HEADER_PROBE_LEN,
};
use crate::error::{CompressionError, Result};
use crate::preset::QualityPreset;
use crate::utils::format_file_size;
use crate::validation::validate_input_file;
use lopdf::Document;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq)]
pub struct PdfInfo {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Version from the `%PDF-x.y` header, if the file has one
    pub header_version: Option<String>,
    pub page_count: Option<usize>,
    pub object_count: Option<usize>,
    /// Why lopdf could not load the document
    pub load_error: Option<String>,
}

impl PdfInfo {
    pub fn is_pdf(&self) -> bool {
        self.header_version.is_some()
    }

    pub fn suggested_preset(&self) -> QualityPreset {
        suggest_preset(self.size_bytes)
    }
}

pub fn get_pdf_info(input_path: &Path) -> Result<PdfInfo> {
    let size_bytes = validate_input_file(input_path)?;
    let header_version = read_header_version(input_path)?;

    // Page and object counts are best effort; a damaged file still gets a report
    let (page_count, object_count, load_error) = match load_document(input_path) {
        Ok(doc) => (Some(doc.get_pages().len()), Some(doc.objects.len()), None),
        Err(e) => (None, None, Some(e.to_string())),
    };

    Ok(PdfInfo {
        path: input_path.to_path_buf(),
        size_bytes,
        header_version,
        page_count,
        object_count,
        load_error,
    })
}

fn load_document(path: &Path) -> Result<Document> {
    Document::load(path).map_err(|e| CompressionError::PdfLoad(e.to_string()))
}

/// Reads the `%PDF-x.y` header from the first bytes of the file
pub fn read_header_version(path: &Path) -> Result<Option<String>> {
    let mut probe = Vec::with_capacity(PDF_HEADER_PROBE_LEN);
    File::open(path)?
        .take(PDF_HEADER_PROBE_LEN as u64)
        .read_to_end(&mut probe)?;
    Ok(parse_header_version(&probe))
}

fn parse_header_version(bytes: &[u8]) -> Option<String> {
    let rest = bytes.strip_prefix(PDF_HEADER_MAGIC)?;
    let version: String = rest
        .iter()
        .take_while(|b| b.is_ascii_digit() || **b == b'.')
        .map(|&b| b as char)
        .collect();
    if version.is_empty() {
        None
    } else {
        Some(version)
    }
}

pub fn suggest_preset(size_bytes: u64) -> QualityPreset {
    if size_bytes > LARGE_PDF_BYTES {
        QualityPreset::Screen
    } else if size_bytes > MEDIUM_PDF_BYTES {
        QualityPreset::Ebook
    } else {
        QualityPreset::Printer
    }
}

pub fn print_pdf_info(info: &PdfInfo) {
    println!("{} PDF Information:", INFO_PREFIX);
    println!("  📁 File: {}", info.path.display());
    println!(
        "  📦 File size: {} bytes ({})",
        info.size_bytes,
        format_file_size(info.size_bytes)
    );

    match &info.header_version {
        Some(version) => println!("  🏷️  PDF version: {}", version),
        None => println!("  🏷️  PDF version: unknown (missing %PDF header)"),
    }
    if let Some(pages) = info.page_count {
        println!("  📄 Pages: {}", pages);
    }
    if let Some(objects) = info.object_count {
        println!("  🧱 Objects: {}", objects);
    }
    if let Some(reason) = &info.load_error {
        println!("  ⚠️  Could not parse document structure: {}", reason);
    }

    let preset = info.suggested_preset();
    println!("\n💡 Compression Suggestion:");
    println!("  🎯 Try the '{}' preset: {}", preset, preset.description());
}
