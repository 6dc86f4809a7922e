use crate::constants::MAX_BATCH_FILES;
use crate::error::{CompressionError, Result};
use crate::launcher::ProcessLauncher;
use crate::preset::QualityPreset;
use crate::report::Reduction;
use crate::request::CompressionRequest;
use crate::runner::CompressionRunner;
use crate::utils::{create_progress_bar, format_file_size};
use crate::validation::{is_pdf_file, is_same_file};
use glob::glob;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use walkdir::WalkDir;

/// Totals for one batch run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
    pub total_original_bytes: u64,
    pub total_compressed_bytes: u64,
    pub elapsed: Duration,
}

impl BatchSummary {
    pub fn reduction(&self) -> Reduction {
        Reduction::from_sizes(self.total_original_bytes, self.total_compressed_bytes)
    }
}

pub fn batch_compress_pdfs<L: ProcessLauncher>(
    runner: &CompressionRunner<L>,
    input: &str,
    output: &Path,
    preset: QualityPreset,
    recursive: bool,
    threads: Option<usize>,
) -> Result<BatchSummary> {
    crate::info!("🚀 Starting batch compression...");
    crate::info!("📁 Input: {}", input);
    crate::info!("📁 Output: {}", output.display());
    crate::info!("🎚️  Quality preset: {}", preset);

    let start_time = Instant::now();

    let pdf_files = collect_pdf_files(input, recursive)?;
    let total_files = pdf_files.len();

    if total_files == 0 {
        crate::warn!("No PDF files found in the input path");
        return Ok(BatchSummary {
            processed: 0,
            failed: 0,
            total_original_bytes: 0,
            total_compressed_bytes: 0,
            elapsed: start_time.elapsed(),
        });
    }

    if total_files > MAX_BATCH_FILES {
        return Err(CompressionError::BatchFileLimitExceeded(
            total_files,
            MAX_BATCH_FILES,
        ));
    }

    crate::info!("📊 Found {} PDF files to process", total_files);

    fs::create_dir_all(output)
        .map_err(|_| CompressionError::DirectoryCreationFailed(output.to_path_buf()))?;

    // Each file already costs one Ghostscript process, so cap the pool
    let parallelism = threads
        .unwrap_or_else(num_cpus::get)
        .clamp(1, total_files);
    crate::info!("⚙️  Using {} parallel workers", parallelism);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(parallelism)
        .build()
        .map_err(|e| CompressionError::Io(std::io::Error::other(e)))?;

    let jobs = plan_output_paths(&pdf_files, output)?;

    let progress = create_progress_bar(total_files as u64);
    let processed_count = AtomicUsize::new(0);
    let total_size_before = AtomicU64::new(0);
    let total_size_after = AtomicU64::new(0);

    let failed_count = pool.install(|| {
        jobs.par_iter()
            .map(|(input_path, output_path)| {
                let outcome = process_single_pdf(runner, input_path, output_path, preset);
                progress.inc(1);
                match outcome {
                    Ok((before, after)) => {
                        total_size_before.fetch_add(before, Ordering::Relaxed);
                        total_size_after.fetch_add(after, Ordering::Relaxed);
                        processed_count.fetch_add(1, Ordering::Relaxed);
                        0usize
                    }
                    Err(e) => {
                        progress.suspend(|| {
                            crate::error!("Failed to process {}: {}", input_path.display(), e);
                        });
                        1usize
                    }
                }
            })
            .sum::<usize>()
    });

    progress.finish_with_message("✅ Batch compression complete");

    let summary = BatchSummary {
        processed: processed_count.load(Ordering::Relaxed),
        failed: failed_count,
        total_original_bytes: total_size_before.load(Ordering::Relaxed),
        total_compressed_bytes: total_size_after.load(Ordering::Relaxed),
        elapsed: start_time.elapsed(),
    };
    print_batch_summary(&summary);

    Ok(summary)
}

fn print_batch_summary(summary: &BatchSummary) {
    crate::info!("\n📊 Batch Compression Summary:");
    crate::info!("  📁 Total files processed: {}", summary.processed);
    crate::info!(
        "  📊 Total original size: {} bytes ({})",
        summary.total_original_bytes,
        format_file_size(summary.total_original_bytes)
    );
    crate::info!(
        "  📊 Total compressed size: {} bytes ({})",
        summary.total_compressed_bytes,
        format_file_size(summary.total_compressed_bytes)
    );
    crate::info!("  🎯 Overall reduction: {}", summary.reduction());
    crate::info!("  ⏱️  Total time: {:?}", summary.elapsed);

    if summary.failed > 0 {
        crate::warn!("Failed files: {}", summary.failed);
    }
}

fn process_single_pdf<L: ProcessLauncher>(
    runner: &CompressionRunner<L>,
    input_path: &Path,
    output_path: &Path,
    preset: QualityPreset,
) -> Result<(u64, u64)> {
    if is_same_file(input_path, output_path) {
        return Err(CompressionError::InvalidArgument(format!(
            "output would overwrite the input {}",
            input_path.display()
        )));
    }

    let request = CompressionRequest::new(input_path, output_path, preset);
    match runner.run(&request) {
        Ok(result) => Ok((result.original_size_bytes, result.compressed_size_bytes)),
        Err(e) => {
            // Don't leave a half-written PDF behind
            if matches!(
                e,
                CompressionError::CompressionFailed { .. } | CompressionError::Timeout(_)
            ) {
                let _ = fs::remove_file(output_path);
            }
            Err(e)
        }
    }
}

pub fn generate_output_path(input_path: &Path, output_dir: &Path) -> Result<PathBuf> {
    let file_stem = input_path
        .file_stem()
        .ok_or_else(|| CompressionError::InvalidArgument("Invalid file name".to_string()))?;

    let output_filename = format!("{}.pdf", file_stem.to_string_lossy());
    Ok(output_dir.join(output_filename))
}

/// Pair every input with its own output file.
///
/// Inputs sharing a stem (`x/report.pdf` and `y/report.pdf`, or `a.pdf` and
/// `a.PDF`) would otherwise race on one output; later ones get a numeric
/// suffix (`report-1.pdf`). Names are compared case-insensitively so the
/// plan also holds on case-insensitive filesystems.
pub fn plan_output_paths(inputs: &[PathBuf], output_dir: &Path) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut taken = HashSet::new();
    let mut jobs = Vec::with_capacity(inputs.len());

    for input_path in inputs {
        let mut output_path = generate_output_path(input_path, output_dir)?;
        let stem = output_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut suffix = 0usize;
        while !taken.insert(output_key(&output_path)) {
            suffix += 1;
            output_path = output_dir.join(format!("{}-{}.pdf", stem, suffix));
        }
        if suffix > 0 {
            crate::verbose!(
                "{} shares its name with another input, writing {}",
                input_path.display(),
                output_path.display()
            );
        }
        jobs.push((input_path.clone(), output_path));
    }

    Ok(jobs)
}

fn output_key(path: &Path) -> String {
    path.to_string_lossy().to_lowercase()
}

/// Collect PDF files from a single file, a directory, or a glob pattern.
pub fn collect_pdf_files(input: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut pdf_files = Vec::new();
    let input_path = Path::new(input);

    if input_path.is_file() {
        if is_pdf_file(input_path) {
            pdf_files.push(input_path.canonicalize()?);
        }
    } else if input_path.is_dir() {
        let walker = if recursive {
            WalkDir::new(input_path)
        } else {
            WalkDir::new(input_path).max_depth(1)
        };

        for entry in walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'))
        {
            let entry = entry?;
            let path = entry.path();

            if path.is_file() && is_pdf_file(path) {
                if let Ok(canonical_path) = path.canonicalize() {
                    pdf_files.push(canonical_path);
                }
            }
        }
    } else {
        let pattern =
            glob(input).map_err(|_| CompressionError::NoPdfFilesFound(input.to_string()))?;
        for entry in pattern.flatten() {
            if entry.is_file() && is_pdf_file(&entry) {
                if let Ok(canonical_path) = entry.canonicalize() {
                    pdf_files.push(canonical_path);
                }
            }
        }
    }

    pdf_files.sort();
    pdf_files.dedup();
    Ok(pdf_files)
}
