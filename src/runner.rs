use crate::constants::GHOSTSCRIPT_CANDIDATES;
use crate::error::{CompressionError, Result};
use crate::invocation::Invocation;
use crate::launcher::{
    locate_ghostscript, CancelToken, LaunchOptions, ProcessLauncher, SystemLauncher,
};
use crate::preset::QualityPreset;
use crate::report::{print_compression_result, CompressionResult};
use crate::request::CompressionRequest;
use crate::utils::{create_progress_spinner, format_file_size};
use crate::validation::{is_same_file, validate_input_file, validate_output_path};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runs Ghostscript for one request at a time and reports the size change.
#[derive(Debug, Clone)]
pub struct CompressionRunner<L = SystemLauncher> {
    launcher: L,
    program: OsString,
    options: LaunchOptions,
}

impl CompressionRunner<SystemLauncher> {
    /// Runner backed by real processes.
    ///
    /// Uses `gs_path` when given, otherwise whatever Ghostscript is on `PATH`.
    /// When discovery fails the default program name is kept, so the launch
    /// itself reports `ToolNotFound`.
    pub fn system(gs_path: Option<&Path>) -> Self {
        let program = match locate_ghostscript(gs_path) {
            Ok(path) => path.into_os_string(),
            Err(e) => {
                crate::verbose!("{}", e);
                gs_path
                    .map(|p| p.as_os_str().to_os_string())
                    .unwrap_or_else(|| OsString::from(GHOSTSCRIPT_CANDIDATES[0]))
            }
        };
        Self::new(SystemLauncher, program)
    }
}

impl<L: ProcessLauncher> CompressionRunner<L> {
    pub fn new(launcher: L, program: impl Into<OsString>) -> Self {
        Self {
            launcher,
            program: program.into(),
            options: LaunchOptions::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.options.timeout = timeout;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.options.cancel = Some(token);
        self
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn launcher(&self) -> &L {
        &self.launcher
    }

    pub fn launch_options(&self) -> &LaunchOptions {
        &self.options
    }

    pub fn invocation_for(&self, request: &CompressionRequest) -> Invocation {
        Invocation::ghostscript(self.program.clone(), request)
    }

    pub fn run(&self, request: &CompressionRequest) -> Result<CompressionResult> {
        self.run_with(request, &self.options)
    }

    /// Same as [`run`](Self::run) with launch options overriding the runner's own.
    pub fn run_with(
        &self,
        request: &CompressionRequest,
        options: &LaunchOptions,
    ) -> Result<CompressionResult> {
        if request.input().as_os_str().is_empty() {
            return Err(CompressionError::InvalidArgument(
                "input path must not be empty".to_string(),
            ));
        }
        if request.output().as_os_str().is_empty() {
            return Err(CompressionError::InvalidArgument(
                "output path must not be empty".to_string(),
            ));
        }

        // Stat the input up front: it may be overwritten when input == output
        let original_size = validate_input_file(request.input())?;
        validate_output_path(request.output())?;

        if is_same_file(request.input(), request.output()) {
            crate::warn!(
                "Input and output are the same file; the original will be overwritten: {}",
                request.input().display()
            );
        } else {
            // A file left by an earlier run must not pass for fresh output
            remove_stale_output(request.output())?;
        }

        let invocation = self.invocation_for(request);
        crate::verbose!("Running: {}", invocation);

        let output = self.launcher.launch(&invocation, options)?;
        if !output.success() {
            return Err(CompressionError::CompressionFailed {
                exit_code: output.exit_code,
                diagnostics: output.diagnostics(),
            });
        }

        let compressed_size = fs::metadata(request.output())
            .map_err(|e| CompressionError::CompressionFailed {
                exit_code: output.exit_code,
                diagnostics: format!(
                    "Ghostscript reported success but {} is not readable: {}",
                    request.output().display(),
                    e
                ),
            })?
            .len();

        Ok(CompressionResult::new(
            request.output(),
            original_size,
            compressed_size,
        ))
    }
}

fn remove_stale_output(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            crate::verbose!("Removed previous output {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(CompressionError::InvalidArgument(format!(
            "cannot replace existing output {}: {}",
            path.display(),
            e
        ))),
    }
}

/// CLI entry for a single file: runs the compression with a spinner and
/// prints the before/after report.
pub fn compress_pdf<L: ProcessLauncher>(
    runner: &CompressionRunner<L>,
    input: PathBuf,
    output: PathBuf,
    preset: QualityPreset,
) -> Result<CompressionResult> {
    crate::info!("🗜️  Compressing PDF: {}", input.display());
    crate::info!("📁 Output: {}", output.display());
    crate::info!("🎚️  Quality preset: {} ({})", preset, preset.description());

    let request = CompressionRequest::new(input, output, preset);

    let pb = create_progress_spinner("Running Ghostscript...");
    pb.enable_steady_tick(Duration::from_millis(100));
    let result = runner.run(&request);
    match &result {
        Ok(r) => pb.finish_with_message(format!(
            "✅ Compression complete ({})",
            format_file_size(r.compressed_size_bytes)
        )),
        Err(_) => pb.abandon_with_message("❌ Compression failed"),
    }

    let result = result?;
    print_compression_result(&result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invocation::output_file_arg;
    use crate::launcher::ToolOutput;
    use crate::report::Reduction;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Fake Ghostscript: records each invocation and writes `output_len`
    /// bytes to the requested output file.
    struct FakeGhostscript {
        exit_code: Option<i32>,
        output_len: Option<usize>,
        calls: Mutex<Vec<Invocation>>,
    }

    impl FakeGhostscript {
        fn succeeding(output_len: usize) -> Self {
            Self {
                exit_code: Some(0),
                output_len: Some(output_len),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing(code: i32) -> Self {
            Self {
                exit_code: Some(code),
                output_len: None,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl ProcessLauncher for FakeGhostscript {
        fn launch(&self, invocation: &Invocation, _options: &LaunchOptions) -> Result<ToolOutput> {
            self.calls.lock().unwrap().push(invocation.clone());
            if let (Some(len), Some(path)) = (self.output_len, output_file_arg(&invocation.args)) {
                fs::write(path, vec![b'x'; len])?;
            }
            Ok(ToolOutput {
                exit_code: self.exit_code,
                stdout: String::new(),
                stderr: "**** Error: fake failure".to_string(),
            })
        }
    }

    fn write_input(dir: &TempDir, len: usize) -> PathBuf {
        let path = dir.path().join("input.pdf");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&vec![b'%'; len]).unwrap();
        path
    }

    #[test]
    fn test_run_reports_reduction() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 1000);
        let output = temp_dir.path().join("output.pdf");
        let runner = CompressionRunner::new(FakeGhostscript::succeeding(250), "gs");

        let result = runner
            .run(&CompressionRequest::new(&input, &output, QualityPreset::Screen))
            .unwrap();

        assert_eq!(result.original_size_bytes, 1000);
        assert_eq!(result.compressed_size_bytes, 250);
        assert_eq!(result.reduction, Reduction::Percent(75.0));
        assert_eq!(result.output(), output.as_path());
        assert_eq!(runner.launcher().call_count(), 1);
    }

    #[test]
    fn test_run_passes_preset_flag() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 10);
        let output = temp_dir.path().join("output.pdf");
        let runner = CompressionRunner::new(FakeGhostscript::succeeding(5), "gs");

        runner
            .run(&CompressionRequest::new(&input, &output, QualityPreset::Printer))
            .unwrap();

        let calls = runner.launcher().calls.lock().unwrap();
        assert_eq!(calls[0].program, OsString::from("gs"));
        assert_eq!(calls[0].count_flag("-dPDFSETTINGS="), 1);
        assert!(calls[0]
            .args
            .contains(&OsString::from("-dPDFSETTINGS=/printer")));
    }

    #[test]
    fn test_run_nonzero_exit_is_compression_failed() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 100);
        let output = temp_dir.path().join("output.pdf");
        let runner = CompressionRunner::new(FakeGhostscript::failing(1), "gs");

        let err = runner
            .run(&CompressionRequest::new(&input, &output, QualityPreset::Ebook))
            .unwrap_err();

        assert_eq!(err.exit_code(), Some(1));
        match err {
            CompressionError::CompressionFailed { diagnostics, .. } => {
                assert!(diagnostics.contains("fake failure"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_run_missing_output_is_compression_failed() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 100);
        let output = temp_dir.path().join("output.pdf");
        let mut fake = FakeGhostscript::succeeding(0);
        fake.output_len = None;
        let runner = CompressionRunner::new(fake, "gs");

        let result = runner.run(&CompressionRequest::new(&input, &output, QualityPreset::Screen));
        assert!(matches!(
            result,
            Err(CompressionError::CompressionFailed {
                exit_code: Some(0),
                ..
            })
        ));
    }

    #[test]
    fn test_run_leftover_output_is_not_reported() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 1000);
        let output = temp_dir.path().join("output.pdf");
        fs::write(&output, vec![b'x'; 100]).unwrap();
        let mut fake = FakeGhostscript::succeeding(0);
        fake.output_len = None;
        let runner = CompressionRunner::new(fake, "gs");

        let result = runner.run(&CompressionRequest::new(&input, &output, QualityPreset::Screen));
        assert!(matches!(
            result,
            Err(CompressionError::CompressionFailed {
                exit_code: Some(0),
                ..
            })
        ));
        assert_eq!(runner.launcher().call_count(), 1);
    }

    #[test]
    fn test_run_overwrites_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 1000);
        let output = temp_dir.path().join("output.pdf");
        fs::write(&output, vec![b'x'; 100]).unwrap();
        let runner = CompressionRunner::new(FakeGhostscript::succeeding(400), "gs");

        let result = runner
            .run(&CompressionRequest::new(&input, &output, QualityPreset::Screen))
            .unwrap();
        assert_eq!(result.compressed_size_bytes, 400);
        assert_eq!(fs::metadata(&output).unwrap().len(), 400);
    }

    #[test]
    fn test_run_empty_paths_are_invalid_arguments() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 10);
        let runner = CompressionRunner::new(FakeGhostscript::succeeding(10), "gs");

        let no_input = runner.run(&CompressionRequest::new(
            "",
            temp_dir.path().join("output.pdf"),
            QualityPreset::Screen,
        ));
        assert!(matches!(no_input, Err(CompressionError::InvalidArgument(_))));

        let no_output = runner.run(&CompressionRequest::new(&input, "", QualityPreset::Screen));
        assert!(matches!(no_output, Err(CompressionError::InvalidArgument(_))));
        assert_eq!(runner.launcher().call_count(), 0);
    }

    #[test]
    fn test_run_missing_input_does_not_launch() {
        let temp_dir = TempDir::new().unwrap();
        let runner = CompressionRunner::new(FakeGhostscript::succeeding(10), "gs");

        let result = runner.run(&CompressionRequest::new(
            temp_dir.path().join("missing.pdf"),
            temp_dir.path().join("output.pdf"),
            QualityPreset::Screen,
        ));

        assert!(matches!(result, Err(CompressionError::InvalidInput { .. })));
        assert_eq!(runner.launcher().call_count(), 0);
    }

    #[test]
    fn test_run_missing_output_dir_does_not_launch() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 10);
        let runner = CompressionRunner::new(FakeGhostscript::succeeding(10), "gs");

        let result = runner.run(&CompressionRequest::new(
            &input,
            temp_dir.path().join("nope").join("output.pdf"),
            QualityPreset::Screen,
        ));

        assert!(matches!(result, Err(CompressionError::InvalidArgument(_))));
        assert_eq!(runner.launcher().call_count(), 0);
    }

    #[test]
    fn test_run_empty_input_is_not_computable() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 0);
        let output = temp_dir.path().join("output.pdf");
        let runner = CompressionRunner::new(FakeGhostscript::succeeding(300), "gs");

        let result = runner
            .run(&CompressionRequest::new(&input, &output, QualityPreset::Screen))
            .unwrap();

        assert_eq!(result.reduction, Reduction::NotComputable);
        assert!(matches!(
            result.reduction_percent(),
            Err(CompressionError::NotComputable)
        ));
    }

    #[test]
    fn test_system_runner_with_missing_tool() {
        let temp_dir = TempDir::new().unwrap();
        let input = write_input(&temp_dir, 10);
        let runner = CompressionRunner::system(Some(Path::new("/nonexistent/bin/gs")));

        let result = runner.run(&CompressionRequest::new(
            &input,
            temp_dir.path().join("output.pdf"),
            QualityPreset::Screen,
        ));
        assert!(matches!(result, Err(CompressionError::ToolNotFound(_))));
    }
}
