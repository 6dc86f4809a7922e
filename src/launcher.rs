//! Process launching for the external Ghostscript binary.
//!
//! [`ProcessLauncher`] is the seam between the runner and the operating
//! system. [`SystemLauncher`] is the real implementation; tests substitute
//! their own to observe or fake the tool.

use crate::constants::{CHILD_POLL_INTERVAL, GHOSTSCRIPT_CANDIDATES};
use crate::error::{CompressionError, Result};
use crate::invocation::Invocation;
use std::env;
use std::ffi::{OsStr, OsString};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// What the external tool reported when it exited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Captured stderr followed by stdout, trimmed
    pub fn diagnostics(&self) -> String {
        let stderr = self.stderr.trim();
        let stdout = self.stdout.trim();
        match (stderr.is_empty(), stdout.is_empty()) {
            (true, true) => String::new(),
            (false, true) => stderr.to_string(),
            (true, false) => stdout.to_string(),
            (false, false) => format!("{}\n{}", stderr, stdout),
        }
    }
}

/// Shared flag that asks a running launch to terminate its child
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub timeout: Option<Duration>,
    pub cancel: Option<CancelToken>,
}

impl LaunchOptions {
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }
}

pub trait ProcessLauncher: Send + Sync {
    /// Runs the invocation to completion and reports its exit status and
    /// captured output. Spawn failures caused by a missing or non-executable
    /// program surface as `ToolNotFound`.
    fn launch(&self, invocation: &Invocation, options: &LaunchOptions) -> Result<ToolOutput>;
}

impl<L: ProcessLauncher + ?Sized> ProcessLauncher for &L {
    fn launch(&self, invocation: &Invocation, options: &LaunchOptions) -> Result<ToolOutput> {
        (**self).launch(invocation, options)
    }
}

impl<L: ProcessLauncher + ?Sized> ProcessLauncher for Arc<L> {
    fn launch(&self, invocation: &Invocation, options: &LaunchOptions) -> Result<ToolOutput> {
        (**self).launch(invocation, options)
    }
}

/// Launches real child processes through `std::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemLauncher;

impl ProcessLauncher for SystemLauncher {
    fn launch(&self, invocation: &Invocation, options: &LaunchOptions) -> Result<ToolOutput> {
        if options.is_cancelled() {
            return Err(CompressionError::Cancelled);
        }

        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| map_spawn_error(&invocation.program, e))?;

        // Drain both pipes concurrently so a chatty tool never blocks on a full pipe
        let stdout_reader = spawn_reader(child.stdout.take());
        let stderr_reader = spawn_reader(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if options.is_cancelled() {
                terminate(&mut child);
                return Err(CompressionError::Cancelled);
            }
            if let Some(timeout) = options.timeout {
                if started.elapsed() >= timeout {
                    terminate(&mut child);
                    return Err(CompressionError::Timeout(timeout));
                }
            }
            thread::sleep(CHILD_POLL_INTERVAL);
        };

        Ok(ToolOutput {
            exit_code: status.code(),
            stdout: join_reader(stdout_reader),
            stderr: join_reader(stderr_reader),
        })
    }
}

fn map_spawn_error(program: &OsStr, err: io::Error) -> CompressionError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => CompressionError::ToolNotFound(
            format!("'{}' could not be started: {}", program.to_string_lossy(), err),
        ),
        _ => CompressionError::Io(err),
    }
}

fn spawn_reader<R: Read + Send + 'static>(source: Option<R>) -> Option<JoinHandle<String>> {
    source.map(|mut source| {
        thread::spawn(move || {
            let mut buffer = Vec::new();
            let _ = source.read_to_end(&mut buffer);
            String::from_utf8_lossy(&buffer).into_owned()
        })
    })
}

fn join_reader(reader: Option<JoinHandle<String>>) -> String {
    reader
        .and_then(|handle| handle.join().ok())
        .unwrap_or_default()
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// Resolves the Ghostscript binary to run.
///
/// An explicit path wins when given; a bare name is looked up on `PATH`.
/// Without one, the platform candidates are tried in order.
pub fn locate_ghostscript(explicit: Option<&Path>) -> Result<PathBuf> {
    let path_var = env::var_os("PATH").unwrap_or_default();

    if let Some(explicit) = explicit {
        if explicit.components().count() > 1 || explicit.is_absolute() {
            if explicit.is_file() {
                return Ok(explicit.to_path_buf());
            }
            return Err(CompressionError::ToolNotFound(format!(
                "{} does not exist",
                explicit.display()
            )));
        }
        return find_in_path(explicit.as_os_str(), &path_var).ok_or_else(|| {
            CompressionError::ToolNotFound(format!(
                "'{}' was not found on PATH",
                explicit.display()
            ))
        });
    }

    GHOSTSCRIPT_CANDIDATES
        .iter()
        .find_map(|name| find_in_path(OsStr::new(name), &path_var))
        .ok_or_else(|| {
            CompressionError::ToolNotFound(format!(
                "none of [{}] was found on PATH; install Ghostscript or pass --gs",
                GHOSTSCRIPT_CANDIDATES.join(", ")
            ))
        })
}

/// Searches each directory of a `PATH`-style list for an executable file
pub fn find_in_path(name: &OsStr, path_var: &OsStr) -> Option<PathBuf> {
    env::split_paths(path_var).find_map(|dir| {
        executable_names(name)
            .into_iter()
            .map(|candidate| dir.join(candidate))
            .find(|candidate| candidate.is_file())
    })
}

#[cfg(windows)]
fn executable_names(name: &OsStr) -> Vec<OsString> {
    let mut with_ext = name.to_os_string();
    with_ext.push(".exe");
    vec![with_ext, name.to_os_string()]
}

#[cfg(not(windows))]
fn executable_names(name: &OsStr) -> Vec<OsString> {
    vec![name.to_os_string()]
}
