#![allow(dead_code)]

use pdf_squeeze::invocation::output_file_arg;
use pdf_squeeze::{Invocation, LaunchOptions, ProcessLauncher, QualityPreset, Result, ToolOutput};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Stand-in for Ghostscript that records every invocation.
///
/// On success it writes a file whose size converges on a per-preset target:
/// inputs larger than the target shrink to it, smaller ones are copied as is.
pub struct MockGhostscript {
    pub exit_code: i32,
    pub stderr: String,
    pub calls: Mutex<Vec<Invocation>>,
}

impl MockGhostscript {
    pub fn succeeding() -> Self {
        Self {
            exit_code: 0,
            stderr: String::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(exit_code: i32, stderr: &str) -> Self {
        Self {
            exit_code,
            stderr: stderr.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<Invocation> {
        self.calls.lock().unwrap().last().cloned()
    }
}

pub fn preset_target_size(preset: QualityPreset) -> u64 {
    match preset {
        QualityPreset::Screen => 1_000,
        QualityPreset::Ebook => 2_000,
        QualityPreset::Printer => 4_000,
        QualityPreset::Prepress => 5_000,
    }
}

fn preset_from_args(invocation: &Invocation) -> QualityPreset {
    invocation
        .args
        .iter()
        .filter_map(|arg| arg.to_str())
        .find_map(|arg| arg.strip_prefix("-dPDFSETTINGS="))
        .and_then(|name| name.parse().ok())
        .unwrap_or_default()
}

impl ProcessLauncher for MockGhostscript {
    fn launch(&self, invocation: &Invocation, _options: &LaunchOptions) -> Result<ToolOutput> {
        self.calls.lock().unwrap().push(invocation.clone());

        if self.exit_code == 0 {
            let input = invocation.args.last().cloned().unwrap_or_default();
            let original = fs::read(&input)?;
            let target = preset_target_size(preset_from_args(invocation)) as usize;
            let len = original.len().min(target);
            if let Some(output) = output_file_arg(&invocation.args) {
                fs::write(output, &original[..len])?;
            }
        }

        Ok(ToolOutput {
            exit_code: Some(self.exit_code),
            stdout: String::new(),
            stderr: self.stderr.clone(),
        })
    }
}

pub fn write_pdf(dir: &Path, name: &str, len: usize) -> PathBuf {
    let path = dir.join(name);
    let mut data = b"%PDF-1.7\n".to_vec();
    data.resize(len.max(data.len()), b'0');
    data.truncate(len);
    fs::write(&path, data).unwrap();
    path
}

/// Writes an executable shell script that behaves like Ghostscript: it
/// copies the first `keep_bytes` of the input to the `-sOutputFile` path
/// and exits with `exit_code`.
#[cfg(unix)]
pub fn write_fake_gs(dir: &Path, keep_bytes: usize, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        "#!/bin/sh\n\
         out=\"\"\n\
         for arg in \"$@\"; do\n\
         \x20 case \"$arg\" in\n\
         \x20   -sOutputFile=*) out=\"${{arg#-sOutputFile=}}\" ;;\n\
         \x20 esac\n\
         \x20 last=\"$arg\"\n\
         done\n\
         if [ {code} -ne 0 ]; then\n\
         \x20 echo \"Error: /undefined in --file--\" >&2\n\
         \x20 exit {code}\n\
         fi\n\
         head -c {keep} \"$last\" > \"$out\"\n",
        code = exit_code,
        keep = keep_bytes,
    );

    let path = dir.join("fake-gs");
    fs::write(&path, script).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}
