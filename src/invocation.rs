use crate::constants::{COMPATIBILITY_LEVEL, PDF_DEVICE};
use crate::request::CompressionRequest;
use std::ffi::{OsStr, OsString};
use std::fmt;

/// A fully built external command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds the Ghostscript command line for a request. The input path is
    /// always the trailing positional argument.
    pub fn ghostscript(program: impl Into<OsString>, request: &CompressionRequest) -> Self {
        Self::new(program, ghostscript_args(request))
    }

    /// Number of arguments starting with `prefix`
    pub fn count_flag(&self, prefix: &str) -> usize {
        self.args
            .iter()
            .filter(|arg| arg.to_string_lossy().starts_with(prefix))
            .count()
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

pub fn ghostscript_args(request: &CompressionRequest) -> Vec<OsString> {
    let mut output_flag = OsString::from("-sOutputFile=");
    output_flag.push(request.output_path.as_os_str());

    vec![
        OsString::from(format!("-sDEVICE={}", PDF_DEVICE)),
        OsString::from(format!("-dCompatibilityLevel={}", COMPATIBILITY_LEVEL)),
        OsString::from(request.preset.pdf_settings_flag()),
        OsString::from("-dNOPAUSE"),
        OsString::from("-dBATCH"),
        output_flag,
        request.input_path.as_os_str().to_os_string(),
    ]
}

/// Pulls the output path back out of a Ghostscript argument list
pub fn output_file_arg(args: &[OsString]) -> Option<&OsStr> {
    args.iter().find_map(|arg| {
        let text = arg.to_str()?;
        text.strip_prefix("-sOutputFile=").map(OsStr::new)
    })
}
