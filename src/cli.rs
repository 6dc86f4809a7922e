use crate::constants::GHOSTSCRIPT_ENV;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "pdf-squeeze",
    about = "Shrink PDF files with Ghostscript quality presets",
    long_about = "pdf-squeeze rewrites PDF files through Ghostscript's pdfwrite device to reduce their size. \
                  Pick one of the screen, ebook, printer or prepress presets to trade file size against \
                  image fidelity, and get a before/after size report for every file.",
    version,
    after_help = "EXAMPLES:\n  \
    pdf-squeeze compress report.pdf report-small.pdf -q ebook\n  \
    pdf-squeeze batch \"./scans/*.pdf\" ./compressed -q screen -j 4\n  \
    pdf-squeeze info report.pdf\n  \
    pdf-squeeze presets"
)]
pub struct Args {
    #[arg(short = 'Q', long, global = true, help = "Only print errors")]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        conflicts_with = "quiet",
        help = "Print the Ghostscript command line and extra diagnostics"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Compress a single PDF file",
        long_about = "Compress a single PDF file with Ghostscript using the chosen quality preset. \
                      The output file is created or overwritten; its parent directory must exist."
    )]
    Compress {
        #[arg(help = "Input PDF file path")]
        input: PathBuf,

        #[arg(help = "Output PDF file path")]
        output: PathBuf,

        #[arg(
            short = 'q',
            long,
            default_value = "screen",
            help = "Quality preset (screen, ebook, printer, prepress)",
            long_help = "Ghostscript PDFSETTINGS preset. screen gives the smallest files (72 dpi images), \
                         ebook a medium size (150 dpi), printer and prepress keep 300 dpi images."
        )]
        quality: String,

        #[arg(
            long = "gs",
            env = GHOSTSCRIPT_ENV,
            help = "Path to the Ghostscript binary",
            long_help = "Ghostscript executable to run. Defaults to the first of gs, gswin64c or \
                         gswin32c found on PATH."
        )]
        gs_path: Option<PathBuf>,

        #[arg(
            short = 't',
            long,
            help = "Give up after this many seconds",
            long_help = "Terminate Ghostscript if it has not finished after the given number of seconds. \
                         Without this option the process runs to completion."
        )]
        timeout: Option<u64>,
    },

    #[command(
        about = "Compress multiple PDF files in parallel",
        long_about = "Compress every PDF matched by a file, directory or glob pattern. \
                      Results are written to the output directory under their original file names."
    )]
    Batch {
        #[arg(
            help = "Input directory, file, or glob",
            long_help = "Input can be a directory path, a single file, or a glob expression. \
                         Examples: './scans', '*.pdf', '/path/to/docs/**/*.pdf'"
        )]
        input: String,

        #[arg(help = "Output directory path")]
        output: PathBuf,

        #[arg(
            short = 'q',
            long,
            default_value = "screen",
            help = "Quality preset (screen, ebook, printer, prepress)"
        )]
        quality: String,

        #[arg(
            short = 'r',
            long,
            help = "Process subdirectories recursively",
            long_help = "Recursively process all subdirectories when input is a directory."
        )]
        recursive: bool,

        #[arg(
            short = 'j',
            long,
            help = "Number of parallel Ghostscript processes (default: CPU count)"
        )]
        threads: Option<usize>,

        #[arg(long = "gs", env = GHOSTSCRIPT_ENV, help = "Path to the Ghostscript binary")]
        gs_path: Option<PathBuf>,

        #[arg(short = 't', long, help = "Per-file timeout in seconds")]
        timeout: Option<u64>,
    },

    #[command(
        about = "Display PDF file information",
        long_about = "Show file size, PDF version, page and object counts, and a preset suggestion."
    )]
    Info {
        #[arg(help = "PDF file path to analyze")]
        input: PathBuf,
    },

    #[command(about = "List the available quality presets")]
    Presets,
}
