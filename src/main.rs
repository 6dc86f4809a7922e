use anyhow::Context;
use clap::Parser;
use pdf_squeeze::cli::{Args, Commands};
use pdf_squeeze::{
    batch_compress_pdfs, compress_pdf, get_pdf_info, print_pdf_info, CompressionRunner,
    QualityPreset,
};
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

fn main() -> ExitCode {
    let args = Args::parse();
    pdf_squeeze::logger::init(args.quiet, args.verbose);

    match run(args.command) {
        Ok(code) => code,
        Err(e) => {
            pdf_squeeze::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Compress {
            input,
            output,
            quality,
            gs_path,
            timeout,
        } => {
            let preset: QualityPreset = quality.parse()?;
            let runner = build_runner(gs_path.as_deref(), timeout);
            compress_pdf(&runner, input.clone(), output, preset)
                .with_context(|| format!("failed to compress {}", input.display()))?;
        }
        Commands::Batch {
            input,
            output,
            quality,
            recursive,
            threads,
            gs_path,
            timeout,
        } => {
            let preset: QualityPreset = quality.parse()?;
            let runner = build_runner(gs_path.as_deref(), timeout);
            let summary =
                batch_compress_pdfs(&runner, &input, &output, preset, recursive, threads)?;
            if summary.failed > 0 {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Info { input } => {
            let info = get_pdf_info(&input)
                .with_context(|| format!("failed to inspect {}", input.display()))?;
            print_pdf_info(&info);
        }
        Commands::Presets => {
            for preset in QualityPreset::all() {
                println!("{:<10} {}", preset.name(), preset.description());
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn build_runner(gs_path: Option<&Path>, timeout: Option<u64>) -> CompressionRunner {
    CompressionRunner::system(gs_path).with_timeout(timeout.map(Duration::from_secs))
}
