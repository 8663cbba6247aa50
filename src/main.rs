//! audioprep command line tool

use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use std::process;
use audioprep::audio::{AudioBuffer, AudioEncoder, OutputFormat};
use audioprep::config::Commands;
use audioprep::{clean_path, init_logging, Args, Config};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::from_args_and_config(&args)?;

    if config.verbose {
        eprintln!("{}", audioprep::get_library_info());
    }

    match args.command {
        Commands::Convert { input, output, format } => {
            let format = match format {
                Some(format) => format,
                None => format_from_extension(&output)?,
            };
            let report = config
                .converter()
                .convert(&input, &output, &format)
                .with_context(|| format!("converting {}", clean_path(&input)))?;
            println!("{}", report);
        }
        Commands::Load { input, output, .. } => {
            let sample_rate = config.loader.sample_rate;
            let samples = config.pcm_loader().load(&input, sample_rate)?;
            println!(
                "{} samples, {:.3}s at {} Hz",
                samples.len(),
                samples.len() as f64 / sample_rate as f64,
                sample_rate
            );

            if let Some(output) = output {
                let buffer = AudioBuffer::mono(sample_rate, samples)?;
                AudioEncoder::new(config.ffmpeg.clone(), config.encoder.clone())
                    .write(&buffer, &output, OutputFormat::Wav)
                    .with_context(|| format!("writing {}", output.display()))?;
            }
        }
        Commands::CleanPath { path } => {
            println!("{}", clean_path(&path));
        }
    }

    Ok(())
}

fn format_from_extension(output: &Path) -> Result<String> {
    output
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_string)
        .with_context(|| format!("cannot infer format from {}, pass --format", output.display()))
}
