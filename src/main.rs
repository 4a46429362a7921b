#![warn(unused_extern_crates)]
use std::path::PathBuf;
use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::Parser as Clap_parser;
use log::{error, warn};
use sepiars::config::{self, SepiaConfig};
use sepiars::pipeline::{self, parse_iterations, PipelineContext};
use sepiars::sepia::GrayscaleMode;

const USAGE: &str = "Usage: sepiars <SOURCE_IMAGE_PATH> <ITERATIONS> \nExiting.";

#[derive(Clap_parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// image to apply the sepia tone to
    #[arg(value_name = "SOURCE_IMAGE_PATH")]
    input_path: PathBuf,

    /// how many times the filter is applied, one output file each
    #[arg(value_name = "ITERATIONS", allow_hyphen_values = true, value_parser = parse_iterations)]
    iterations: u32,

    #[arg(short, long, value_name = "CONFIG_PATH")]
    config: Option<PathBuf>,

    #[arg(long, allow_negative_numbers = true)]
    depth: Option<i32>,

    #[arg(long, allow_negative_numbers = true)]
    intensity: Option<i32>,

    #[arg(long, value_enum)]
    mode: Option<GrayscaleMode>,

    /// output extension, e.g. jpg or png
    #[arg(long)]
    format: Option<String>,

    #[arg(short, long, value_name = "OUTPUT_DIR")]
    output_dir: Option<PathBuf>,
}

fn load_config(args: &Args) -> sepiars::Result<SepiaConfig> {
    let mut config = match &args.config {
        Some(path) => config::parse_config(path)?,
        None => SepiaConfig::default(),
    };

    if let Some(depth) = args.depth {
        config.depth = depth;
    }
    if let Some(intensity) = args.intensity {
        config.intensity = intensity;
    }
    if let Some(mode) = args.mode {
        config.mode = mode;
    }
    if let Some(format) = &args.format {
        config.format = format.clone();
    }
    if let Some(output_dir) = &args.output_dir {
        config.output_dir = output_dir.clone();
    }
    Ok(config)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // wrong arguments are not a failure, nothing was attempted
            println!("{}", e.render());
            println!("{}", USAGE);
            return ExitCode::SUCCESS;
        }
    };

    let context = match load_config(&args).and_then(|config| PipelineContext::new(&args.input_path, &config)) {
        Ok(context) => context,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!("Applying Sepia Tone Filter to {} images.", args.iterations);
    let result = match pipeline::run(&context, args.iterations) {
        Ok(result) => result,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Elapsed time (average) for target method: {} ns",
        result.average_nanos()
    );
    println!("Resultant images' path: {}", result.output_dir.display());

    if !result.failures.is_empty() {
        warn!(
            "{} of {} images could not be written",
            result.failures.len(),
            result.iterations
        );
    }
    if result.outputs.is_empty() {
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
