use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use image::ImageFormat;
use log::{debug, error, info};

use crate::config::SepiaConfig;
use crate::error::{Result, SepiaError};
use crate::pixels::PixelBuffer;
use crate::sepia::{sepia_tone, GrayscaleMode, ToneParameters};

/// Everything one run needs to know about where to read and write.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub source: PathBuf,
    pub output_dir: PathBuf,
    pub format: ImageFormat,
    pub extension: String,
    pub tone: ToneParameters,
    pub mode: GrayscaleMode,
}

impl PipelineContext {
    pub fn new(source: impl Into<PathBuf>, config: &SepiaConfig) -> Result<PipelineContext> {
        let source = source.into();
        let format = config.output_format()?;
        let output_dir = source
            .parent()
            .unwrap_or(Path::new(""))
            .join(&config.output_dir);

        Ok(PipelineContext {
            source,
            output_dir,
            format,
            extension: config.format.clone(),
            tone: config.tone(),
            mode: config.mode,
        })
    }

    pub fn output_path(&self, iteration: u32) -> PathBuf {
        self.output_dir
            .join(format!("{}_output.{}", iteration, self.extension))
    }
}

#[derive(Debug)]
pub struct IterationFailure {
    pub iteration: u32,
    pub error: SepiaError,
}

#[derive(Debug)]
pub struct PipelineResult {
    pub iterations: u32,
    /// Time spent toning only, decode and encode excluded.
    pub total: Duration,
    pub outputs: Vec<PathBuf>,
    pub failures: Vec<IterationFailure>,
    pub output_dir: PathBuf,
}

impl PipelineResult {
    pub fn average_nanos(&self) -> u128 {
        self.total.as_nanos() / u128::from(self.iterations.max(1))
    }
}

pub fn parse_iterations(value: &str) -> Result<u32> {
    let iterations: i64 = value
        .trim()
        .parse()
        .map_err(|_| SepiaError::IterationCount(format!("{:?} is not a number", value)))?;
    if iterations <= 0 {
        return Err(SepiaError::IterationCount(format!(
            "{} is not positive",
            iterations
        )));
    }
    u32::try_from(iterations)
        .map_err(|_| SepiaError::IterationCount(format!("{} is too large", iterations)))
}

/// Creates `dir` and its parents if missing. Returns whether it had to.
pub fn ensure_output_dir(dir: &Path) -> Result<bool> {
    if dir.is_dir() {
        info!("output directory {} already there, skipping creation", dir.display());
        return Ok(false);
    }
    info!("output directory {} not found, creating it", dir.display());
    std::fs::create_dir_all(dir).map_err(|source| SepiaError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Decodes the source once, then tones and writes it `iterations` times.
///
/// Each iteration starts from its own copy of the decoded pixels. A failed
/// write is logged and recorded, and the remaining iterations still run.
pub fn run(context: &PipelineContext, iterations: u32) -> Result<PipelineResult> {
    if iterations == 0 {
        return Err(SepiaError::IterationCount("0 is not positive".to_string()));
    }

    info!("source image: {}", context.source.display());
    let decode = Instant::now();
    let source = PixelBuffer::open(&context.source)?;
    debug!(
        "decoded {}x{} in {:.2?}",
        source.width,
        source.height,
        decode.elapsed()
    );

    ensure_output_dir(&context.output_dir)?;

    let mut result = PipelineResult {
        iterations,
        total: Duration::ZERO,
        outputs: vec![],
        failures: vec![],
        output_dir: context.output_dir.clone(),
    };

    for iteration in 0..iterations {
        let mut image = source.clone();

        let now = Instant::now();
        sepia_tone(&mut image, context.tone, context.mode);
        let elapsed = now.elapsed();
        result.total += elapsed;
        debug!("iteration {} sepia time: {:.2?}", iteration, elapsed);

        let path = context.output_path(iteration);
        let rendered = image.to_image()?;
        match rendered.save_with_format(&path, context.format) {
            Ok(()) => result.outputs.push(path),
            Err(source) => {
                let error = SepiaError::Encode { path, source };
                error!("iteration {}: {}", iteration, error);
                result.failures.push(IterationFailure { iteration, error });
            }
        }
    }

    Ok(result)
}
