use std::path::{Path, PathBuf};

use image::ImageFormat;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SepiaError};
use crate::sepia::{GrayscaleMode, ToneParameters};

pub const DEFAULT_OUTPUT_DIR: &str = "ResultantImages";
pub const DEFAULT_FORMAT: &str = "jpg";

/// Settings read from a TOML file. Every key is optional.
///
/// ```toml
/// depth = 20
/// intensity = 80
/// mode = "weighted"
/// format = "jpg"
/// output_dir = "ResultantImages"
/// ```
///
/// A relative `output_dir` is resolved against the source image's directory.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SepiaConfig {
    pub depth: i32,
    pub intensity: i32,
    pub mode: GrayscaleMode,
    pub format: String,
    pub output_dir: PathBuf,
}

impl Default for SepiaConfig {
    fn default() -> Self {
        let tone = ToneParameters::default();
        SepiaConfig {
            depth: tone.depth,
            intensity: tone.intensity,
            mode: GrayscaleMode::default(),
            format: DEFAULT_FORMAT.to_string(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

impl SepiaConfig {
    pub fn tone(&self) -> ToneParameters {
        ToneParameters {
            depth: self.depth,
            intensity: self.intensity,
        }
    }

    /// Encoder picked from `format`, which doubles as the file extension.
    pub fn output_format(&self) -> Result<ImageFormat> {
        match ImageFormat::from_extension(&self.format) {
            Some(format) if format.writing_enabled() => Ok(format),
            _ => Err(SepiaError::Config(format!(
                "unsupported output format {:?}",
                self.format
            ))),
        }
    }

    pub fn from_toml_str(data: &str) -> Result<SepiaConfig> {
        let config: SepiaConfig =
            toml::from_str(data).map_err(|e| SepiaError::Config(e.to_string()))?;
        config.output_format()?;
        Ok(config)
    }
}

pub fn parse_config(config_path: impl AsRef<Path>) -> Result<SepiaConfig> {
    let config_path = config_path.as_ref();
    let data = std::fs::read_to_string(config_path).map_err(|source| SepiaError::Io {
        path: config_path.to_path_buf(),
        source,
    })?;

    SepiaConfig::from_toml_str(&data).map_err(|e| match e {
        SepiaError::Config(reason) => {
            SepiaError::Config(format!("{}: {}", config_path.display(), reason))
        }
        other => other,
    })
}
