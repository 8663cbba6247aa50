//! audioprep - audio conversion and PCM loading
//!
//! Decoding goes through symphonia, WAV output through hound, and every
//! other format plus resampled PCM loading through the `ffmpeg` binary.

pub mod audio;
pub mod config;
pub mod error;
pub mod ffmpeg;
pub mod path;

use std::path::Path;
use ndarray::Array1;

pub use audio::{AudioBuffer, AudioConverter, ConversionReport, OutputFormat, PcmLoader};
pub use config::{Args, Config};
pub use error::{AudioPrepError, DecodeCause, Result};
pub use path::clean_path;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Convert `input_path` to `target_format` at `output_path` with default settings.
pub fn wav2<P: AsRef<Path>>(input_path: &str, output_path: P, target_format: &str) -> Result<ConversionReport> {
    AudioConverter::default().convert(input_path, output_path, target_format)
}

/// Decode `file` to mono f32 samples at `sample_rate` with default settings.
pub fn load_audio(file: &str, sample_rate: u32) -> Result<Array1<f32>> {
    PcmLoader::default().load(file, sample_rate)
}

pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .try_init()
        .ok();
}

pub fn get_library_info() -> LibraryInfo {
    LibraryInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct LibraryInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}

impl std::fmt::Display for LibraryInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} v{} - {}", self.name, self.version, self.description)
    }
}
