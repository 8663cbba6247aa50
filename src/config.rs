//! Configuration management

use crate::audio::{AudioConverter, PcmLoader};
use crate::error::{AudioPrepError, Result};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub verbose: bool,
    pub ffmpeg: FfmpegConfig,
    pub loader: LoaderConfig,
    pub encoder: EncoderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FfmpegConfig {
    pub binary: String,
    /// Always passed explicitly as `-threads`
    pub threads: u32,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    pub mp3_bitrate_kbps: u32,
    pub aac_bitrate_kbps: u32,
    /// libvorbis `-q:a`, -1..=10
    pub vorbis_quality: i32,
}

impl Default for FfmpegConfig {
    fn default() -> Self {
        Self {
            binary: "ffmpeg".to_string(),
            threads: 0,
            log_level: "error".to_string(),
        }
    }
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { sample_rate: 16000 }
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            mp3_bitrate_kbps: 192,
            aac_bitrate_kbps: 192,
            vorbis_quality: 5,
        }
    }
}

const FFMPEG_LOG_LEVELS: [&str; 8] = ["quiet", "panic", "fatal", "error", "warning", "info", "verbose", "debug"];

#[derive(Debug, Clone, Parser)]
#[command(name = "audioprep", about = "Audio format conversion and PCM loading", version, author)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short = 'c', long = "config", global = true, help = "Config file path (TOML format)")]
    pub config_file: Option<PathBuf>,

    #[arg(long = "ffmpeg", global = true, help = "ffmpeg executable to run")]
    pub ffmpeg: Option<String>,

    #[arg(long = "threads", global = true, help = "Thread count passed to ffmpeg")]
    pub threads: Option<u32>,

    #[arg(short = 'v', long = "verbose", global = true, help = "Enable verbose output mode")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Convert an audio file to wav, mp3, ogg, m4a or flac
    Convert {
        input: String,
        output: PathBuf,
        #[arg(short = 'f', long = "format", help = "Target format (defaults to the output extension)")]
        format: Option<String>,
    },
    /// Decode a file to mono f32 PCM and report what came out
    Load {
        input: String,
        #[arg(short = 'r', long = "sample-rate", help = "Target sample rate (Hz)")]
        sample_rate: Option<u32>,
        #[arg(short = 'o', long = "output", help = "Also write the samples as a mono WAV file")]
        output: Option<PathBuf>,
    },
    /// Print a path string after cleaning
    CleanPath { path: String },
}

impl Config {
    /// Create config from command line arguments and config file
    pub fn from_args_and_config(args: &Args) -> Result<Self> {
        let mut config = if let Some(config_path) = &args.config_file {
            Self::from_file(config_path)?
        } else {
            Self::default()
        };

        // Command line arguments override config file settings
        if let Some(binary) = &args.ffmpeg {
            config.ffmpeg.binary = binary.clone();
        }
        if let Some(threads) = args.threads {
            config.ffmpeg.threads = threads;
        }
        if let Commands::Load { sample_rate: Some(sample_rate), .. } = args.command {
            config.loader.sample_rate = sample_rate;
        }
        config.verbose |= args.verbose;

        config.validate()?;

        Ok(config)
    }

    /// Load config from TOML config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AudioPrepError::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&content)
            .map_err(|e| AudioPrepError::config(format!("Failed to parse config file: {}", e)))
    }

    pub fn validate(&self) -> Result<()> {
        if self.ffmpeg.binary.trim().is_empty() {
            return Err(AudioPrepError::config("ffmpeg binary cannot be empty"));
        }
        if self.ffmpeg.threads as usize > num_cpus::get() * 2 {
            return Err(AudioPrepError::config("ffmpeg thread count cannot exceed 2x logical CPU cores"));
        }
        if !FFMPEG_LOG_LEVELS.contains(&self.ffmpeg.log_level.as_str()) {
            return Err(AudioPrepError::config(format!("Unknown ffmpeg log level: {}", self.ffmpeg.log_level)));
        }

        if self.loader.sample_rate == 0 {
            return Err(AudioPrepError::config("Sample rate must be greater than 0"));
        }
        if self.loader.sample_rate > 384000 {
            return Err(AudioPrepError::config("Sample rate cannot exceed 384000 Hz"));
        }

        if self.encoder.mp3_bitrate_kbps == 0 || self.encoder.mp3_bitrate_kbps > 320 {
            return Err(AudioPrepError::config("MP3 bitrate must be in range 1..=320 kbps"));
        }
        if self.encoder.aac_bitrate_kbps == 0 || self.encoder.aac_bitrate_kbps > 512 {
            return Err(AudioPrepError::config("AAC bitrate must be in range 1..=512 kbps"));
        }
        if !(-1..=10).contains(&self.encoder.vorbis_quality) {
            return Err(AudioPrepError::config("Vorbis quality must be in range -1..=10"));
        }

        Ok(())
    }

    pub fn converter(&self) -> AudioConverter {
        AudioConverter::new(self.ffmpeg.clone(), self.encoder.clone())
    }

    pub fn pcm_loader(&self) -> PcmLoader {
        PcmLoader::new(self.ffmpeg.clone())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| AudioPrepError::config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| AudioPrepError::config(format!("Failed to write config file: {}", e)))
    }
}
