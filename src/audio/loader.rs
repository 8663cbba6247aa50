//! Decoding arbitrary audio into mono f32 PCM via ffmpeg

use std::path::{Path, PathBuf};
use log::{debug, error};
use ndarray::Array1;
use crate::config::FfmpegConfig;
use crate::error::{AudioPrepError, DecodeCause, Result};
use crate::ffmpeg::FfmpegCommand;
use crate::path::clean_path;

const SAMPLE_BYTES: usize = std::mem::size_of::<f32>();

/// Runs one blocking ffmpeg process per `load` and returns the samples it printed.
#[derive(Debug, Clone, Default)]
pub struct PcmLoader {
    ffmpeg: FfmpegConfig,
}

impl PcmLoader {
    pub fn new(ffmpeg: FfmpegConfig) -> Self {
        Self { ffmpeg }
    }

    /// Decode `file` to a flat mono buffer resampled to `sample_rate`.
    ///
    /// Fails with a missing-file error before spawning anything when the
    /// cleaned path does not exist. Every ffmpeg-side failure becomes a
    /// decode error after its stderr has been logged.
    ///
    /// Diagnostics go through the `log` facade at error level only; callers
    /// that want them on stderr must install a logger first (see
    /// [`crate::init_logging`]).
    pub fn load(&self, file: &str, sample_rate: u32) -> Result<Array1<f32>> {
        let path = PathBuf::from(clean_path(file));
        if !path.exists() {
            return Err(AudioPrepError::missing_file(path));
        }
        if sample_rate == 0 {
            return Err(AudioPrepError::config("Sample rate must be greater than 0"));
        }

        let samples = self
            .run(&path, sample_rate)
            .and_then(|stdout| pcm_f32le_to_array(&stdout))
            .inspect_err(|e| {
                // run() already logged the captured stderr for a failed exit
                if !matches!(e.decode_cause(), Some(DecodeCause::ExitStatus(_))) {
                    error!("{}: {}", path.display(), e);
                }
            })?;

        debug!(
            "Loaded {} samples ({:.2}s at {} Hz) from {}",
            samples.len(),
            samples.len() as f64 / sample_rate as f64,
            sample_rate,
            path.display()
        );
        Ok(samples)
    }

    fn run(&self, path: &Path, sample_rate: u32) -> Result<Vec<u8>> {
        let cmd = FfmpegCommand::pcm_decode(&self.ffmpeg, path, sample_rate);

        let output = cmd.output().map_err(|e| {
            AudioPrepError::decode(
                DecodeCause::Spawn,
                format!("cannot run {}: {}", cmd.program().to_string_lossy(), e),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("{} exited with {}:\n{}", cmd, output.status, stderr.trim_end());
            return Err(AudioPrepError::decode(
                DecodeCause::ExitStatus(output.status.code()),
                format!("ffmpeg exited with {}: {}", output.status, last_line(&stderr)),
            ));
        }

        Ok(output.stdout)
    }
}

/// Reinterpret headerless little-endian f32 bytes as samples.
pub fn pcm_f32le_to_array(bytes: &[u8]) -> Result<Array1<f32>> {
    if bytes.len() % SAMPLE_BYTES != 0 {
        return Err(AudioPrepError::decode(
            DecodeCause::MalformedOutput,
            format!("{} bytes is not a whole number of f32 samples", bytes.len()),
        ));
    }

    Ok(bytes
        .chunks_exact(SAMPLE_BYTES)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// ffmpeg puts the actual reason on its last stderr line.
fn last_line(stderr: &str) -> &str {
    stderr.lines().rev().map(str::trim).find(|l| !l.is_empty()).unwrap_or("")
}
