//! Writing buffers to disk in one of the supported output formats

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;
use hound::{SampleFormat, WavSpec, WavWriter};
use log::{debug, error};
use crate::audio::{AudioBuffer, OutputFormat};
use crate::config::{EncoderConfig, FfmpegConfig};
use crate::error::{AudioPrepError, Result};
use crate::ffmpeg::FfmpegCommand;

/// Encodes WAV in-process and hands every other format to ffmpeg.
#[derive(Debug, Clone, Default)]
pub struct AudioEncoder {
    ffmpeg: FfmpegConfig,
    encoder: EncoderConfig,
}

impl AudioEncoder {
    pub fn new(ffmpeg: FfmpegConfig, encoder: EncoderConfig) -> Self {
        Self { ffmpeg, encoder }
    }

    /// Write `buffer` to `path` at its own sample rate and channel count.
    pub fn write<P: AsRef<Path>>(&self, buffer: &AudioBuffer, path: P, format: OutputFormat) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| {
                AudioPrepError::encode(format!("Cannot create output directory: {}", e))
            })?;
        }

        match format {
            OutputFormat::Wav => write_wav(buffer, path),
            OutputFormat::Flac | OutputFormat::Ogg | OutputFormat::Mp4 | OutputFormat::Mp3 => {
                self.write_with_ffmpeg(buffer, path, format)
            }
        }
    }

    fn write_with_ffmpeg(&self, buffer: &AudioBuffer, path: &Path, format: OutputFormat) -> Result<()> {
        let cmd = FfmpegCommand::pcm_encode(
            &self.ffmpeg,
            &self.encoder,
            path,
            format,
            buffer.sample_rate(),
            buffer.channels(),
        );

        let pcm: Vec<u8> = buffer.interleaved().iter().flat_map(|s| s.to_le_bytes()).collect();

        let output = cmd.output_with_stdin(&pcm).map_err(|e| {
            AudioPrepError::encode(format!("Cannot run {}: {}", cmd.program().to_string_lossy(), e))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!("{} failed ({}):\n{}", cmd, output.status, stderr.trim_end());
            return Err(AudioPrepError::encode(format!(
                "ffmpeg {} encode failed ({}): {}",
                format,
                output.status,
                stderr.trim()
            )));
        }

        debug!("Wrote {} via ffmpeg ({} frames)", path.display(), buffer.frames());
        Ok(())
    }
}

/// 32-bit float WAV, channels interleaved.
fn write_wav(buffer: &AudioBuffer, path: &Path) -> Result<()> {
    let channels = u16::try_from(buffer.channels())
        .map_err(|_| AudioPrepError::encode(format!("Too many channels for WAV: {}", buffer.channels())))?;

    let spec = WavSpec {
        channels,
        sample_rate: buffer.sample_rate(),
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let file = File::create(path).map_err(|e| {
        AudioPrepError::encode(format!("Cannot create output file {}: {}", path.display(), e))
    })?;
    let mut writer = WavWriter::new(BufWriter::new(file), spec)?;

    for &sample in buffer.samples().iter() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    debug!("Wrote {} ({} frames, {} ch)", path.display(), buffer.frames(), channels);
    Ok(())
}
