//! Audio Format Converter

use std::fmt;
use std::path::{Path, PathBuf};
use log::info;
use crate::audio::{decoder, AudioEncoder, OutputFormat};
use crate::config::{EncoderConfig, FfmpegConfig};
use crate::error::{AudioPrepError, Result};
use crate::path::clean_path;

/// Summary of one finished conversion
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionReport {
    pub output_path: PathBuf,
    pub format: OutputFormat,
    pub sample_rate: u32,
    pub input_channels: usize,
    pub output_channels: usize,
    pub frames: usize,
    pub duration_seconds: f64,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} Hz, {} -> {} ch, {:.2}s",
            self.output_path.display(),
            self.format,
            self.sample_rate,
            self.input_channels,
            self.output_channels,
            self.duration_seconds
        )
    }
}

#[derive(Debug, Clone, Default)]
pub struct AudioConverter {
    encoder: AudioEncoder,
}

impl AudioConverter {
    pub fn new(ffmpeg: FfmpegConfig, encoder: EncoderConfig) -> Self {
        Self { encoder: AudioEncoder::new(ffmpeg, encoder) }
    }

    /// Decode `input_path` and re-encode it to `output_path` as `target_format`.
    ///
    /// The input path is cleaned first; the output path is used as given.
    /// The format token is checked before any decoding happens, so a bad token
    /// never creates the output. Multi-channel input is averaged to mono
    /// unless the target keeps channels (OGG).
    pub fn convert<P: AsRef<Path>>(&self, input_path: &str, output_path: P, target_format: &str) -> Result<ConversionReport> {
        let input = PathBuf::from(clean_path(input_path));
        let output_path = output_path.as_ref();

        if !input.exists() {
            return Err(AudioPrepError::missing_file(input));
        }

        let format = OutputFormat::from_token(target_format)?;

        let decoded = decoder::decode_file(&input)?;
        let input_channels = decoded.channels();

        let audio = if input_channels > 1 && !format.keeps_channels() {
            decoded.to_mono()
        } else {
            decoded
        };

        self.encoder.write(&audio, output_path, format)?;

        let report = ConversionReport {
            output_path: output_path.to_path_buf(),
            format,
            sample_rate: audio.sample_rate(),
            input_channels,
            output_channels: audio.channels(),
            frames: audio.frames(),
            duration_seconds: audio.duration(),
        };
        info!("Converted {} -> {}", input.display(), report);

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
    use tempfile::TempDir;

    fn write_stereo_wav(path: &Path, sample_rate: u32, frames: usize) {
        let spec = WavSpec { channels: 2, sample_rate, bits_per_sample: 32, sample_format: SampleFormat::Float };
        let mut writer = WavWriter::create(path, spec).unwrap();
        for i in 0..frames {
            let t = i as f32 / sample_rate as f32;
            writer.write_sample((t * 440.0 * std::f32::consts::TAU).sin() * 0.5).unwrap();
            writer.write_sample(0.25f32).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_stereo_wav_is_downmixed() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("stereo.wav");
        let dst = dir.path().join("mono.wav");
        write_stereo_wav(&src, 22050, 22050);

        let report = AudioConverter::default()
            .convert(src.to_str().unwrap(), &dst, "WAV")
            .unwrap();
        assert_eq!(report.input_channels, 2);
        assert_eq!(report.output_channels, 1);
        assert_eq!(report.frames, 22050);

        let reader = WavReader::open(&dst).unwrap();
        assert_eq!(reader.spec().channels, 1);
        assert_eq!(reader.spec().sample_rate, 22050);
        assert_eq!(reader.len(), 22050);
    }

    #[test]
    fn test_downmix_averages_channels() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("stereo.wav");
        let dst = dir.path().join("mono.wav");
        write_stereo_wav(&src, 8000, 16);

        AudioConverter::default().convert(src.to_str().unwrap(), &dst, "wav").unwrap();

        let mut original = WavReader::open(&src).unwrap();
        let pairs: Vec<f32> = original.samples::<f32>().map(|s| s.unwrap()).collect();
        let mut mono = WavReader::open(&dst).unwrap();
        let mixed: Vec<f32> = mono.samples::<f32>().map(|s| s.unwrap()).collect();

        for (frame, value) in pairs.chunks_exact(2).zip(mixed) {
            assert!(((frame[0] + frame[1]) / 2.0 - value).abs() < 1e-6);
        }
    }

    #[test]
    fn test_unsupported_format_creates_nothing() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("stereo.wav");
        let dst = dir.path().join("out.xyz");
        write_stereo_wav(&src, 16000, 160);

        let err = AudioConverter::default()
            .convert(src.to_str().unwrap(), &dst, "xyz")
            .unwrap_err();
        assert!(err.is_unsupported_format());
        assert!(!dst.exists());
    }

    #[test]
    fn test_unsupported_format_skips_decode() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("garbage.wav");
        std::fs::write(&src, b"not audio").unwrap();

        let err = AudioConverter::default()
            .convert(src.to_str().unwrap(), dir.path().join("out"), "aiff")
            .unwrap_err();
        assert!(err.is_unsupported_format());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let dst = dir.path().join("out.wav");
        let err = AudioConverter::default()
            .convert(" \"/no/such/input.wav\" ", &dst, "wav")
            .unwrap_err();
        assert!(err.is_missing_file());
        assert!(!dst.exists());
    }

    #[test]
    fn test_quoted_input_path_is_cleaned() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("stereo.wav");
        let dst = dir.path().join("mono.wav");
        write_stereo_wav(&src, 16000, 1600);

        let quoted = format!("  \"{}\"\n", src.display());
        AudioConverter::default().convert(&quoted, &dst, "wav").unwrap();
        assert!(dst.exists());
    }

    #[cfg(unix)]
    fn convert_with_recorder(dir: &Path, token: &str) -> (ConversionReport, Vec<String>) {
        use crate::ffmpeg::stub;

        let src = dir.join("stereo.wav");
        if !src.exists() {
            write_stereo_wav(&src, 44100, 4410);
        }
        let dst = dir.join(format!("out.{}", token));
        let converter = AudioConverter::new(stub::recording_encoder(dir), EncoderConfig::default());

        let report = stub::retry_busy(|| converter.convert(src.to_str().unwrap(), &dst, token)).unwrap();
        assert!(dst.exists());
        (report, stub::recorded_args(&dst))
    }

    #[cfg(unix)]
    #[test]
    fn test_ogg_keeps_stereo() {
        use crate::ffmpeg::stub::value_after;

        let dir = TempDir::new().unwrap();
        let (report, args) = convert_with_recorder(dir.path(), "ogg");

        assert_eq!(report.format, OutputFormat::Ogg);
        assert_eq!(report.input_channels, 2);
        assert_eq!(report.output_channels, 2);
        assert_eq!(report.sample_rate, 44100);
        assert_eq!(value_after(&args, "-ac"), "2");
        assert_eq!(value_after(&args, "-ar"), "44100");
        assert_eq!(value_after(&args, "-c:a"), "libvorbis");
        assert_eq!(value_after(&args, "-f"), "ogg");
    }

    #[cfg(unix)]
    #[test]
    fn test_lossy_targets_are_downmixed() {
        use crate::ffmpeg::stub::value_after;

        let dir = TempDir::new().unwrap();
        for (token, codec, muxer) in [("mp3", "libmp3lame", "mp3"), ("m4a", "aac", "ipod"), ("flac", "flac", "flac")] {
            let (report, args) = convert_with_recorder(dir.path(), token);

            assert_eq!(report.output_channels, 1, "{token}");
            assert_eq!(report.frames, 4410, "{token}");
            assert_eq!(value_after(&args, "-ac"), "1", "{token}");
            assert_eq!(value_after(&args, "-c:a"), codec, "{token}");
            assert_eq!(value_after(&args, "-f"), muxer, "{token}");
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_encode_is_reported() {
        use crate::ffmpeg::stub;

        let dir = TempDir::new().unwrap();
        let src = dir.path().join("stereo.wav");
        write_stereo_wav(&src, 16000, 160);
        let ffmpeg = stub::write(dir.path(), "cat > /dev/null\necho 'Unknown encoder libvorbis' >&2\nexit 1");

        let err = stub::retry_busy(|| {
            AudioConverter::new(ffmpeg.clone(), EncoderConfig::default())
                .convert(src.to_str().unwrap(), dir.path().join("out.ogg"), "ogg")
        })
        .unwrap_err();
        assert!(matches!(err, AudioPrepError::Encode { .. }));
        assert!(err.to_string().contains("Unknown encoder libvorbis"));
    }
}
