//! Output format tokens

use std::fmt;
use std::str::FromStr;
use crate::error::{AudioPrepError, Result};

/// Container/codec targets accepted by the converter.
///
/// Tokens map as `wav→WAV`, `flac→FLAC`, `ogg→OGG`, `m4a→MP4`, `mp3→MP3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Wav,
    Flac,
    Ogg,
    Mp4,
    Mp3,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Wav,
        OutputFormat::Flac,
        OutputFormat::Ogg,
        OutputFormat::Mp4,
        OutputFormat::Mp3,
    ];

    /// Parse a user token, ignoring case.
    pub fn from_token(token: &str) -> Result<Self> {
        match token.to_lowercase().as_str() {
            "wav" => Ok(OutputFormat::Wav),
            "flac" => Ok(OutputFormat::Flac),
            "ogg" => Ok(OutputFormat::Ogg),
            "m4a" => Ok(OutputFormat::Mp4),
            "mp3" => Ok(OutputFormat::Mp3),
            _ => Err(AudioPrepError::unsupported_format(token)),
        }
    }

    /// Encoder format identifier
    pub fn name(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "WAV",
            OutputFormat::Flac => "FLAC",
            OutputFormat::Ogg => "OGG",
            OutputFormat::Mp4 => "MP4",
            OutputFormat::Mp3 => "MP3",
        }
    }

    pub fn token(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Flac => "flac",
            OutputFormat::Ogg => "ogg",
            OutputFormat::Mp4 => "m4a",
            OutputFormat::Mp3 => "mp3",
        }
    }

    /// Muxer name passed to `ffmpeg -f`
    pub fn ffmpeg_muxer(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Flac => "flac",
            OutputFormat::Ogg => "ogg",
            OutputFormat::Mp4 => "ipod",
            OutputFormat::Mp3 => "mp3",
        }
    }

    /// Audio codec passed to `ffmpeg -c:a`
    pub fn ffmpeg_codec(&self) -> &'static str {
        match self {
            OutputFormat::Wav => "pcm_f32le",
            OutputFormat::Flac => "flac",
            OutputFormat::Ogg => "libvorbis",
            OutputFormat::Mp4 => "aac",
            OutputFormat::Mp3 => "libmp3lame",
        }
    }

    /// Whether multi-channel buffers are written as-is instead of downmixed.
    pub fn keeps_channels(&self) -> bool {
        matches!(self, OutputFormat::Ogg)
    }
}

impl FromStr for OutputFormat {
    type Err = AudioPrepError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_token(s)
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
