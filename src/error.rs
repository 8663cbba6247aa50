//! Error types

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// What went wrong underneath a decode failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeCause {
    /// The decoding process could not be started
    Spawn,
    /// The process exited unsuccessfully (`None` when killed by a signal)
    ExitStatus(Option<i32>),
    /// The captured output is not a whole number of f32 samples
    MalformedOutput,
    /// The in-process decoding library rejected the input
    Library,
}

impl fmt::Display for DecodeCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spawn => write!(f, "spawn"),
            Self::ExitStatus(Some(code)) => write!(f, "exit status {}", code),
            Self::ExitStatus(None) => write!(f, "terminated by signal"),
            Self::MalformedOutput => write!(f, "malformed output"),
            Self::Library => write!(f, "decoder"),
        }
    }
}

/// Main error type
#[derive(Debug, Error)]
pub enum AudioPrepError {
    #[error("Input file does not exist: {}", path.display())]
    MissingFile { path: PathBuf },

    #[error("Unsupported output format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to load audio: {message}")]
    Decode { message: String, cause: DecodeCause },

    #[error("Encode error: {message}")]
    Encode { message: String },

    #[error("Audio error: {message}")]
    Audio { message: String },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AudioPrepError {
    pub fn missing_file<P: Into<PathBuf>>(path: P) -> Self { Self::MissingFile { path: path.into() } }
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self { Self::UnsupportedFormat { format: format.into() } }
    pub fn decode<S: Into<String>>(cause: DecodeCause, msg: S) -> Self { Self::Decode { message: msg.into(), cause } }
    pub fn encode<S: Into<String>>(msg: S) -> Self { Self::Encode { message: msg.into() } }
    pub fn audio<S: Into<String>>(msg: S) -> Self { Self::Audio { message: msg.into() } }
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }

    pub fn is_missing_file(&self) -> bool {
        matches!(self, Self::MissingFile { .. })
    }

    pub fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }

    pub fn decode_cause(&self) -> Option<DecodeCause> {
        match self {
            Self::Decode { cause, .. } => Some(*cause),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AudioPrepError>;

impl From<symphonia::core::errors::Error> for AudioPrepError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        Self::decode(DecodeCause::Library, err.to_string())
    }
}

impl From<hound::Error> for AudioPrepError {
    fn from(err: hound::Error) -> Self { Self::encode(format!("WAV: {}", err)) }
}
