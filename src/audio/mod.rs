//! Audio Processing Module
//!
//! Decoding files into memory, writing them back out in another format,
//! and loading mono PCM through ffmpeg.

pub mod buffer;
pub mod converter;
pub mod decoder;
pub mod encoder;
pub mod format;
pub mod loader;

pub use buffer::AudioBuffer;
pub use converter::{AudioConverter, ConversionReport};
pub use encoder::AudioEncoder;
pub use format::OutputFormat;
pub use loader::PcmLoader;
