#![allow(dead_code)]

use hound::{SampleFormat, WavSpec, WavWriter};
use std::path::Path;

pub fn ffmpeg_available() -> bool {
    audioprep::ffmpeg::is_available("ffmpeg")
}

/// 440 Hz tone in every channel, 16-bit PCM.
pub fn write_tone(path: &Path, channels: u16, sample_rate: u32, seconds: f32) {
    let spec = WavSpec { channels, sample_rate, bits_per_sample: 16, sample_format: SampleFormat::Int };
    let mut writer = WavWriter::create(path, spec).unwrap();
    let frames = (sample_rate as f32 * seconds) as usize;
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let value = (t * 440.0 * std::f32::consts::TAU).sin() * 0.5;
        for _ in 0..channels {
            writer.write_sample((value * i16::MAX as f32) as i16).unwrap();
        }
    }
    writer.finalize().unwrap();
}
