//! In-memory audio buffer

use ndarray::{Array1, Array2, Axis};
use crate::error::{AudioPrepError, Result};

/// Decoded audio, stored samples-first as `(frames, channels)`.
///
/// Sample values are whatever the decoder produced; nothing here rescales them.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    sample_rate: u32,
    samples: Array2<f32>,
}

impl AudioBuffer {
    pub fn new(sample_rate: u32, samples: Array2<f32>) -> Result<Self> {
        if sample_rate == 0 {
            return Err(AudioPrepError::audio("Sample rate cannot be 0"));
        }
        if samples.ncols() == 0 {
            return Err(AudioPrepError::audio("Channel count cannot be 0"));
        }

        Ok(Self { sample_rate, samples })
    }

    pub fn mono(sample_rate: u32, samples: Array1<f32>) -> Result<Self> {
        let frames = samples.len();
        let samples = samples
            .into_shape((frames, 1))
            .map_err(|e| AudioPrepError::audio(format!("Cannot reshape mono data: {}", e)))?;
        Self::new(sample_rate, samples)
    }

    /// Build from frame-interleaved samples, e.g. `[L0, R0, L1, R1, ...]`.
    pub fn from_interleaved(sample_rate: u32, channels: usize, interleaved: Vec<f32>) -> Result<Self> {
        if channels == 0 {
            return Err(AudioPrepError::audio("Channel count cannot be 0"));
        }
        if interleaved.len() % channels != 0 {
            return Err(AudioPrepError::audio(format!(
                "{} samples do not divide into {} channels",
                interleaved.len(),
                channels
            )));
        }

        let frames = interleaved.len() / channels;
        let samples = Array2::from_shape_vec((frames, channels), interleaved)
            .map_err(|e| AudioPrepError::audio(format!("Cannot shape interleaved data: {}", e)))?;
        Self::new(sample_rate, samples)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> usize {
        self.samples.ncols()
    }

    pub fn frames(&self) -> usize {
        self.samples.nrows()
    }

    pub fn is_empty(&self) -> bool {
        self.frames() == 0
    }

    pub fn duration(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub fn samples(&self) -> &Array2<f32> {
        &self.samples
    }

    /// Average all channels into one.
    pub fn to_mono(&self) -> AudioBuffer {
        if self.channels() == 1 {
            return self.clone();
        }

        let mixed = self.samples.sum_axis(Axis(1)) / self.channels() as f32;

        AudioBuffer {
            sample_rate: self.sample_rate,
            samples: mixed.insert_axis(Axis(1)),
        }
    }

    /// Samples in frame order, channels interleaved.
    pub fn interleaved(&self) -> Vec<f32> {
        self.samples.iter().copied().collect()
    }

    /// One channel as a flat array.
    pub fn channel(&self, index: usize) -> Option<Array1<f32>> {
        (index < self.channels()).then(|| self.samples.column(index).to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_creation() {
        let buffer = AudioBuffer::mono(16000, Array1::from(vec![0.1, 0.2, 0.3, 0.4])).unwrap();
        assert_eq!(buffer.sample_rate(), 16000);
        assert_eq!(buffer.channels(), 1);
        assert_eq!(buffer.frames(), 4);
        assert!(!buffer.is_empty());
        assert!((buffer.duration() - 0.00025).abs() < 1e-12);
    }

    #[test]
    fn test_buffer_validation() {
        assert!(AudioBuffer::mono(0, Array1::from(vec![0.1])).is_err());
        assert!(AudioBuffer::new(16000, Array2::zeros((4, 0))).is_err());
        assert!(AudioBuffer::from_interleaved(16000, 2, vec![0.1, 0.2, 0.3]).is_err());
        assert!(AudioBuffer::from_interleaved(16000, 0, vec![]).is_err());
    }

    #[test]
    fn test_interleaved_layout() {
        let buffer = AudioBuffer::from_interleaved(8000, 2, vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3]).unwrap();
        assert_eq!(buffer.frames(), 3);
        assert_eq!(buffer.channels(), 2);
        assert_eq!(buffer.channel(0).unwrap().to_vec(), vec![0.1, 0.2, 0.3]);
        assert_eq!(buffer.channel(1).unwrap().to_vec(), vec![-0.1, -0.2, -0.3]);
        assert!(buffer.channel(2).is_none());
        assert_eq!(buffer.interleaved(), vec![0.1, -0.1, 0.2, -0.2, 0.3, -0.3]);
    }

    #[test]
    fn test_to_mono_averages() {
        let buffer = AudioBuffer::from_interleaved(44100, 2, vec![1.0, 0.0, 0.5, 0.5, -1.0, 1.0]).unwrap();
        let mono = buffer.to_mono();
        assert_eq!(mono.channels(), 1);
        assert_eq!(mono.sample_rate(), 44100);
        assert_eq!(mono.interleaved(), vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_to_mono_averages_surround() {
        let buffer = AudioBuffer::from_interleaved(48000, 3, vec![0.3, 0.6, 0.9, -0.3, 0.0, 0.0]).unwrap();
        let mono = buffer.to_mono();
        assert_eq!(mono.samples().dim(), (2, 1));
        let values = mono.interleaved();
        assert!((values[0] - 0.6).abs() < 1e-6);
        assert!((values[1] + 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_to_mono_does_not_renormalize() {
        let buffer = AudioBuffer::from_interleaved(16000, 2, vec![3.0, 1.0]).unwrap();
        assert_eq!(buffer.to_mono().interleaved(), vec![2.0]);
    }

    #[test]
    fn test_empty_buffer() {
        let buffer = AudioBuffer::from_interleaved(16000, 2, vec![]).unwrap();
        assert!(buffer.is_empty());
        let mono = buffer.to_mono();
        assert_eq!(mono.channels(), 1);
        assert_eq!(mono.frames(), 0);
    }
}
