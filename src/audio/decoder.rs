//! Whole-file decoding through symphonia

use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use log::{debug, warn};
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use crate::audio::AudioBuffer;
use crate::error::{AudioPrepError, DecodeCause, Result};

/// Decode every packet of the first audio track at its native sample rate,
/// keeping the channel layout.
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<AudioBuffer> {
    let path = path.as_ref();

    let file = File::open(path).map_err(|e| {
        AudioPrepError::decode(
            DecodeCause::Library,
            format!("Cannot open audio file {}: {}", path.display(), e),
        )
    })?;
    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe().format(
        &hint,
        mss,
        &FormatOptions::default(),
        &MetadataOptions::default(),
    )?;
    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AudioPrepError::decode(DecodeCause::Library, "No supported audio tracks"))?;

    let track_id = track.id;
    let mut sample_rate = track.codec_params.sample_rate;
    let mut channels = track.codec_params.channels.map(|c| c.count());

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(ref e)) if e.kind() == ErrorKind::UnexpectedEof => break,
            Err(SymphoniaError::ResetRequired) => {
                debug!("Track list changed mid-stream, stopping at {} samples", samples.len());
                break;
            }
            Err(e) => return Err(e.into()),
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => {
                let spec = *decoded.spec();
                let rate = *sample_rate.get_or_insert(spec.rate);
                if rate != spec.rate {
                    warn!("Sample rate changed mid-stream in {} ({} -> {})", path.display(), rate, spec.rate);
                }
                let count = spec.channels.count();
                if *channels.get_or_insert(count) != count {
                    return Err(AudioPrepError::decode(
                        DecodeCause::Library,
                        format!("Channel count changed mid-stream in {}", path.display()),
                    ));
                }

                let mut sample_buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
                sample_buf.copy_interleaved_ref(decoded);
                samples.extend_from_slice(sample_buf.samples());
            }
            Err(SymphoniaError::DecodeError(e)) => {
                warn!("Skipping undecodable packet in {}: {}", path.display(), e);
            }
            Err(e) => return Err(e.into()),
        }
    }

    let sample_rate = sample_rate
        .ok_or_else(|| AudioPrepError::decode(DecodeCause::Library, "Unknown sample rate"))?;
    let channels = channels
        .ok_or_else(|| AudioPrepError::decode(DecodeCause::Library, "Unknown channel count"))?;

    debug!(
        "Decoded {}: {} Hz, {} channel(s), {} samples",
        path.display(),
        sample_rate,
        channels,
        samples.len()
    );

    AudioBuffer::from_interleaved(sample_rate, channels, samples)
}
