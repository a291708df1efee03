// src/audio/mod.rs
//
// Decoded PCM container and input contract validation.
// Upstream parsers/decoders supply this type; every analyzer consumes it.

use thiserror::Error;

pub mod wav;

pub use wav::load_wav;

/// Errors for malformed analysis input.
///
/// These are contract violations only. Silent or degenerate-but-well-formed
/// signals never error; they resolve to the documented sentinels
/// (`-inf` dB, zero counts).
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("audio has no channels")]
    NoChannels,

    #[error("channel {channel} has {got} samples, expected {expected}")]
    ChannelLengthMismatch {
        channel: usize,
        got: usize,
        expected: usize,
    },

    #[error("channels are empty")]
    EmptyChannels,

    #[error("sample rate must be positive")]
    InvalidSampleRate,

    #[error("{channels}-channel layouts are not supported (maximum 5)")]
    UnsupportedChannelLayout { channels: usize },
}

/// Decoded PCM audio, planar f32 in nominal [-1, 1].
///
/// Constructed only through [`PcmAudio::new`], which enforces the input
/// contract: at least one channel, all channels the same non-zero length,
/// positive sample rate. The optional reported bit depth and header sample
/// rate come from the (out-of-scope) container parser and are used by the
/// bit-depth analyzer and the verdict aggregator.
#[derive(Debug, Clone)]
pub struct PcmAudio {
    channels: Vec<Vec<f32>>,
    sample_rate: u32,
    bit_depth: Option<u8>,
    header_sample_rate: Option<u32>,
}

impl PcmAudio {
    pub fn new(
        channels: Vec<Vec<f32>>,
        sample_rate: u32,
        bit_depth: Option<u8>,
        header_sample_rate: Option<u32>,
    ) -> Result<Self, AudioError> {
        if channels.is_empty() {
            return Err(AudioError::NoChannels);
        }
        let expected = channels[0].len();
        if expected == 0 {
            return Err(AudioError::EmptyChannels);
        }
        for (i, ch) in channels.iter().enumerate() {
            if ch.len() != expected {
                return Err(AudioError::ChannelLengthMismatch {
                    channel: i,
                    got: ch.len(),
                    expected,
                });
            }
        }
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate);
        }
        Ok(Self {
            channels,
            sample_rate,
            bit_depth,
            header_sample_rate,
        })
    }

    pub fn channels(&self) -> &[Vec<f32>] {
        &self.channels
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn frames(&self) -> usize {
        self.channels[0].len()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn bit_depth(&self) -> Option<u8> {
        self.bit_depth
    }

    pub fn header_sample_rate(&self) -> Option<u32> {
        self.header_sample_rate
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Mix down to mono by straight per-sample channel average.
    pub fn mix_to_mono(&self) -> Vec<f32> {
        if self.channels.len() == 1 {
            return self.channels[0].clone();
        }
        let n = self.frames();
        let scale = 1.0 / self.channels.len() as f32;
        let mut mono = vec![0.0f32; n];
        for ch in &self.channels {
            for (m, &s) in mono.iter_mut().zip(ch.iter()) {
                *m += s;
            }
        }
        for m in &mut mono {
            *m *= scale;
        }
        mono
    }
}
