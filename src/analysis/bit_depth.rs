// src/analysis/bit_depth.rs
//
// Effective bit depth estimation from LSB-toggle statistics.
// A 16-bit master padded into a 24-bit container leaves the bottom 8 bits
// of every quantized sample at zero; walking zero-ratios up from the LSB
// recovers the real resolution.

use log::debug;
use serde::Serialize;

use crate::audio::PcmAudio;

/// Sample budget for the LSB statistics pass.
const MAX_SAMPLES: usize = 2_000_000;

/// Zero-ratio above which a bit position is considered unused.
const UNUSED_BIT_RATIO: f64 = 0.999;

/// Bit depth analysis result
#[derive(Debug, Clone, Serialize)]
pub struct BitDepthResult {
    /// Bit depth reported by the container (clamped to 32, default 32).
    pub reported_bit_depth: u8,
    /// Resolution actually carried by the samples.
    pub effective_bit_depth: u8,
    /// RMS noise floor in dBFS from a sparse stride over raw samples.
    pub noise_floor_db: f32,
    /// 0-100, driven by how many samples the stride visited.
    pub confidence: f32,
}

/// Estimate the effective bit depth of the signal.
pub fn analyze_bit_depth(audio: &PcmAudio) -> BitDepthResult {
    let bit_depth = audio.bit_depth().unwrap_or(32).clamp(1, 32);
    let frames = audio.frames();
    let num_channels = audio.channel_count();
    let total = frames * num_channels;
    let step = (total / MAX_SAMPLES).max(1);

    let scale = (1u64 << (bit_depth - 1)) as f64;
    let mut zero_counts = [0u64; 32];
    let mut sampled = 0u64;

    // Uniform stride across the concatenation of all channels.
    let mut idx = 0usize;
    while idx < total {
        let ch = idx / frames;
        let pos = idx % frames;
        let value = (audio.channels()[ch][pos] as f64 * scale).round() as i64;
        for bit in 0..bit_depth as usize {
            if value >> bit & 1 == 0 {
                zero_counts[bit] += 1;
            }
        }
        sampled += 1;
        idx += step;
    }
    debug!("bit depth: sampled {} of {} values (stride {})", sampled, total, step);

    let mut effective = bit_depth;
    if sampled > 0 {
        for bit in 0..bit_depth as usize {
            let zero_ratio = zero_counts[bit] as f64 / sampled as f64;
            if zero_ratio > UNUSED_BIT_RATIO {
                effective = bit_depth - bit as u8 - 1;
            } else {
                break;
            }
        }
    }

    // Sparser stride for the noise floor, over raw (unscaled) samples.
    let noise_step = step * 10;
    let mut sq_sum = 0.0f64;
    let mut noise_count = 0u64;
    let mut idx = 0usize;
    while idx < total {
        let ch = idx / frames;
        let pos = idx % frames;
        let s = audio.channels()[ch][pos] as f64;
        sq_sum += s * s;
        noise_count += 1;
        idx += noise_step;
    }
    let rms = if noise_count > 0 {
        (sq_sum / noise_count as f64).sqrt()
    } else {
        0.0
    };
    let noise_floor_db = (20.0 * rms.max(1e-10).log10()) as f32;

    let confidence = ((sampled as f64 / 100_000.0 * 100.0).round()).min(100.0) as f32;

    BitDepthResult {
        reported_bit_depth: bit_depth,
        effective_bit_depth: effective,
        noise_floor_db,
        confidence,
    }
}
