// src/analysis/stereo.rs
//
// Stereo-field analysis: channel correlation, mid/side energy balance,
// and the energy a mono fold-down would lose.

use serde::Serialize;

use crate::audio::PcmAudio;

/// Sample-pair budget; longer signals are strided.
const MAX_PAIRS: usize = 5_000_000;

/// Stereo field analysis result
#[derive(Debug, Clone, Serialize)]
pub struct StereoResult {
    /// Pearson correlation between left and right, -1..1.
    pub correlation: f32,
    /// Side share of total mid+side energy: 0 = mono, 1 = pure side.
    pub stereo_width: f32,
    /// Normalized mid energy share.
    pub mid_energy: f32,
    /// Normalized side energy share.
    pub side_energy: f32,
    /// Percentage of energy lost when folding to mono, 0-100.
    pub mono_compatibility_loss: f32,
}

/// Analyze the stereo field of the first two channels.
///
/// Single-channel input gets the fixed neutral result (perfect correlation,
/// zero width, no fold-down loss).
pub fn analyze_stereo(audio: &PcmAudio) -> StereoResult {
    if audio.channel_count() < 2 {
        return StereoResult {
            correlation: 1.0,
            stereo_width: 0.0,
            mid_energy: 1.0,
            side_energy: 0.0,
            mono_compatibility_loss: 0.0,
        };
    }

    let left = &audio.channels()[0];
    let right = &audio.channels()[1];
    let len = audio.frames();
    let step = (len / MAX_PAIRS).max(1);

    let mut sum_lr = 0.0f64;
    let mut sum_ll = 0.0f64;
    let mut sum_rr = 0.0f64;
    let mut mid_sum = 0.0f64;
    let mut side_sum = 0.0f64;
    let mut mono_energy = 0.0f64;
    let mut stereo_energy = 0.0f64;

    let mut i = 0usize;
    while i < len {
        let l = left[i] as f64;
        let r = right[i] as f64;
        sum_lr += l * r;
        sum_ll += l * l;
        sum_rr += r * r;
        let mid = (l + r) / 2.0;
        let side = (l - r) / 2.0;
        mid_sum += mid * mid;
        side_sum += side * side;
        mono_energy += mid * mid;
        stereo_energy += l * l + r * r;
        i += step;
    }

    let denom = (sum_ll * sum_rr).sqrt();
    let correlation = if denom > 0.0 {
        (sum_lr / denom) as f32
    } else {
        0.0
    };

    let total = mid_sum + side_sum;
    let (stereo_width, mid_energy, side_energy) = if total > 0.0 {
        (
            (side_sum / total) as f32,
            (mid_sum / total) as f32,
            (side_sum / total) as f32,
        )
    } else {
        (0.0, 0.0, 0.0)
    };

    let mono_compatibility_loss = if stereo_energy > 0.0 {
        ((1.0 - 2.0 * mono_energy / stereo_energy).max(0.0) * 100.0) as f32
    } else {
        0.0
    };

    StereoResult {
        correlation,
        stereo_width,
        mid_energy,
        side_energy,
        mono_compatibility_loss,
    }
}
