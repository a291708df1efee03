// src/analysis/loudness.rs
//
// ITU-R BS.1770-4 loudness metering: K-weighting prefilter cascade,
// 400 ms gating blocks, two-stage (absolute + relative) gating, short-term
// and momentary series, loudness range, sample peak.
//
// -inf LUFS is the "no measurable loudness" sentinel throughout: silent
// input, or input too short to produce a single gated block, both land there.

use log::debug;
use serde::Serialize;
use std::f64::consts::PI;

use crate::audio::{AudioError, PcmAudio};

/// Per-channel weights for 3-5 channel layouts, assumed (L, R, C, Ls, Rs).
/// Mono and stereo use 1.0 everywhere. Layouts beyond 5 channels are
/// rejected rather than guessed at.
const CHANNEL_WEIGHTS: [f64; 5] = [1.0, 1.0, 1.0, 1.41, 1.41];

/// Absolute gate threshold: -70 LUFS expressed as block power.
fn absolute_gate_power() -> f64 {
    10f64.powf((-70.0 + 0.691) / 10.0)
}

/// Stage 1 shelf: frequency, gain (dB), Q from the BS.1770-4 prefilter design.
const SHELF_FC: f64 = 1681.974450955533;
const SHELF_GAIN_DB: f64 = 3.999843853973347;
const SHELF_Q: f64 = 0.7071752369554196;

/// Stage 2 RLB high-pass design parameters.
const HIGHPASS_FC: f64 = 38.13547087602444;
const HIGHPASS_Q: f64 = 0.5003270373238773;

const BLOCK_SECS: f64 = 0.4;
const BLOCK_HOP_SECS: f64 = 0.1;
const SHORT_TERM_SECS: f64 = 3.0;
const SHORT_TERM_HOP_SECS: f64 = 1.0;

/// Loudness measurement result
#[derive(Debug, Clone, Serialize)]
pub struct LoudnessResult {
    /// Gated integrated loudness, LUFS. `-inf` when nothing passes the gates.
    pub integrated_lufs: f64,
    /// One ungated value per 400 ms block.
    pub momentary_lufs: Vec<f64>,
    /// One value per 3 s window hopped at 1 s.
    pub short_term_lufs: Vec<f64>,
    /// Loudness range (LRA) in LU from the short-term distribution.
    pub loudness_range_lu: f64,
    /// Sample peak in dBFS. This is NOT an oversampled true peak; inter-sample
    /// overs are not captured.
    pub true_peak_dbfs: f64,
}

/// One biquad stage in direct form I, f64 state.
struct Biquad {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    x1: f64,
    x2: f64,
    y1: f64,
    y2: f64,
}

impl Biquad {
    /// Stage 1: high shelf via the pre-warped bilinear transform.
    fn k_weight_shelf(sample_rate: u32) -> Self {
        let k = (PI * SHELF_FC / sample_rate as f64).tan();
        let vh = 10f64.powf(SHELF_GAIN_DB / 20.0);
        let vb = vh.powf(0.4996667741545416);
        let a0 = 1.0 + k / SHELF_Q + k * k;
        Self {
            b0: (vh + vb * k / SHELF_Q + k * k) / a0,
            b1: 2.0 * (k * k - vh) / a0,
            b2: (vh - vb * k / SHELF_Q + k * k) / a0,
            a1: 2.0 * (k * k - 1.0) / a0,
            a2: (1.0 - k / SHELF_Q + k * k) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Stage 2: RLB high-pass, numerator [1, -2, 1] before normalization.
    fn k_weight_highpass(sample_rate: u32) -> Self {
        let k = (PI * HIGHPASS_FC / sample_rate as f64).tan();
        let a0 = 1.0 + k / HIGHPASS_Q + k * k;
        Self {
            b0: 1.0,
            b1: -2.0,
            b2: 1.0,
            a1: 2.0 * (k * k - 1.0) / a0,
            a2: (1.0 - k / HIGHPASS_Q + k * k) / a0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    fn process(&mut self, x: f64) -> f64 {
        let y = self.b0 * x + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;
        self.x2 = self.x1;
        self.x1 = x;
        self.y2 = self.y1;
        self.y1 = y;
        y
    }
}

/// Measure loudness per BS.1770-4.
///
/// Errors only for unsupported channel layouts (>5 channels); every
/// low-signal case resolves to `-inf` sentinels instead.
pub fn analyze_loudness(audio: &PcmAudio) -> Result<LoudnessResult, AudioError> {
    let num_channels = audio.channel_count();
    if num_channels > CHANNEL_WEIGHTS.len() {
        return Err(AudioError::UnsupportedChannelLayout {
            channels: num_channels,
        });
    }
    let sample_rate = audio.sample_rate();
    let frames = audio.frames();

    let weights: Vec<f64> = if num_channels <= 2 {
        vec![1.0; num_channels]
    } else {
        CHANNEL_WEIGHTS[..num_channels].to_vec()
    };

    // K-weight each channel through the two-stage cascade.
    let filtered: Vec<Vec<f32>> = audio
        .channels()
        .iter()
        .map(|ch| {
            let mut shelf = Biquad::k_weight_shelf(sample_rate);
            let mut highpass = Biquad::k_weight_highpass(sample_rate);
            ch.iter()
                .map(|&s| highpass.process(shelf.process(s as f64)) as f32)
                .collect()
        })
        .collect();

    // Weighted block power over an arbitrary window of the filtered signal.
    let block_power = |start: usize, len: usize| -> f64 {
        let mut power = 0.0f64;
        for (ch, &weight) in filtered.iter().zip(weights.iter()) {
            let mut sq = 0.0f64;
            for &s in &ch[start..start + len] {
                sq += s as f64 * s as f64;
            }
            power += weight * sq / len as f64;
        }
        power
    };

    let to_lufs = |power: f64| -> f64 {
        if power > 0.0 {
            -0.691 + 10.0 * power.log10()
        } else {
            f64::NEG_INFINITY
        }
    };

    // 400 ms blocks at a 100 ms hop (75% overlap).
    let block_len = (sample_rate as f64 * BLOCK_SECS).round() as usize;
    let block_hop = (sample_rate as f64 * BLOCK_HOP_SECS).round() as usize;
    let mut block_powers = Vec::new();
    let mut start = 0usize;
    while start + block_len <= frames {
        block_powers.push(block_power(start, block_len));
        start += block_hop;
    }

    let momentary_lufs: Vec<f64> = block_powers.iter().map(|&p| to_lufs(p)).collect();

    // Two-stage gating.
    let abs_gate = absolute_gate_power();
    let above_absolute: Vec<f64> = block_powers
        .iter()
        .copied()
        .filter(|&p| p > abs_gate)
        .collect();
    let integrated_lufs = if above_absolute.is_empty() {
        f64::NEG_INFINITY
    } else {
        let abs_gated_mean = above_absolute.iter().sum::<f64>() / above_absolute.len() as f64;
        let rel_gate = abs_gated_mean * 10f64.powf(-1.0);
        let gated: Vec<f64> = block_powers
            .iter()
            .copied()
            .filter(|&p| p > abs_gate && p > rel_gate)
            .collect();
        if gated.is_empty() {
            f64::NEG_INFINITY
        } else {
            to_lufs(gated.iter().sum::<f64>() / gated.len() as f64)
        }
    };
    debug!(
        "loudness: {} blocks, {} past the absolute gate, integrated {:.2} LUFS",
        block_powers.len(),
        above_absolute.len(),
        integrated_lufs
    );

    // Short-term: 3 s windows hopped at 1 s, ungated.
    let st_len = (sample_rate as f64 * SHORT_TERM_SECS).round() as usize;
    let st_hop = (sample_rate as f64 * SHORT_TERM_HOP_SECS).round() as usize;
    let mut short_term_lufs = Vec::new();
    let mut start = 0usize;
    while start + st_len <= frames {
        short_term_lufs.push(to_lufs(block_power(start, st_len)));
        start += st_hop;
    }

    // LRA from the finite short-term values above -70 LUFS.
    let mut audible: Vec<f64> = short_term_lufs
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > -70.0)
        .collect();
    audible.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let loudness_range_lu = if audible.is_empty() {
        0.0
    } else {
        let n = audible.len();
        audible[(n as f64 * 0.95) as usize] - audible[(n as f64 * 0.1) as usize]
    };

    // Sample peak over raw, unfiltered samples.
    let peak = audio
        .channels()
        .iter()
        .flat_map(|ch| ch.iter())
        .fold(0.0f32, |acc, &s| acc.max(s.abs()));
    let true_peak_dbfs = if peak > 0.0 {
        20.0 * (peak as f64).log10()
    } else {
        f64::NEG_INFINITY
    };

    Ok(LoudnessResult {
        integrated_lufs,
        momentary_lufs,
        short_term_lufs,
        loudness_range_lu,
        true_peak_dbfs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f64, amplitude: f64, secs: f64, rate: u32) -> Vec<f32> {
        let n = (secs * rate as f64) as usize;
        (0..n)
            .map(|i| (amplitude * (2.0 * PI * freq * i as f64 / rate as f64).sin()) as f32)
            .collect()
    }

    #[test]
    fn test_silence_yields_sentinels() {
        let audio = PcmAudio::new(vec![vec![0.0; 48000 * 10]], 48000, None, None).unwrap();
        let result = analyze_loudness(&audio).unwrap();
        assert_eq!(result.integrated_lufs, f64::NEG_INFINITY);
        assert!(!result.momentary_lufs.is_empty());
        assert!(result.momentary_lufs.iter().all(|v| *v == f64::NEG_INFINITY));
        assert!(result.short_term_lufs.iter().all(|v| *v == f64::NEG_INFINITY));
        assert_eq!(result.loudness_range_lu, 0.0);
        assert_eq!(result.true_peak_dbfs, f64::NEG_INFINITY);
    }

    #[test]
    fn test_full_scale_1khz_sine_reference_level() {
        // BS.1770 calibration point: a 0 dBFS ~1 kHz sine in a single channel
        // measures -3.01 LKFS (the 0.691 offset cancels the K-weighting gain
        // in this region).
        let audio =
            PcmAudio::new(vec![sine(1000.0, 1.0, 5.0, 48000)], 48000, None, None).unwrap();
        let result = analyze_loudness(&audio).unwrap();
        assert!(
            (result.integrated_lufs - (-3.01)).abs() < 0.1,
            "integrated = {}",
            result.integrated_lufs
        );
        assert!((result.true_peak_dbfs - 0.0).abs() < 0.01);
    }

    #[test]
    fn test_stereo_doubles_power() {
        let left = sine(1000.0, 0.5, 5.0, 48000);
        let audio =
            PcmAudio::new(vec![left.clone(), left], 48000, None, None).unwrap();
        let result = analyze_loudness(&audio).unwrap();
        // Two identical channels sum their power: +3.01 dB over one.
        let mono = PcmAudio::new(
            vec![sine(1000.0, 0.5, 5.0, 48000)],
            48000,
            None,
            None,
        )
        .unwrap();
        let mono_result = analyze_loudness(&mono).unwrap();
        assert!((result.integrated_lufs - mono_result.integrated_lufs - 3.01).abs() < 0.05);
    }

    #[test]
    fn test_rejects_six_channels() {
        let audio =
            PcmAudio::new(vec![vec![0.0; 48000]; 6], 48000, None, None).unwrap();
        assert!(matches!(
            analyze_loudness(&audio),
            Err(AudioError::UnsupportedChannelLayout { channels: 6 })
        ));
    }

    #[test]
    fn test_short_input_has_no_blocks() {
        // 100 ms of audio: shorter than one 400 ms block.
        let audio = PcmAudio::new(vec![sine(440.0, 0.5, 0.1, 48000)], 48000, None, None).unwrap();
        let result = analyze_loudness(&audio).unwrap();
        assert!(result.momentary_lufs.is_empty());
        assert_eq!(result.integrated_lufs, f64::NEG_INFINITY);
    }

    #[test]
    fn test_quiet_tail_is_gated_out() {
        // 4 s at a solid level then 4 s near silence. The relative gate keeps
        // the integrated value close to the loud section alone.
        let rate = 48000;
        let mut samples = sine(1000.0, 0.5, 4.0, rate);
        samples.extend(sine(1000.0, 0.0005, 4.0, rate));
        let audio = PcmAudio::new(vec![samples], rate, None, None).unwrap();
        let result = analyze_loudness(&audio).unwrap();

        let loud_only =
            PcmAudio::new(vec![sine(1000.0, 0.5, 4.0, rate)], rate, None, None).unwrap();
        let loud_result = analyze_loudness(&loud_only).unwrap();
        assert!(
            (result.integrated_lufs - loud_result.integrated_lufs).abs() < 0.5,
            "gated {} vs loud-only {}",
            result.integrated_lufs,
            loud_result.integrated_lufs
        );
    }

    #[test]
    fn test_lra_of_steady_tone_is_zero() {
        let audio =
            PcmAudio::new(vec![sine(1000.0, 0.3, 10.0, 48000)], 48000, None, None).unwrap();
        let result = analyze_loudness(&audio).unwrap();
        assert!(result.loudness_range_lu < 0.1);
    }
}
