// src/analysis/dynamics.rs
//
// Dynamic range measurement: block-based DR score (TT Dynamic Range Meter
// convention), global crest factor, and clipped-sample count.

use serde::Serialize;

use crate::audio::PcmAudio;

const BLOCK_SECS: f64 = 3.0;

/// Samples at or above this magnitude count as clipped.
const CLIP_THRESHOLD: f32 = 0.99;

/// Dynamic range analysis result
#[derive(Debug, Clone, Serialize)]
pub struct DynamicsResult {
    /// TT-style DR score: the second-highest per-block peak/RMS ratio,
    /// rounded. Rejects one anomalously loud block.
    pub dr_score: u32,
    /// Global peak-to-RMS ratio in dB. `-inf` for silence.
    pub crest_factor_db: f64,
    /// Global peak in dBFS. `-inf` for silence.
    pub peak_dbfs: f64,
    /// Global RMS in dBFS. `-inf` for silence.
    pub rms_dbfs: f64,
    /// Samples with |s| >= 0.99, pooled over all channels.
    pub clipped_samples: u64,
}

/// Measure dynamic range, crest factor, and clipping.
pub fn analyze_dynamics(audio: &PcmAudio) -> DynamicsResult {
    let frames = audio.frames();
    let block_len = (audio.sample_rate() as f64 * BLOCK_SECS).round() as usize;
    let num_blocks = (frames / block_len).max(1);

    let mut block_dr = Vec::with_capacity(num_blocks);
    let mut global_peak = 0.0f64;
    let mut global_sq = 0.0f64;
    let mut global_count = 0u64;
    let mut clipped_samples = 0u64;

    for b in 0..num_blocks {
        let start = b * block_len;
        let end = ((b + 1) * block_len).min(frames);

        let mut block_peak = 0.0f64;
        let mut block_sq = 0.0f64;
        let mut block_count = 0u64;
        for ch in audio.channels() {
            for &s in &ch[start..end] {
                let mag = s.abs();
                if mag >= CLIP_THRESHOLD {
                    clipped_samples += 1;
                }
                let v = mag as f64;
                block_peak = block_peak.max(v);
                block_sq += v * v;
                block_count += 1;
            }
        }
        global_peak = global_peak.max(block_peak);
        global_sq += block_sq;
        global_count += block_count;

        let block_rms = (block_sq / block_count as f64).sqrt();
        if block_peak > 0.0 && block_rms > 0.0 {
            block_dr.push(20.0 * (block_peak / block_rms).log10());
        }
    }

    // Any tail shorter than a full block still contributes to the global
    // stats and the clip count, just not to a DR block of its own.
    let tail_start = num_blocks * block_len;
    if tail_start < frames {
        for ch in audio.channels() {
            for &s in &ch[tail_start..] {
                let mag = s.abs();
                if mag >= CLIP_THRESHOLD {
                    clipped_samples += 1;
                }
                let v = mag as f64;
                global_peak = global_peak.max(v);
                global_sq += v * v;
                global_count += 1;
            }
        }
    }

    block_dr.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let dr_score = match block_dr.len() {
        0 => 0,
        1 => block_dr[0].round() as u32,
        _ => block_dr[1].round() as u32,
    };

    let global_rms = (global_sq / global_count as f64).sqrt();
    let db = |v: f64| {
        if v > 0.0 {
            20.0 * v.log10()
        } else {
            f64::NEG_INFINITY
        }
    };
    let crest_factor_db = if global_peak > 0.0 && global_rms > 0.0 {
        20.0 * (global_peak / global_rms).log10()
    } else {
        f64::NEG_INFINITY
    };

    DynamicsResult {
        dr_score,
        crest_factor_db,
        peak_dbfs: db(global_peak),
        rms_dbfs: db(global_rms),
        clipped_samples,
    }
}
