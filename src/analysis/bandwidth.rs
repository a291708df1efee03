// src/analysis/bandwidth.rs
//
// Frequency ceiling detection and upsampling classification.
// A genuine 96 kHz recording carries energy well above 24 kHz; an upsampled
// CD rip stops near 22 kHz, a lossy transcode earlier still.

use serde::Serialize;

use crate::audio::PcmAudio;
use crate::dsp::{SpectralAverager, WindowType, DB_FLOOR};

const FFT_SIZE: usize = 8192;
const MAX_FRAMES: usize = 200;

/// dB above the noise floor a bin must clear to count as signal.
const CEILING_THRESHOLD_DB: f32 = 10.0;

/// Bandwidth analysis result
#[derive(Debug, Clone, Serialize)]
pub struct BandwidthResult {
    /// Highest frequency with energy above the noise floor, Hz.
    pub frequency_ceiling_hz: f32,
    /// Fraction of the available spectrum actually used (ceiling / Nyquist).
    pub used_bandwidth: f32,
    /// Level drop across the ceiling, dB. Large values mean a brick wall.
    pub cutoff_sharpness_db: f32,
    /// Estimated noise floor, dB.
    pub noise_floor_db: f32,
    /// Human-readable source classification.
    pub classification: String,
    pub is_upsampled: bool,
    /// 0-100, driven by how many frames were averaged.
    pub confidence: f32,
}

/// Classify the signal's frequency ceiling against its sample rate.
pub fn analyze_bandwidth(audio: &PcmAudio) -> BandwidthResult {
    let sample_rate = audio.sample_rate();
    let nyquist = sample_rate as f32 / 2.0;
    let mono = audio.mix_to_mono();

    let averager = SpectralAverager::new(FFT_SIZE, MAX_FRAMES, WindowType::Hann);
    let averaged = averager.averaged_power(&mono);
    if averaged.frames == 0 {
        return BandwidthResult {
            frequency_ceiling_hz: 0.0,
            used_bandwidth: 0.0,
            cutoff_sharpness_db: 0.0,
            noise_floor_db: DB_FLOOR,
            classification: "Insufficient data".to_string(),
            is_upsampled: false,
            confidence: 0.0,
        };
    }

    let half = averaged.bins.len();
    let db: Vec<f32> = averaged
        .bins
        .iter()
        .map(|&p| if p > 0.0 { 10.0 * p.log10() } else { DB_FLOOR })
        .collect();

    // Noise floor from the 10th percentile of the sorted spectrum.
    let mut sorted = db.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let noise_floor_db = sorted[(half as f32 * 0.1) as usize];
    let threshold = noise_floor_db + CEILING_THRESHOLD_DB;

    // First bin from Nyquist downward that clears the threshold.
    let ceiling_bin = (0..half).rev().find(|&i| db[i] > threshold).unwrap_or(0);
    let frequency_ceiling_hz = ceiling_bin as f32 / half as f32 * nyquist;

    let w = 20.min(half - ceiling_bin);
    let cutoff_sharpness_db = if w > 0 && ceiling_bin + w < half {
        db[ceiling_bin.saturating_sub(w)] - db[ceiling_bin + w]
    } else {
        0.0
    };

    let (classification, is_upsampled) = classify(frequency_ceiling_hz, sample_rate);
    let confidence = ((averaged.frames as f32 / 2.0 * 10.0).round()).min(100.0);

    BandwidthResult {
        frequency_ceiling_hz,
        used_bandwidth: frequency_ceiling_hz / nyquist,
        cutoff_sharpness_db,
        noise_floor_db,
        classification: classification.to_string(),
        is_upsampled,
        confidence,
    }
}

fn classify(ceiling_hz: f32, sample_rate: u32) -> (&'static str, bool) {
    let lossy_range = sample_rate >= 44100;
    if lossy_range && ceiling_hz < 16500.0 {
        ("MP3/AAC (≤128kbps)", true)
    } else if lossy_range && ceiling_hz < 18000.0 {
        ("Lossy (≤192kbps)", true)
    } else if lossy_range && ceiling_hz < 20500.0 {
        ("CD-quality/high-bitrate lossy", sample_rate > 48000)
    } else if ceiling_hz < 24000.0 && sample_rate > 48000 {
        ("Likely 48kHz source", true)
    } else {
        ("Genuine high-resolution", false)
    }
}
