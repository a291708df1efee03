// src/analysis/lossy.rs
//
// Lossy-transcode detection: subband spectral holes plus encoder cutoff
// fingerprinting. Perceptual codecs suppress whole subbands and apply
// near-brick-wall lowpass filters at a handful of well-known frequencies;
// both survive a transcode back to a lossless container.

use log::debug;
use serde::Serialize;

use crate::audio::PcmAudio;
use crate::dsp::{SpectralAverager, WindowType};

const FFT_SIZE: usize = 8192;
const MAX_FRAMES: usize = 150;

const NUM_SUBBANDS: usize = 32;

/// A band this far (dB) below its neighbors' mean counts as a hole.
const HOLE_DEPTH_DB: f32 = 20.0;

/// Lowpass frequencies used by common MP3/AAC encoder presets.
const CUTOFF_CANDIDATES_HZ: [f32; 6] = [16000.0, 16500.0, 17000.0, 18000.0, 19000.0, 20000.0];

/// dB drop across a candidate cutoff that marks an encoder lowpass.
const CUTOFF_DROP_DB: f32 = 30.0;

/// Lossy-transcode detection result
#[derive(Debug, Clone, Serialize)]
pub struct LossyResult {
    pub is_lossy: bool,
    /// Subbands anomalously suppressed relative to their neighbors.
    pub spectral_holes: u32,
    /// Matched encoder lowpass description, if any.
    pub encoder_fingerprint: Option<String>,
    /// 0-100 composite of holes, fingerprint, and frame coverage.
    pub confidence: f32,
}

/// Detect traces of a lossy-codec generation in the signal.
pub fn analyze_lossy(audio: &PcmAudio) -> LossyResult {
    let nyquist = audio.sample_rate() as f32 / 2.0;
    let mono = audio.mix_to_mono();

    let averager = SpectralAverager::new(FFT_SIZE, MAX_FRAMES, WindowType::Hann);
    let averaged = averager.averaged_magnitude_db(&mono);
    if averaged.frames == 0 {
        return LossyResult {
            is_lossy: false,
            spectral_holes: 0,
            encoder_fingerprint: None,
            confidence: 0.0,
        };
    }
    let db = &averaged.bins;
    let half = db.len();

    // Mean level per subband over 32 equal-width slices of the half spectrum.
    let band_width = half / NUM_SUBBANDS;
    let band_means: Vec<f32> = (0..NUM_SUBBANDS)
        .map(|b| {
            let start = b * band_width;
            let end = start + band_width;
            db[start..end].iter().sum::<f32>() / band_width as f32
        })
        .collect();

    let mut spectral_holes = 0u32;
    for b in 1..NUM_SUBBANDS - 1 {
        let neighbor_mean = (band_means[b - 1] + band_means[b + 1]) / 2.0;
        if neighbor_mean - band_means[b] > HOLE_DEPTH_DB {
            spectral_holes += 1;
        }
    }

    let mut encoder_fingerprint = None;
    for &freq in &CUTOFF_CANDIDATES_HZ {
        if freq >= nyquist {
            continue;
        }
        let bin = (freq / nyquist * half as f32) as usize;
        if bin < 5 || bin + 5 >= half {
            continue;
        }
        if db[bin - 5] - db[bin + 5] > CUTOFF_DROP_DB {
            debug!("encoder cutoff fingerprint at {} Hz (bin {})", freq, bin);
            encoder_fingerprint = Some(format!("Sharp cutoff at ~{}Hz (likely MP3)", freq as u32));
            break;
        }
    }

    let is_lossy = spectral_holes > 5 || encoder_fingerprint.is_some();
    let confidence = (spectral_holes as f32 * 15.0
        + if encoder_fingerprint.is_some() { 40.0 } else { 0.0 }
        + (averaged.frames as f32 * 0.4).min(20.0))
    .clamp(0.0, 100.0);

    LossyResult {
        is_lossy,
        spectral_holes,
        encoder_fingerprint,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::test_signals::{band_limited_noise, white_noise};

    fn audio(samples: Vec<f32>, rate: u32) -> PcmAudio {
        PcmAudio::new(vec![samples], rate, None, None).unwrap()
    }

    #[test]
    fn test_white_noise_is_clean() {
        let result = analyze_lossy(&audio(white_noise(44100 * 4, 17), 44100));
        assert!(!result.is_lossy);
        assert_eq!(result.spectral_holes, 0);
        assert!(result.encoder_fingerprint.is_none());
    }

    #[test]
    fn test_hard_16k_lowpass_fingerprints_as_mp3() {
        let samples = band_limited_noise(44100 * 4, 44100, 16000.0, 23);
        let result = analyze_lossy(&audio(samples, 44100));
        let fp = result.encoder_fingerprint.expect("no fingerprint matched");
        assert!(fp.contains("16000Hz"), "{}", fp);
        assert!(result.is_lossy);
        assert!(result.confidence >= 40.0);
    }

    #[test]
    fn test_candidates_above_nyquist_are_skipped() {
        // 22.05 kHz Nyquist at a 44.1k rate leaves all six candidates valid,
        // but a 32k rate (16 kHz Nyquist) must skip every one of them.
        let samples = band_limited_noise(32000 * 4, 32000, 15000.0, 29);
        let result = analyze_lossy(&audio(samples, 32000));
        assert!(result.encoder_fingerprint.is_none());
    }

    #[test]
    fn test_too_short_input() {
        let result = analyze_lossy(&audio(vec![0.1; 4000], 44100));
        assert!(!result.is_lossy);
        assert_eq!(result.confidence, 0.0);
    }
}
