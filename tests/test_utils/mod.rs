// tests/test_utils/mod.rs
//
// Shared synthetic-signal helpers for the integration tests. The noise
// generator builds 8192-sample blocks aligned with the spectral analyzers'
// FFT frames so the band shape is bin-exact. Mirrors
// src/analysis/test_signals.rs; changes there must land here too.

use std::path::Path;

use audioproof::dsp::fft_in_place;
use audioproof::PcmAudio;

/// Out-of-band bins get this fraction of the in-band bin amplitude: a
/// -40 dB noise bed rather than digital silence, so percentile-based
/// floor estimates land on it instead of the dB sentinel.
const OUT_OF_BAND_AMPLITUDE: f32 = 0.01;

/// Deterministic noise source.
pub fn lcg(seed: u64) -> impl FnMut() -> f32 {
    let mut state = seed
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    move || {
        state = state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((state >> 33) as f32 / (1u64 << 31) as f32) - 1.0
    }
}

/// Noise with full-level energy in [lo_hz, hi_hz] over a -40 dB bed
/// elsewhere. Each 8192-sample block is the inverse transform of a fresh
/// random-phase spectrum, peak-normalized to 0.5.
pub fn band_noise(len: usize, sample_rate: u32, lo_hz: f32, hi_hz: f32, seed: u64) -> Vec<f32> {
    const N: usize = 8192;
    let nyquist = sample_rate as f32 / 2.0;
    let lo_bin = (((lo_hz / nyquist) * (N / 2) as f32) as usize).max(1);
    let hi_bin = (((hi_hz / nyquist) * (N / 2) as f32) as usize).min(N / 2);

    let mut next = lcg(seed);
    let mut out = Vec::with_capacity(len);
    let mut re = vec![0.0f32; N];
    let mut im = vec![0.0f32; N];
    while out.len() < len {
        for bin in 1..N / 2 {
            let phase = next() * std::f32::consts::PI;
            let amplitude = if bin >= lo_bin && bin < hi_bin {
                1.0
            } else {
                OUT_OF_BAND_AMPLITUDE
            };
            // Hermitian-symmetric spectrum: real time-domain signal.
            re[bin] = amplitude * phase.cos();
            im[bin] = amplitude * phase.sin();
            re[N - bin] = re[bin];
            im[N - bin] = -im[bin];
        }
        re[0] = 0.0;
        im[0] = 0.0;
        re[N / 2] = 0.0;
        im[N / 2] = 0.0;

        // Inverse transform: conjugate, forward FFT, take the real part.
        for v in im.iter_mut() {
            *v = -*v;
        }
        fft_in_place(&mut re, &mut im);
        let peak = re.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
        let scale = if peak > 0.0 { 0.5 / peak } else { 0.0 };
        let take = N.min(len - out.len());
        out.extend(re.iter().take(take).map(|&v| v * scale));
    }
    out
}

/// A plain sine at `freq_hz`.
pub fn sine(len: usize, sample_rate: u32, freq_hz: f32, amplitude: f32) -> Vec<f32> {
    (0..len)
        .map(|i| {
            amplitude
                * (2.0 * std::f32::consts::PI * freq_hz * i as f32 / sample_rate as f32).sin()
        })
        .collect()
}

/// Snap samples to a `bits`-deep integer grid, as a fixed-point source would.
pub fn quantize(samples: &[f32], bits: u8) -> Vec<f32> {
    let scale = (1u64 << (bits - 1)) as f32;
    samples
        .iter()
        .map(|&s| ((s * scale).round() / scale).clamp(-1.0, 1.0))
        .collect()
}

/// Mono [`PcmAudio`] with the given container bit depth.
pub fn mono_audio(samples: Vec<f32>, sample_rate: u32, bit_depth: u8) -> PcmAudio {
    PcmAudio::new(vec![samples], sample_rate, Some(bit_depth), Some(sample_rate)).unwrap()
}

/// Write a 16-bit PCM WAV for loader round-trips.
pub fn write_wav_16bit(path: &Path, channels: &[Vec<f32>], sample_rate: u32) {
    let spec = hound::WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).unwrap();
    let frames = channels[0].len();
    for i in 0..frames {
        for ch in channels {
            let v = (ch[i].clamp(-1.0, 1.0) * 32767.0).round() as i16;
            writer.write_sample(v).unwrap();
        }
    }
    writer.finalize().unwrap();
}
