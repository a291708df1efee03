// src/analysis/test_signals.rs
//
// Deterministic synthetic signals shared by the analyzer unit tests.
// Mirrored by tests/test_utils/mod.rs for the integration suite; changes
// here must land there too.

use crate::dsp::fft::fft;

/// Out-of-band bins get this fraction of the in-band bin amplitude: a
/// -40 dB noise bed rather than digital silence, so percentile-based
/// floor estimates land on it instead of the dB sentinel.
const OUT_OF_BAND_AMPLITUDE: f32 = 0.01;

/// Linear congruential generator, good enough for test noise.
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

/// Full-band white noise in roughly [-0.5, 0.5].
pub fn white_noise(len: usize, seed: u64) -> Vec<f32> {
    let mut next = lcg(seed);
    (0..len).map(|_| next() * 0.5).collect()
}

/// Noise with full-level energy in [lo_hz, hi_hz] over a -40 dB bed
/// elsewhere. Each 8192-sample block is the inverse transform of a fresh
/// random-phase spectrum: block boundaries line up with the analyzers' FFT
/// frames, so the band edges stay bin-exact while frame averaging still sees
/// independent per-bin phases.
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
        fft(&mut re, &mut im);
        let peak = re.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
        let scale = if peak > 0.0 { 0.5 / peak } else { 0.0 };
        let take = N.min(len - out.len());
        out.extend(re.iter().take(take).map(|&v| v * scale));
    }
    out
}

/// Lowpass noise: full level below `cutoff_hz`, the bed above it.
pub fn band_limited_noise(len: usize, sample_rate: u32, cutoff_hz: f32, seed: u64) -> Vec<f32> {
    band_noise(len, sample_rate, 0.0, cutoff_hz, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::{SpectralAverager, WindowType};

    #[test]
    fn test_band_limited_noise_bed_sits_40_db_down() {
        let signal = band_limited_noise(8192 * 64, 44100, 10000.0, 3);
        let averager = SpectralAverager::new(8192, 200, WindowType::Hann);
        let averaged = averager.averaged_magnitude_db(&signal);
        assert_eq!(averaged.frames, 64);

        let cutoff_bin = (10000.0 / 22050.0 * 4096.0) as usize;
        let in_band_max = averaged.bins[1..cutoff_bin]
            .iter()
            .fold(f32::MIN, |acc, &v| acc.max(v));
        let above = averaged.bins[cutoff_bin + 10..]
            .iter()
            .fold(f32::MIN, |acc, &v| acc.max(v));
        assert!(in_band_max > -80.0, "in-band level: {} dB", in_band_max);
        // The out-of-band bed tracks the in-band level at -40 dB; it never
        // collapses to the dB-floor sentinel.
        assert!(
            (in_band_max - above - 40.0).abs() < 4.0,
            "in-band {} dB vs bed {} dB",
            in_band_max,
            above
        );
    }
}
