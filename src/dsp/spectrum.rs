//! Shared bounded-stride spectral averaging
//!
//! Frames a mono signal at hop = FFT size (non-overlapping), windows and
//! transforms each visited frame, and averages power or dB magnitude across
//! a capped, strided subset of frames. The cap-and-stride is a deliberate
//! resource contract for long files, applied unconditionally.

use log::debug;

use super::fft::{fft, magnitude_spectrum_db, power_spectrum};
use super::windows::{create_window, WindowType};

/// Averaged half-spectrum plus the number of frames that contributed.
#[derive(Debug, Clone)]
pub struct AveragedSpectrum {
    pub bins: Vec<f32>,
    pub frames: usize,
}

/// Reusable averaging pipeline with a cached window.
pub struct SpectralAverager {
    fft_size: usize,
    max_frames: usize,
    window: Vec<f32>,
}

enum Domain {
    LinearPower,
    MagnitudeDb,
}

impl SpectralAverager {
    pub fn new(fft_size: usize, max_frames: usize, window_type: WindowType) -> Self {
        assert!(fft_size.is_power_of_two(), "FFT size must be a power of two");
        assert!(max_frames > 0);
        Self {
            fft_size,
            max_frames,
            window: create_window(fft_size, window_type),
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Average linear power spectra across the visited frames.
    pub fn averaged_power(&self, mono: &[f32]) -> AveragedSpectrum {
        self.average(mono, Domain::LinearPower)
    }

    /// Average dB magnitude spectra across the visited frames.
    pub fn averaged_magnitude_db(&self, mono: &[f32]) -> AveragedSpectrum {
        self.average(mono, Domain::MagnitudeDb)
    }

    fn average(&self, mono: &[f32], domain: Domain) -> AveragedSpectrum {
        let half = self.fft_size / 2;
        let num_frames = mono.len() / self.fft_size;
        if num_frames == 0 {
            return AveragedSpectrum {
                bins: vec![],
                frames: 0,
            };
        }

        let frame_step = (num_frames / self.max_frames).max(1);
        debug!(
            "spectral averaging: {} frames available, visiting every {} (cap {})",
            num_frames, frame_step, self.max_frames
        );

        let mut acc = vec![0.0f32; half];
        let mut frames = 0usize;
        let mut re = vec![0.0f32; self.fft_size];
        let mut im = vec![0.0f32; self.fft_size];

        for frame_idx in (0..num_frames).step_by(frame_step) {
            let start = frame_idx * self.fft_size;
            let frame = &mono[start..start + self.fft_size];
            for i in 0..self.fft_size {
                re[i] = frame[i] * self.window[i];
                im[i] = 0.0;
            }
            fft(&mut re, &mut im);

            let bins = match domain {
                Domain::LinearPower => power_spectrum(&re, &im),
                Domain::MagnitudeDb => magnitude_spectrum_db(&re, &im),
            };
            for (a, b) in acc.iter_mut().zip(bins.iter()) {
                *a += b;
            }
            frames += 1;
        }

        let inv = 1.0 / frames as f32;
        for a in &mut acc {
            *a *= inv;
        }

        AveragedSpectrum { bins: acc, frames }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_short_signal_yields_zero_frames() {
        let averager = SpectralAverager::new(1024, 200, WindowType::Hann);
        let result = averager.averaged_power(&vec![0.1f32; 500]);
        assert_eq!(result.frames, 0);
        assert!(result.bins.is_empty());
    }

    #[test]
    fn test_frame_cap_strides_instead_of_truncating() {
        // 1000 frames against a cap of 200 -> stride 5 -> exactly 200 visited.
        let averager = SpectralAverager::new(256, 200, WindowType::Hann);
        let mono = vec![0.0f32; 256 * 1000];
        let result = averager.averaged_power(&mono);
        assert_eq!(result.frames, 200);
    }

    #[test]
    fn test_uncapped_signal_visits_every_frame() {
        let averager = SpectralAverager::new(256, 200, WindowType::Hann);
        let mono = vec![0.0f32; 256 * 7 + 100];
        let result = averager.averaged_power(&mono);
        assert_eq!(result.frames, 7);
        assert_eq!(result.bins.len(), 128);
    }

    #[test]
    fn test_averaged_power_of_sine_concentrates() {
        let n = 1024;
        let bin = 64;
        let mono: Vec<f32> = (0..n * 8)
            .map(|i| (2.0 * std::f32::consts::PI * bin as f32 * i as f32 / n as f32).sin())
            .collect();
        let averager = SpectralAverager::new(n, 200, WindowType::Hann);
        let result = averager.averaged_power(&mono);
        assert_eq!(result.frames, 8);
        let peak = result
            .bins
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap()
            .0;
        assert!((peak as i64 - bin as i64).abs() <= 1);
    }
}
