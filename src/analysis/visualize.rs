// src/analysis/visualize.rs
//
// Visualization data preparation: waveform envelope buckets, an averaged
// spectrum curve with ISO 1/3-octave bands, and a column-capped spectrogram.
// Rendering the arrays into pixels is the consumer's job.

use log::warn;
use serde::Serialize;

use crate::audio::PcmAudio;
use crate::dsp::{create_window, fft::fft, magnitude_spectrum_db, SpectralAverager, WindowType, DB_FLOOR};

/// Default number of waveform buckets.
pub const DEFAULT_WAVEFORM_WIDTH: usize = 2000;

/// Hard cap on spectrogram time columns. Longer inputs get a larger hop, not
/// more columns; this bounds output size for arbitrarily long files.
pub const MAX_SPECTROGRAM_COLUMNS: usize = 1200;

const SPECTRUM_FFT_SIZE: usize = 8192;
const SPECTRUM_MAX_FRAMES: usize = 200;

/// ISO 1/3-octave band centers, 20 Hz - 20 kHz.
const OCTAVE_CENTERS_HZ: [f32; 31] = [
    20.0, 25.0, 31.5, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0, 160.0, 200.0, 250.0, 315.0, 400.0,
    500.0, 630.0, 800.0, 1000.0, 1250.0, 1600.0, 2000.0, 2500.0, 3150.0, 4000.0, 5000.0, 6300.0,
    8000.0, 10000.0, 12500.0, 16000.0, 20000.0,
];

/// Bucketed waveform envelope
#[derive(Debug, Clone, Serialize)]
pub struct WaveformResult {
    /// Samples per bucket.
    pub bucket_size: usize,
    /// Per-bucket peak |sample| of the mono mixdown.
    pub peaks: Vec<f32>,
    /// Per-bucket RMS.
    pub rms: Vec<f32>,
}

/// Bucket the mono mixdown into peak/RMS pairs for envelope drawing.
pub fn prepare_waveform(audio: &PcmAudio, target_width: usize) -> WaveformResult {
    let mono = audio.mix_to_mono();
    let len = mono.len();
    let target_width = target_width.max(1);
    let bucket_size = (len / target_width).max(1);
    let num_buckets = target_width.min(len);

    let mut peaks = Vec::with_capacity(num_buckets);
    let mut rms = Vec::with_capacity(num_buckets);
    for b in 0..num_buckets {
        let start = b * bucket_size;
        let end = (start + bucket_size).min(len);
        let mut peak = 0.0f32;
        let mut sq = 0.0f64;
        for &s in &mono[start..end] {
            peak = peak.max(s.abs());
            sq += s as f64 * s as f64;
        }
        peaks.push(peak);
        rms.push((sq / (end - start) as f64).sqrt() as f32);
    }

    WaveformResult {
        bucket_size,
        peaks,
        rms,
    }
}

/// One 1/3-octave band level
#[derive(Debug, Clone, Serialize)]
pub struct OctaveBand {
    pub center_hz: f32,
    pub level_db: f32,
}

/// Averaged spectrum curve plus octave-band summary
#[derive(Debug, Clone, Serialize)]
pub struct SpectrumResult {
    /// Averaged magnitude spectrum, dB, one value per FFT bin.
    pub curve_db: Vec<f32>,
    /// Frequency step between adjacent curve bins, Hz.
    pub bin_width_hz: f32,
    /// 31 ISO 1/3-octave bands, 20 Hz - 20 kHz.
    pub octave_bands: Vec<OctaveBand>,
    /// Frames that contributed to the average.
    pub frames: usize,
}

/// Build the averaged spectrum curve and its octave-band reduction.
pub fn prepare_spectrum(audio: &PcmAudio) -> SpectrumResult {
    let nyquist = audio.sample_rate() as f32 / 2.0;
    let mono = audio.mix_to_mono();

    let averager = SpectralAverager::new(SPECTRUM_FFT_SIZE, SPECTRUM_MAX_FRAMES, WindowType::Hann);
    let averaged = averager.averaged_magnitude_db(&mono);
    let half = averaged.bins.len();
    let bin_width_hz = if half > 0 { nyquist / half as f32 } else { 0.0 };

    let octave_bands = OCTAVE_CENTERS_HZ
        .iter()
        .map(|&center| OctaveBand {
            center_hz: center,
            level_db: octave_band_level(&averaged.bins, bin_width_hz, center),
        })
        .collect();

    SpectrumResult {
        curve_db: averaged.bins,
        bin_width_hz,
        octave_bands,
        frames: averaged.frames,
    }
}

/// Average the dB curve over one third-octave band in the LINEAR domain.
/// Averaging the dB values directly would weight quiet bins far too heavily.
fn octave_band_level(curve_db: &[f32], bin_width_hz: f32, center_hz: f32) -> f32 {
    if curve_db.is_empty() || bin_width_hz <= 0.0 {
        return DB_FLOOR;
    }
    let edge = 2f32.powf(1.0 / 6.0);
    let lo = center_hz / edge;
    let hi = center_hz * edge;

    let mut sum = 0.0f64;
    let mut count = 0usize;
    for (i, &db) in curve_db.iter().enumerate() {
        let freq = i as f32 * bin_width_hz;
        if freq >= lo && freq <= hi {
            sum += 10f64.powf(db as f64 / 20.0);
            count += 1;
        }
    }
    if count == 0 {
        return DB_FLOOR;
    }
    let mean = sum / count as f64;
    if mean > 0.0 {
        (20.0 * mean.log10()) as f32
    } else {
        DB_FLOOR
    }
}

/// Spectrogram STFT parameters
#[derive(Debug, Clone)]
pub struct SpectrogramConfig {
    pub fft_size: usize,
    pub hop_size: usize,
    pub window: WindowType,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            fft_size: 4096,
            hop_size: 1024,
            window: WindowType::Hann,
        }
    }
}

/// Column-capped STFT magnitude grid
#[derive(Debug, Clone, Serialize)]
pub struct SpectrogramResult {
    /// Time columns, each fft_size/2 dB magnitude bins, low frequency first.
    pub columns: Vec<Vec<f32>>,
    pub fft_size: usize,
    /// Hop actually used; larger than requested when the column cap engaged.
    pub effective_hop: usize,
    /// Frequency step between adjacent bins, Hz.
    pub bin_width_hz: f32,
    /// Seconds between adjacent columns.
    pub secs_per_column: f32,
}

/// Compute the STFT grid, never exceeding [`MAX_SPECTROGRAM_COLUMNS`].
pub fn prepare_spectrogram(audio: &PcmAudio, config: &SpectrogramConfig) -> SpectrogramResult {
    let sample_rate = audio.sample_rate();
    let mono = audio.mix_to_mono();
    let fft_size = config.fft_size;
    let bin_width_hz = sample_rate as f32 / fft_size as f32;

    if mono.len() < fft_size {
        return SpectrogramResult {
            columns: vec![],
            fft_size,
            effective_hop: config.hop_size,
            bin_width_hz,
            secs_per_column: config.hop_size as f32 / sample_rate as f32,
        };
    }

    let span = mono.len() - fft_size;
    let raw_frames = span / config.hop_size + 1;
    let effective_hop = if raw_frames > MAX_SPECTROGRAM_COLUMNS {
        let enlarged = span.div_ceil(MAX_SPECTROGRAM_COLUMNS - 1);
        warn!(
            "spectrogram: {} frames at hop {} exceeds the {}-column cap, enlarging hop to {}",
            raw_frames, config.hop_size, MAX_SPECTROGRAM_COLUMNS, enlarged
        );
        enlarged
    } else {
        config.hop_size
    };

    let window = create_window(fft_size, config.window);
    let num_frames = span / effective_hop + 1;
    let mut columns = Vec::with_capacity(num_frames);
    let mut re = vec![0.0f32; fft_size];
    let mut im = vec![0.0f32; fft_size];
    for f in 0..num_frames {
        let start = f * effective_hop;
        for i in 0..fft_size {
            re[i] = mono[start + i] * window[i];
            im[i] = 0.0;
        }
        fft(&mut re, &mut im);
        columns.push(magnitude_spectrum_db(&re, &im));
    }

    SpectrogramResult {
        columns,
        fft_size,
        effective_hop,
        bin_width_hz,
        secs_per_column: effective_hop as f32 / sample_rate as f32,
    }
}
