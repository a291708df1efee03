//! Audio analysis algorithms
//!
//! One pure, synchronous function per analysis kind:
//! - Bit depth (fake 24-bit detection)
//! - Bandwidth (frequency ceiling, upsampling classification)
//! - Lossy-transcode detection (spectral holes, encoder cutoffs)
//! - Loudness per ITU-R BS.1770-4
//! - Dynamic range (DR score, crest factor, clipping)
//! - Stereo field (correlation, mid/side, mono compatibility)
//! - Visualization prep (waveform, spectrum, spectrogram)
//! - Verdict aggregation over the forensic results

use serde::Serialize;

mod bandwidth;
mod bit_depth;
mod dynamics;
mod lossy;
mod loudness;
mod stereo;
mod verdict;
mod visualize;

#[cfg(test)]
pub(crate) mod test_signals;

pub use bandwidth::{analyze_bandwidth, BandwidthResult};
pub use bit_depth::{analyze_bit_depth, BitDepthResult};
pub use dynamics::{analyze_dynamics, DynamicsResult};
pub use lossy::{analyze_lossy, LossyResult};
pub use loudness::{analyze_loudness, LoudnessResult};
pub use stereo::{analyze_stereo, StereoResult};
pub use verdict::{aggregate_verdict, VerdictResult};
pub use visualize::{
    prepare_spectrogram, prepare_spectrum, prepare_waveform, OctaveBand, SpectrogramConfig,
    SpectrogramResult, SpectrumResult, WaveformResult, DEFAULT_WAVEFORM_WIDTH,
    MAX_SPECTROGRAM_COLUMNS,
};

/// Kind-tagged analysis payload, one variant per analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalysisPayload {
    BitDepth(BitDepthResult),
    Bandwidth(BandwidthResult),
    Lossy(LossyResult),
    Loudness(LoudnessResult),
    DynamicRange(DynamicsResult),
    Stereo(StereoResult),
    Waveform(WaveformResult),
    Spectrum(SpectrumResult),
    Spectrogram(SpectrogramResult),
    Verdict(VerdictResult),
}

/// When a result was produced and how long it took.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Timing {
    /// Unix epoch milliseconds at completion.
    pub computed_at_millis: i64,
    pub compute_duration_millis: f64,
}

/// A finished analysis: payload plus timing metadata.
///
/// Results are plain values with no reference back to the input buffers;
/// produced once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    #[serde(flatten)]
    pub payload: AnalysisPayload,
    #[serde(flatten)]
    pub timing: Timing,
}
