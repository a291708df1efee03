//! AudioProof - Forensic numeric analysis of PCM audio
//!
//! Answers the question "is this file what it claims to be?" with pure,
//! deterministic DSP: no decoding heuristics, no metadata trust, just the
//! samples.
//!
//! ## Analyses
//!
//! - **Bit depth**: effective resolution vs the container's claim (fake
//!   24-bit detection)
//! - **Bandwidth**: frequency ceiling, brick-wall sharpness, upsampling
//!   classification
//! - **Lossy trace**: spectral holes and encoder lowpass fingerprints left
//!   by a previous MP3/AAC/Vorbis generation
//! - **Loudness**: integrated/momentary/short-term LUFS and LRA per
//!   ITU-R BS.1770-4
//! - **Dynamics**: TT-style DR score, crest factor, clipped-sample census
//! - **Stereo field**: correlation, mid/side balance, mono compatibility
//! - **Visualization prep**: waveform buckets, 1/3-octave spectrum,
//!   bounded STFT grid
//! - **Verdict**: a 0-100 score and letter grade aggregated from the
//!   forensic results
//!
//! ## Module Structure
//!
//! - `audio` - validated PCM snapshot and WAV loading
//! - `dsp` - FFT, window functions, spectral averaging
//! - `analysis` - the analysis algorithms and result types
//! - `dispatch` - stateless request/response envelope with timing
//! - `render` - spectrogram PNG heat maps
//! - `cli` - command-line interface
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use audioproof::audio::load_wav;
//! use audioproof::dispatch::{handle_request, AnalysisKind, AnalysisRequest};
//!
//! let audio = load_wav(path)?;
//! let response = handle_request(&audio, &AnalysisRequest {
//!     id: 1,
//!     kind: AnalysisKind::Verdict,
//! });
//! ```

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod dispatch;
pub mod dsp;
pub mod render;

// Re-export the common surface at the crate root
pub use analysis::{AnalysisPayload, AnalysisResult, Timing, VerdictResult};
pub use audio::{load_wav, AudioError, PcmAudio};
pub use dispatch::{analyze_all, handle_request, AnalysisKind, AnalysisRequest, AnalysisResponse};
