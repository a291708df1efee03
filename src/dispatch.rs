//! Analysis dispatch boundary
//!
//! One stateless analysis call per request. The embedding (thread pool,
//! async task, plain function call) owns transport and scheduling; this
//! module owns the envelope: map a kind to the matching core function, stamp
//! timing metadata, and catch contract errors into the response instead of
//! letting them unwind.

use chrono::Utc;
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analysis::{
    aggregate_verdict, analyze_bandwidth, analyze_bit_depth, analyze_dynamics, analyze_lossy,
    analyze_loudness, analyze_stereo, prepare_spectrogram, prepare_spectrum, prepare_waveform,
    AnalysisPayload, AnalysisResult, SpectrogramConfig, Timing, DEFAULT_WAVEFORM_WIDTH,
};
use crate::audio::PcmAudio;

/// The analyses a request can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisKind {
    BitDepth,
    Bandwidth,
    Lossy,
    Loudness,
    DynamicRange,
    Stereo,
    Waveform,
    Spectrum,
    Spectrogram,
    Verdict,
}

impl AnalysisKind {
    /// Every kind, in report order.
    pub const ALL: [AnalysisKind; 10] = [
        AnalysisKind::BitDepth,
        AnalysisKind::Bandwidth,
        AnalysisKind::Lossy,
        AnalysisKind::Loudness,
        AnalysisKind::DynamicRange,
        AnalysisKind::Stereo,
        AnalysisKind::Waveform,
        AnalysisKind::Spectrum,
        AnalysisKind::Spectrogram,
        AnalysisKind::Verdict,
    ];
}

/// An analysis request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub id: u64,
    pub kind: AnalysisKind,
}

/// The response paired to a request by `id`.
///
/// Exactly one of `result` / `error` is set. `sub_results` is populated only
/// for the composite verdict, carrying the four constituent analyses.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResponse {
    pub id: u64,
    pub kind: AnalysisKind,
    pub result: Option<AnalysisResult>,
    pub sub_results: Vec<AnalysisResult>,
    pub error: Option<String>,
}

fn stamp(started: Instant, payload: AnalysisPayload) -> AnalysisResult {
    AnalysisResult {
        payload,
        timing: Timing {
            computed_at_millis: Utc::now().timestamp_millis(),
            compute_duration_millis: started.elapsed().as_secs_f64() * 1000.0,
        },
    }
}

/// Run a single analysis and wrap it with timing metadata.
///
/// The only fallible kind is loudness (unsupported channel layouts); the
/// verdict propagates nothing because its constituents are infallible.
pub fn run_analysis(audio: &PcmAudio, kind: AnalysisKind) -> Result<AnalysisResult, String> {
    let started = Instant::now();
    let payload = match kind {
        AnalysisKind::BitDepth => AnalysisPayload::BitDepth(analyze_bit_depth(audio)),
        AnalysisKind::Bandwidth => AnalysisPayload::Bandwidth(analyze_bandwidth(audio)),
        AnalysisKind::Lossy => AnalysisPayload::Lossy(analyze_lossy(audio)),
        AnalysisKind::Loudness => {
            AnalysisPayload::Loudness(analyze_loudness(audio).map_err(|e| e.to_string())?)
        }
        AnalysisKind::DynamicRange => AnalysisPayload::DynamicRange(analyze_dynamics(audio)),
        AnalysisKind::Stereo => AnalysisPayload::Stereo(analyze_stereo(audio)),
        AnalysisKind::Waveform => {
            AnalysisPayload::Waveform(prepare_waveform(audio, DEFAULT_WAVEFORM_WIDTH))
        }
        AnalysisKind::Spectrum => AnalysisPayload::Spectrum(prepare_spectrum(audio)),
        AnalysisKind::Spectrogram => {
            AnalysisPayload::Spectrogram(prepare_spectrogram(audio, &SpectrogramConfig::default()))
        }
        AnalysisKind::Verdict => {
            // Handled through handle_request so the constituents can be
            // returned as sub-results; a direct call still works.
            let (bit_depth, bandwidth, lossy, dynamics) = run_verdict_constituents(audio);
            AnalysisPayload::Verdict(aggregate_verdict(
                &bit_depth, &bandwidth, &lossy, &dynamics,
            ))
        }
    };
    Ok(stamp(started, payload))
}

fn run_verdict_constituents(
    audio: &PcmAudio,
) -> (
    crate::analysis::BitDepthResult,
    crate::analysis::BandwidthResult,
    crate::analysis::LossyResult,
    crate::analysis::DynamicsResult,
) {
    // The four constituents are independent; fan out across the pool.
    let ((bit_depth, bandwidth), (lossy, dynamics)) = rayon::join(
        || {
            rayon::join(
                || analyze_bit_depth(audio),
                || analyze_bandwidth(audio),
            )
        },
        || rayon::join(|| analyze_lossy(audio), || analyze_dynamics(audio)),
    );
    (bit_depth, bandwidth, lossy, dynamics)
}

/// Handle one request envelope, never panicking on contract errors.
pub fn handle_request(audio: &PcmAudio, request: &AnalysisRequest) -> AnalysisResponse {
    info!("dispatching {:?} analysis (request {})", request.kind, request.id);

    if request.kind == AnalysisKind::Verdict {
        let started = Instant::now();
        let (bit_depth, bandwidth, lossy, dynamics) = run_verdict_constituents(audio);
        let verdict = aggregate_verdict(&bit_depth, &bandwidth, &lossy, &dynamics);

        let now = Instant::now();
        let sub_results = vec![
            stamp(now, AnalysisPayload::BitDepth(bit_depth)),
            stamp(now, AnalysisPayload::Bandwidth(bandwidth)),
            stamp(now, AnalysisPayload::Lossy(lossy)),
            stamp(now, AnalysisPayload::DynamicRange(dynamics)),
        ];
        return AnalysisResponse {
            id: request.id,
            kind: request.kind,
            result: Some(stamp(started, AnalysisPayload::Verdict(verdict))),
            sub_results,
            error: None,
        };
    }

    match run_analysis(audio, request.kind) {
        Ok(result) => AnalysisResponse {
            id: request.id,
            kind: request.kind,
            result: Some(result),
            sub_results: vec![],
            error: None,
        },
        Err(message) => AnalysisResponse {
            id: request.id,
            kind: request.kind,
            result: None,
            sub_results: vec![],
            error: Some(message),
        },
    }
}

/// Run every analysis kind on one snapshot, in parallel.
///
/// Fallible kinds that reject the input (loudness on >5 channels) are
/// skipped; everything else is returned in report order.
pub fn analyze_all(audio: &PcmAudio) -> Vec<AnalysisResult> {
    use rayon::prelude::*;
    AnalysisKind::ALL
        .par_iter()
        .filter_map(|&kind| run_analysis(audio, kind).ok())
        .collect()
}
