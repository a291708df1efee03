// src/analysis/verdict.rs
//
// Composite authenticity verdict over the bit-depth, bandwidth, lossy, and
// dynamic-range results. Weighted deductions from a perfect score, a letter
// grade, and the final "is this genuinely hi-res" call.

use serde::Serialize;

use super::bandwidth::BandwidthResult;
use super::bit_depth::BitDepthResult;
use super::dynamics::DynamicsResult;
use super::lossy::LossyResult;

/// Composite verdict
#[derive(Debug, Clone, Serialize)]
pub struct VerdictResult {
    /// 0-100 composite quality/authenticity score.
    pub score: u8,
    /// A >= 90, B >= 75, C >= 60, D >= 40, else F.
    pub grade: char,
    pub is_genuine_hires: bool,
    /// Human-readable positives and deductions, in evaluation order.
    pub findings: Vec<String>,
}

/// Aggregate the four constituent analyses into a verdict.
pub fn aggregate_verdict(
    bit_depth: &BitDepthResult,
    bandwidth: &BandwidthResult,
    lossy: &LossyResult,
    dynamics: &DynamicsResult,
) -> VerdictResult {
    let mut score: i32 = 100;
    let mut findings = Vec::new();

    if bit_depth.effective_bit_depth < 16 {
        score -= 30;
        findings.push(format!(
            "Effective resolution is only {} bits",
            bit_depth.effective_bit_depth
        ));
    } else if bit_depth.effective_bit_depth < bit_depth.reported_bit_depth {
        score -= 20;
        findings.push(format!(
            "Container claims {} bits but only {} carry signal",
            bit_depth.reported_bit_depth, bit_depth.effective_bit_depth
        ));
    }

    if bandwidth.is_upsampled {
        score -= 25;
        findings.push(format!(
            "Bandwidth suggests upsampling: {} (ceiling {:.0} Hz)",
            bandwidth.classification, bandwidth.frequency_ceiling_hz
        ));
    } else if bandwidth.used_bandwidth > 0.85 {
        findings.push(format!(
            "Spectrum extends to {:.0}% of Nyquist",
            bandwidth.used_bandwidth * 100.0
        ));
    } else {
        score -= 10;
        findings.push(format!(
            "Only {:.0}% of the available bandwidth is used",
            bandwidth.used_bandwidth * 100.0
        ));
    }

    if lossy.is_lossy {
        score -= 25;
        match &lossy.encoder_fingerprint {
            Some(fp) => findings.push(format!("Lossy generation detected: {}", fp)),
            None => findings.push(format!(
                "Lossy generation detected: {} spectral holes",
                lossy.spectral_holes
            )),
        }
    }

    if dynamics.dr_score >= 10 {
        findings.push(format!("Healthy dynamic range (DR{})", dynamics.dr_score));
    } else if dynamics.dr_score >= 6 {
        score -= 5;
        findings.push(format!("Compressed dynamics (DR{})", dynamics.dr_score));
    } else {
        score -= 10;
        findings.push(format!("Heavily compressed dynamics (DR{})", dynamics.dr_score));
    }

    if dynamics.clipped_samples > 0 {
        score -= 5;
        findings.push(format!("{} clipped samples", dynamics.clipped_samples));
    } else {
        findings.push("No clipping".to_string());
    }

    let score = score.clamp(0, 100) as u8;
    let grade = match score {
        90..=100 => 'A',
        75..=89 => 'B',
        60..=74 => 'C',
        40..=59 => 'D',
        _ => 'F',
    };
    let is_genuine_hires = score >= 75 && !lossy.is_lossy && !bandwidth.is_upsampled;

    VerdictResult {
        score,
        grade,
        is_genuine_hires,
        findings,
    }
}
