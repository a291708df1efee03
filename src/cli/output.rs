//! Terminal report formatting

use colorful::Colorful;

use super::FileReport;
use crate::analysis::AnalysisPayload;

/// Print a per-file report to stdout.
pub fn print_report(report: &FileReport, verbose: bool) {
    println!("Analyzing: {}", report.file.clone().cyan());

    if report.results.is_empty() {
        if let Some(err) = &report.error {
            println!("  {} {}", "✗".red(), err.clone().red());
        }
        println!();
        return;
    }

    println!(
        "  {} Hz, {} channel(s), {:.2}s",
        report.sample_rate, report.channels, report.duration_secs
    );

    for result in &report.results {
        match &result.payload {
            AnalysisPayload::BitDepth(r) => {
                println!(
                    "  Bit Depth: {} bit effective (container: {} bit, confidence {:.0}%)",
                    r.effective_bit_depth, r.reported_bit_depth, r.confidence
                );
                if verbose {
                    println!("    Noise Floor: {:.1} dBFS", r.noise_floor_db);
                }
            }
            AnalysisPayload::Bandwidth(r) => {
                println!(
                    "  Bandwidth: {:.0} Hz ceiling ({:.0}% of spectrum) — {}",
                    r.frequency_ceiling_hz,
                    r.used_bandwidth * 100.0,
                    r.classification
                );
                if verbose {
                    println!(
                        "    Cutoff Sharpness: {:.1} dB, Noise Floor: {:.1} dB, confidence {:.0}%",
                        r.cutoff_sharpness_db, r.noise_floor_db, r.confidence
                    );
                }
            }
            AnalysisPayload::Lossy(r) => {
                if r.is_lossy {
                    let fp = r.encoder_fingerprint.as_deref().unwrap_or("unknown encoder");
                    println!(
                        "  Lossy: {} ({}, {} spectral holes, confidence {:.0}%)",
                        "DETECTED".to_string().red(),
                        fp,
                        r.spectral_holes,
                        r.confidence
                    );
                } else {
                    println!("  Lossy: {}", "no trace".to_string().green());
                }
            }
            AnalysisPayload::Loudness(r) => {
                println!(
                    "  Loudness: {} LUFS integrated, LRA {:.1} LU, peak {:.1} dBFS",
                    fmt_lufs(r.integrated_lufs),
                    r.loudness_range_lu,
                    r.true_peak_dbfs
                );
                if verbose {
                    println!(
                        "    {} momentary blocks, {} short-term windows",
                        r.momentary_lufs.len(),
                        r.short_term_lufs.len()
                    );
                }
            }
            AnalysisPayload::DynamicRange(r) => {
                println!(
                    "  Dynamics: DR{}, crest {:.1} dB, {} clipped sample(s)",
                    r.dr_score, r.crest_factor_db, r.clipped_samples
                );
                if verbose {
                    println!("    Peak: {:.1} dBFS, RMS: {:.1} dBFS", r.peak_dbfs, r.rms_dbfs);
                }
            }
            AnalysisPayload::Stereo(r) => {
                println!(
                    "  Stereo: correlation {:.2}, width {:.2}, mono loss {:.1}%",
                    r.correlation, r.stereo_width, r.mono_compatibility_loss
                );
                if verbose {
                    println!(
                        "    Mid Energy: {:.2}, Side Energy: {:.2}",
                        r.mid_energy, r.side_energy
                    );
                }
            }
            AnalysisPayload::Verdict(r) => {
                let headline = format!(
                    "Verdict: {} (score {}/100){}",
                    r.grade,
                    r.score,
                    if r.is_genuine_hires {
                        " — genuine high-resolution"
                    } else {
                        ""
                    }
                );
                let colored = match r.grade {
                    'A' | 'B' => headline.green(),
                    'C' => headline.yellow(),
                    _ => headline.red(),
                };
                println!("  {}", colored);
                for finding in &r.findings {
                    println!("    • {}", finding);
                }
            }
            // Visualization payloads carry grids, not report lines.
            AnalysisPayload::Waveform(_)
            | AnalysisPayload::Spectrum(_)
            | AnalysisPayload::Spectrogram(_) => {
                if verbose {
                    if let AnalysisPayload::Spectrogram(g) = &result.payload {
                        println!(
                            "  Spectrogram: {} columns, {:.1} Hz/bin",
                            g.columns.len(),
                            g.bin_width_hz
                        );
                    }
                }
            }
        }
    }

    if let Some(err) = &report.error {
        println!("  {} {}", "✗".red(), err.clone().yellow());
    }
    println!();
}

/// Print a summary across multiple files.
pub fn print_summary(reports: &[FileReport]) {
    let genuine = reports
        .iter()
        .filter(|r| {
            r.results.iter().any(|res| {
                matches!(&res.payload, AnalysisPayload::Verdict(v) if v.is_genuine_hires)
            })
        })
        .count();
    let failed = reports.iter().filter(|r| r.results.is_empty()).count();

    println!("Summary:");
    println!("  {} file(s) analyzed", reports.len());
    if genuine > 0 {
        println!("  {}", format!("✓ {} genuine high-resolution", genuine).green());
    }
    if failed > 0 {
        println!("  {}", format!("✗ {} failed to load", failed).red());
    }
}

fn fmt_lufs(value: f64) -> String {
    if value.is_finite() {
        format!("{:.1}", value)
    } else {
        "-inf".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fmt_lufs() {
        assert_eq!(fmt_lufs(-14.03), "-14.0");
        assert_eq!(fmt_lufs(f64::NEG_INFINITY), "-inf");
    }
}
