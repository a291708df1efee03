//! Command-line interface
//!
//! Walks the input for WAV files, runs the full analysis set on each in
//! parallel, and prints either a colored terminal report or JSON.

mod output;

use anyhow::{Context, Result};
use clap::Parser;
use colorful::Colorful;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressStyle};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::analysis::{AnalysisPayload, AnalysisResult};
use crate::audio::load_wav;
use crate::dispatch::analyze_all;
use crate::render::{render_spectrogram, RenderConfig};

pub use output::{print_report, print_summary};

#[derive(Parser, Debug)]
#[command(name = "audioproof")]
#[command(about = "Forensic audio analysis: fake hi-res, lossy transcodes, loudness, dynamics")]
#[command(version)]
pub struct Args {
    /// Input WAV file or directory (searched recursively)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Render spectrogram PNGs
    #[arg(short, long)]
    pub spectrogram: bool,

    /// Output directory for spectrograms
    #[arg(short, long, default_value = "spectrograms")]
    pub output: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Everything produced for one input file.
#[derive(Debug, Serialize)]
pub struct FileReport {
    pub file: String,
    pub sample_rate: u32,
    pub channels: usize,
    pub duration_secs: f64,
    pub results: Vec<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// CLI entry point.
pub fn run() -> Result<()> {
    let args = Args::parse();

    if args.spectrogram {
        std::fs::create_dir_all(&args.output)
            .with_context(|| format!("failed to create {}", args.output.display()))?;
    }

    let files = collect_wav_files(&args.input)?;
    if files.is_empty() {
        println!("{}", "No WAV files found!".red());
        return Ok(());
    }

    if !args.json {
        println!("Found {} file(s)\n", files.len());
    }

    let style = ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    let bar = if args.json || files.len() < 2 {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(files.len() as u64).with_style(style)
    };

    let reports: Vec<FileReport> = files
        .par_iter()
        .progress_with(bar)
        .map(|path| analyze_file(path, &args))
        .collect();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print_report(report, args.verbose);
        }
        if reports.len() > 1 {
            print_summary(&reports);
        }
    }

    Ok(())
}

fn collect_wav_files(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    if path.is_file() {
        if is_wav(path) {
            files.push(path.to_path_buf());
        }
    } else if path.is_dir() {
        for entry in WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if entry.path().is_file() && is_wav(entry.path()) {
                files.push(entry.path().to_path_buf());
            }
        }
        files.sort();
    } else {
        anyhow::bail!("input does not exist: {}", path.display());
    }

    Ok(files)
}

fn is_wav(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("wav"))
}

fn analyze_file(path: &Path, args: &Args) -> FileReport {
    let file = path.display().to_string();

    let audio = match load_wav(path) {
        Ok(audio) => audio,
        Err(err) => {
            return FileReport {
                file,
                sample_rate: 0,
                channels: 0,
                duration_secs: 0.0,
                results: Vec::new(),
                error: Some(format!("{:#}", err)),
            }
        }
    };

    let results = analyze_all(&audio);

    let mut error = None;
    if args.spectrogram {
        let grid = results.iter().find_map(|r| match &r.payload {
            AnalysisPayload::Spectrogram(grid) => Some(grid),
            _ => None,
        });
        if let Some(grid) = grid {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("spectrogram");
            let png = args.output.join(format!("{}.png", stem));
            if let Err(err) = render_spectrogram(grid, &RenderConfig::default(), &png) {
                error = Some(format!("{:#}", err));
            }
        }
    }

    FileReport {
        file,
        sample_rate: audio.sample_rate(),
        channels: audio.channel_count(),
        duration_secs: audio.duration_secs(),
        results,
        error,
    }
}
