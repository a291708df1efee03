//! Spectrogram image rendering
//!
//! Turns a computed STFT grid into a PNG heat map. Pure presentation: all
//! numeric work happens in the analysis layer.

use anyhow::{Context, Result};
use image::{ImageBuffer, Rgb};
use log::info;
use std::path::Path;

use crate::analysis::SpectrogramResult;

/// Image dimensions and the dB range mapped onto the color ramp.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub min_db: f32,
    pub max_db: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 400,
            min_db: -120.0,
            max_db: 0.0,
        }
    }
}

/// Render a spectrogram grid to a PNG at `output_path`.
///
/// Columns map to the x axis, bins to the y axis with low frequencies at
/// the bottom. Fails if the grid is empty or the file cannot be written.
pub fn render_spectrogram(
    grid: &SpectrogramResult,
    config: &RenderConfig,
    output_path: &Path,
) -> Result<()> {
    let num_columns = grid.columns.len();
    if num_columns == 0 {
        anyhow::bail!("audio too short for spectrogram rendering");
    }
    let freq_bins = grid.fft_size / 2;

    let mut img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(config.width, config.height);

    let x_scale = num_columns as f32 / config.width as f32;
    let y_scale = freq_bins as f32 / config.height as f32;

    for y in 0..config.height {
        // Flip Y for display (low frequencies at bottom)
        let bin_idx = (((config.height - 1 - y) as f32 * y_scale) as usize).min(freq_bins - 1);
        for x in 0..config.width {
            let column_idx = ((x as f32 * x_scale) as usize).min(num_columns - 1);
            let db = grid.columns[column_idx][bin_idx];
            let normalized = (db - config.min_db) / (config.max_db - config.min_db);
            img.put_pixel(x, y, db_to_color(normalized));
        }
    }

    img.save(output_path)
        .with_context(|| format!("failed to write spectrogram to {}", output_path.display()))?;
    info!(
        "wrote {}x{} spectrogram ({} columns, {:.1} ms/column) to {}",
        config.width,
        config.height,
        num_columns,
        grid.secs_per_column * 1000.0,
        output_path.display()
    );
    Ok(())
}

fn db_to_color(value: f32) -> Rgb<u8> {
    // Viridis-like colormap
    let v = value.clamp(0.0, 1.0);

    let r = (68.0 + v * (235.0 - 68.0)) as u8;
    let g = (1.0 + v * (237.0 - 1.0)) as u8;
    let b = (84.0 + v * (32.0 - 84.0 + (1.0 - v) * 150.0)) as u8;

    Rgb([r, g, b])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{prepare_spectrogram, SpectrogramConfig};
    use crate::audio::PcmAudio;

    #[test]
    fn test_empty_grid_is_rejected() {
        let grid = SpectrogramResult {
            columns: vec![],
            fft_size: 4096,
            effective_hop: 1024,
            bin_width_hz: 10.77,
            secs_per_column: 0.023,
        };
        let err = render_spectrogram(&grid, &RenderConfig::default(), Path::new("/tmp/x.png"));
        assert!(err.is_err());
    }

    #[test]
    fn test_renders_png_for_short_tone() {
        let samples: Vec<f32> = (0..44100)
            .map(|i| 0.5 * (2.0 * std::f32::consts::PI * 1000.0 * i as f32 / 44100.0).sin())
            .collect();
        let audio = PcmAudio::new(vec![samples], 44100, Some(16), Some(44100)).unwrap();
        let grid = prepare_spectrogram(&audio, &SpectrogramConfig::default());

        let dir = std::env::temp_dir().join("audioproof-render-test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("tone.png");
        render_spectrogram(&grid, &RenderConfig::default(), &path).unwrap();
        assert!(path.metadata().unwrap().len() > 0);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_color_ramp_endpoints() {
        assert_eq!(db_to_color(0.0), Rgb([68, 1, 84]));
        let bright = db_to_color(1.0);
        assert_eq!(bright.0[0], 235);
        assert_eq!(bright.0[1], 237);
    }
}
