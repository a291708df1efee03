// src/audio/wav.rs
//
// WAV loading via hound. This is the only decoder the crate ships; the
// analysis engine itself takes PcmAudio from any upstream source.

use anyhow::{bail, Context, Result};
use std::path::Path;

use super::PcmAudio;

/// Load a WAV file into planar f32 PCM.
///
/// Integer formats are normalized to [-1, 1] by the full-scale value of the
/// stored bit depth. The header bit depth and sample rate are carried along
/// as reported metadata for the bit-depth analyzer and the verdict.
pub fn load_wav(path: &Path) -> Result<PcmAudio> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open WAV file: {}", path.display()))?;
    let spec = reader.spec();

    if spec.channels == 0 {
        bail!("WAV file reports 0 channels");
    }

    let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .context("Failed to read float samples")?,
        (hound::SampleFormat::Int, bits) if bits <= 32 => {
            let scale = 1.0 / (1i64 << (bits - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 * scale))
                .collect::<Result<_, _>>()
                .context("Failed to read integer samples")?
        }
        (fmt, bits) => bail!("Unsupported WAV sample format: {:?} {}-bit", fmt, bits),
    };

    if interleaved.is_empty() {
        bail!("WAV file contains no samples");
    }

    let num_channels = spec.channels as usize;
    let frames = interleaved.len() / num_channels;
    let mut channels = vec![Vec::with_capacity(frames); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (ch, &s) in channels.iter_mut().zip(frame.iter()) {
            ch.push(s);
        }
    }

    PcmAudio::new(
        channels,
        spec.sample_rate,
        Some(spec.bits_per_sample as u8),
        Some(spec.sample_rate),
    )
    .context("WAV file violates the PCM input contract")
}
