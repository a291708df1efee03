//! Window function implementations

use std::f32::consts::PI;

/// Default Kaiser shape parameter.
pub const KAISER_DEFAULT_BETA: f32 = 12.0;

/// Window function types
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindowType {
    Hann,
    Hamming,
    Blackman,
    BlackmanHarris,
    FlatTop,
    Kaiser(f32), // Beta parameter
}

impl WindowType {
    /// Resolve a window by name, defaulting to Hann for anything unknown.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "hamming" => WindowType::Hamming,
            "blackman" => WindowType::Blackman,
            "blackman-harris" | "blackmanharris" => WindowType::BlackmanHarris,
            "flattop" | "flat-top" => WindowType::FlatTop,
            "kaiser" => WindowType::Kaiser(KAISER_DEFAULT_BETA),
            _ => WindowType::Hann,
        }
    }
}

impl Default for WindowType {
    fn default() -> Self {
        WindowType::Hann
    }
}

/// Create window coefficients of the given length.
pub fn create_window(size: usize, window_type: WindowType) -> Vec<f32> {
    if size == 0 {
        return vec![];
    }
    if size == 1 {
        return vec![1.0];
    }
    let denom = (size - 1) as f32;
    (0..size)
        .map(|i| {
            let x = i as f32;
            match window_type {
                WindowType::Hann => 0.5 * (1.0 - (2.0 * PI * x / denom).cos()),
                WindowType::Hamming => 0.54 - 0.46 * (2.0 * PI * x / denom).cos(),
                WindowType::Blackman => {
                    0.42 - 0.5 * (2.0 * PI * x / denom).cos()
                        + 0.08 * (4.0 * PI * x / denom).cos()
                }
                WindowType::BlackmanHarris => {
                    0.35875 - 0.48829 * (2.0 * PI * x / denom).cos()
                        + 0.14128 * (4.0 * PI * x / denom).cos()
                        - 0.01168 * (6.0 * PI * x / denom).cos()
                }
                WindowType::FlatTop => {
                    0.21557895 - 0.41663158 * (2.0 * PI * x / denom).cos()
                        + 0.277263158 * (4.0 * PI * x / denom).cos()
                        - 0.083578947 * (6.0 * PI * x / denom).cos()
                        + 0.006947368 * (8.0 * PI * x / denom).cos()
                }
                WindowType::Kaiser(beta) => {
                    let ratio = 2.0 * x / denom - 1.0;
                    let arg = beta * (1.0 - ratio * ratio).max(0.0).sqrt();
                    bessel_i0(arg) / bessel_i0(beta)
                }
            }
        })
        .collect()
}

/// Create window coefficients by window name (unknown names fall back to Hann).
pub fn window_by_name(name: &str, size: usize) -> Vec<f32> {
    create_window(size, WindowType::from_name(name))
}

/// Modified Bessel function of the first kind, order 0.
///
/// 25-term power series, plenty for the beta range used here.
fn bessel_i0(x: f32) -> f32 {
    let mut sum = 1.0f32;
    let mut term = 1.0f32;
    let x2 = x * x;
    for k in 1..25 {
        term *= x2 / (4.0 * k as f32 * k as f32);
        sum += term;
    }
    sum
}
