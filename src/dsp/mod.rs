//! Digital Signal Processing primitives
//!
//! The FFT, window generators, and the shared bounded-stride spectral
//! averaging pipeline that the spectral analyzers are built on.

pub mod fft;
pub mod spectrum;
pub mod windows;

pub use fft::{fft as fft_in_place, magnitude_spectrum_db, next_pow2, power_spectrum, DB_FLOOR};
pub use spectrum::{AveragedSpectrum, SpectralAverager};
pub use windows::{create_window, window_by_name, WindowType, KAISER_DEFAULT_BETA};
