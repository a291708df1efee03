//! Radix-2 FFT and spectrum derivation
//!
//! In-place decimation-in-time transform over split real/imaginary buffers.
//! Every analyzer in this crate runs through these routines, so the scaling
//! contracts matter: magnitude bins are `20*log10(mag/N)` with a fixed
//! -160 dB floor for zero energy, power bins are `(re^2+im^2)/N^2` linear.

use std::f32::consts::PI;

/// Sentinel dB value for bins with zero energy.
pub const DB_FLOOR: f32 = -160.0;

/// Smallest power of two >= n (>= 1).
pub fn next_pow2(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// In-place radix-2 Cooley-Tukey FFT.
///
/// `re` and `im` must be the same power-of-two length. A length of 0 or 1 is
/// a no-op. No allocation happens inside the butterfly stages.
pub fn fft(re: &mut [f32], im: &mut [f32]) {
    let n = re.len();
    assert_eq!(n, im.len(), "real/imaginary buffers must match in length");
    assert!(n.is_power_of_two() || n == 0, "FFT length must be a power of two");
    if n <= 1 {
        return;
    }

    // Bit-reversal permutation.
    let shift = usize::BITS - n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> shift;
        if j > i {
            re.swap(i, j);
            im.swap(i, j);
        }
    }

    // Butterfly stages.
    let mut len = 2;
    while len <= n {
        let half = len / 2;
        let step = -2.0 * PI / len as f32;
        for start in (0..n).step_by(len) {
            for k in 0..half {
                let angle = step * k as f32;
                let (w_im, w_re) = angle.sin_cos();
                let i = start + k;
                let j = i + half;
                let t_re = re[j] * w_re - im[j] * w_im;
                let t_im = re[j] * w_im + im[j] * w_re;
                re[j] = re[i] - t_re;
                im[j] = im[i] - t_im;
                re[i] += t_re;
                im[i] += t_im;
            }
        }
        len <<= 1;
    }
}

/// Magnitude spectrum in dB for the first N/2 bins.
pub fn magnitude_spectrum_db(re: &[f32], im: &[f32]) -> Vec<f32> {
    let n = re.len();
    debug_assert_eq!(n, im.len());
    let half = n / 2;
    (0..half)
        .map(|i| {
            let mag = (re[i] * re[i] + im[i] * im[i]).sqrt();
            if mag > 0.0 {
                20.0 * (mag / n as f32).log10()
            } else {
                DB_FLOOR
            }
        })
        .collect()
}

/// Linear power spectrum for the first N/2 bins.
pub fn power_spectrum(re: &[f32], im: &[f32]) -> Vec<f32> {
    let n = re.len();
    debug_assert_eq!(n, im.len());
    let half = n / 2;
    let norm = (n as f32) * (n as f32);
    (0..half)
        .map(|i| (re[i] * re[i] + im[i] * im[i]) / norm)
        .collect()
}
