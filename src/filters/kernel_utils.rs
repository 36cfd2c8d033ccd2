//! Factories for commonly used kernels.

use super::kernel::Kernel;

/// Binomial smoothing kernel of `size` coefficients, centred, summing to one.
///
/// Built as row `size - 1` of Pascal's triangle scaled by `0.5^(size - 1)`,
/// which approximates a Gaussian for larger sizes.
pub fn binomial(size: usize) -> Kernel {
    let mut values = vec![0.0; size];
    if let Some(first) = values.first_mut() {
        *first = 0.5f64.powi(size as i32 - 1);
    }
    for i in 0..size.saturating_sub(1) {
        for j in (1..=i + 1).rev() {
            values[j] += values[j - 1];
        }
    }
    Kernel::new(values)
}

/// Largest binomial kernel whose seed `0.5^(size - 1)` is still a normal
/// `f64`; larger sizes lose precision and eventually underflow to zero.
pub const MAX_BINOMIAL_SIZE: usize = 1023;

/// Kernel size for a binomial of the given `variance`:
/// `floor(4 * variance) + 1`, saturating at `usize::MAX`.
pub fn binomial_size_for_variance(variance: f64) -> usize {
    ((variance * 4.0).floor().max(0.0) as usize).saturating_add(1)
}

/// Binomial kernel whose spread corresponds to `variance`.
/// See [`binomial_size_for_variance`].
pub fn binomial_for_variance(variance: f64) -> Kernel {
    binomial(binomial_size_for_variance(variance))
}

/// Box kernel where every coefficient equals `value`.
pub fn uniform(size: usize, offset: i64, value: f64) -> Kernel {
    Kernel::with_offset(offset, vec![value; size])
}
