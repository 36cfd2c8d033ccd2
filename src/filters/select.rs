//! Order-statistic selection used by the median filter.
//!
//! Selection is a randomized quickselect: expected linear time, performed in
//! place over a scratch copy of the samples so the caller's window keeps its
//! insertion order.

use rand::Rng;

/// Whether a value takes part in arithmetic (neither NaN nor infinite).
#[inline]
pub fn is_calculable(v: f64) -> bool {
    v.is_finite()
}

/// Return the `k`-th smallest element (0-based) of `values`.
///
/// `values` is reordered so that the result sits at index `k`, smaller
/// elements before it and larger ones after. `values` must be non-empty,
/// contain no NaN and `k < values.len()`.
pub fn randomized_select<R: Rng + ?Sized>(values: &mut [f64], k: usize, rng: &mut R) -> f64 {
    debug_assert!(k < values.len());
    let (mut lo, mut hi) = (0, values.len() - 1);
    loop {
        if lo == hi {
            return values[lo];
        }
        let pivot = rng.gen_range(lo..=hi);
        let (lt, gt) = partition(values, lo, hi, pivot);
        if k < lt {
            hi = lt - 1;
        } else if k > gt {
            lo = gt + 1;
        } else {
            return values[k];
        }
    }
}

/// Three-way partition of `values[lo..=hi]` around `values[pivot]`.
///
/// Returns the inclusive band `(lt, gt)` holding every element equal to the
/// pivot; smaller elements end up before it and larger ones after, so runs
/// of equal samples are settled in a single pass.
fn partition(values: &mut [f64], lo: usize, hi: usize, pivot: usize) -> (usize, usize) {
    let pivot_value = values[pivot];
    let (mut lt, mut i, mut gt) = (lo, lo, hi);
    while i <= gt {
        if values[i] < pivot_value {
            values.swap(lt, i);
            lt += 1;
            i += 1;
        } else if values[i] > pivot_value {
            values.swap(i, gt);
            // an element equal to the pivot stays in lt..=gt, so gt > lt here
            gt -= 1;
        } else {
            i += 1;
        }
    }
    (lt, gt)
}

/// Median of `samples`.
///
/// NaN when there are no samples or any sample is non-calculable. For an
/// even count the two central order statistics are averaged.
pub fn median<R: Rng + ?Sized>(samples: impl IntoIterator<Item = f64>, rng: &mut R) -> f64 {
    let mut values: Vec<f64> = samples.into_iter().collect();
    if values.is_empty() || !values.iter().copied().all(is_calculable) {
        return f64::NAN;
    }

    let n = values.len();
    let lower = randomized_select(&mut values, (n - 1) / 2, rng);
    if n % 2 == 1 {
        return lower;
    }
    let upper = randomized_select(&mut values, n / 2, rng);
    (lower + upper) / 2.0
}
