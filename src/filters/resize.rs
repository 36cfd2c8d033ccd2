use std::rc::Rc;

use super::filter::{Filter, FilterInput, FilterOp, Mode, RowBuffer};
use crate::data::source::DataSource;
use crate::error::Result;

/// Resamples a numeric table to a given number of columns and rows.
pub type Resize = Filter<Resample>;

/// Target shape of a [`Resize`] filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resample {
    cols: usize,
    rows: usize,
}

impl Resample {
    pub fn new(cols: usize, rows: usize) -> Self {
        Resample { cols, rows }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

impl FilterOp for Resample {
    /// Rows are resampled first, then columns of the intermediate table.
    fn filter(&self, input: &FilterInput<'_>, rows: &mut RowBuffer) {
        let original = input.original();
        if self.passes_through(original) {
            return;
        }
        let (src_cols, src_rows) = (original.column_count(), original.row_count());

        let mut table: Vec<Vec<f64>> = (0..src_rows)
            .map(|row| {
                (0..src_cols)
                    .map(|col| original.get(col, row).to_f64_or_nan())
                    .collect()
            })
            .collect();

        if self.rows != src_rows {
            let columns: Vec<Vec<f64>> = (0..src_cols)
                .map(|col| {
                    let column: Vec<f64> = table.iter().map(|row| row[col]).collect();
                    resample(&column, self.rows)
                })
                .collect();
            table = (0..self.rows)
                .map(|row| columns.iter().map(|column| column[row]).collect())
                .collect();
        }

        if self.cols != src_cols {
            for row in &mut table {
                *row = resample(row, self.cols);
            }
        }

        for row in table {
            rows.add(row);
        }
    }

    fn output_size(&self, _original: &dyn DataSource) -> (usize, usize) {
        (self.cols, self.rows)
    }

    fn passes_through(&self, original: &dyn DataSource) -> bool {
        self.cols == original.column_count() && self.rows == original.row_count()
    }
}

/// Area-weighted resampling of `values` to `count` samples.
///
/// Output sample `i` is the mean of the input over `[i * step, (i + 1) * step)`
/// with `step = len / count`; input samples only partly covered by that
/// interval are weighted by the covered fraction.
fn resample(values: &[f64], count: usize) -> Vec<f64> {
    let len = values.len();
    let step = len as f64 / count as f64;
    (0..count)
        .map(|i| {
            let start = i as f64 * step;
            let end = (i + 1) as f64 * step;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(len);

            let mut sum = 0.0;
            let mut weight = 0.0;
            for (j, &v) in values.iter().enumerate().take(last).skip(first) {
                let w = end.min((j + 1) as f64) - start.max(j as f64);
                if w > 0.0 {
                    sum += v * w;
                    weight += w;
                }
            }
            sum / weight
        })
        .collect()
}

impl Filter<Resample> {
    /// Resize `original` to `cols` columns and `rows` rows.
    ///
    /// Every column of `original` must be numeric. When both counts already
    /// match, reads go straight to `original`.
    pub fn new(original: Rc<dyn DataSource>, cols: usize, rows: usize) -> Result<Rc<Self>> {
        Filter::with_op(original, Resample::new(cols, rows), Mode::Omit, &[])
    }

    pub fn target_cols(&self) -> usize {
        self.op().cols
    }

    pub fn target_rows(&self) -> usize {
        self.op().rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resample_clean_windows() {
        assert_eq!(resample(&[1.0, 2.0, 3.0, 4.0], 2), vec![1.5, 3.5]);
    }

    #[test]
    fn test_resample_fractional_edges() {
        let out = resample(&[1.0, 2.0, 3.0], 2);
        // step 1.5: [0, 1.5) covers 1.0 fully and 2.0 half, [1.5, 3) the rest
        assert_relative_eq!(out[0], (1.0 + 0.5 * 2.0) / 1.5, epsilon = 1e-12);
        assert_relative_eq!(out[1], (0.5 * 2.0 + 3.0) / 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_resample_upsampling_repeats() {
        assert_eq!(resample(&[1.0, 5.0], 4), vec![1.0, 1.0, 5.0, 5.0]);
    }

    #[test]
    fn test_resample_empty_input() {
        let out = resample(&[], 2);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|v| v.is_nan()));
        assert!(resample(&[1.0], 0).is_empty());
    }
}
