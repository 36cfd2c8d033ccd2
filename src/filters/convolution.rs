use std::rc::Rc;

use super::filter::{Filter, FilterInput, FilterOp, Mode, RowBuffer};
use super::kernel::Kernel;
use super::select::is_calculable;
use crate::data::source::DataSource;
use crate::error::Result;

/// Kernel convolution along the row axis, one column at a time.
pub type Convolution = Filter<Convolve>;

/// Parameters of a [`Convolution`].
#[derive(Debug, Clone, Default)]
pub struct Convolve {
    kernel: Option<Kernel>,
}

impl Convolve {
    pub fn kernel(&self) -> Option<&Kernel> {
        self.kernel.as_ref()
    }

    /// Convolved value of (`col`, `row`).
    ///
    /// The first non-calculable sample met is returned as is. Without a
    /// kernel the edge-resolved upstream value passes through.
    fn convolve(&self, input: &FilterInput<'_>, col: usize, row: i64) -> f64 {
        let Some(kernel) = &self.kernel else {
            return input.get_original(col, row);
        };

        let mut sum = 0.0;
        for k in kernel.min_index()..=kernel.max_index() {
            let v = input.get_original(col, row + k);
            if !is_calculable(v) {
                return v;
            }
            sum += kernel.get(k) * v;
        }
        sum
    }
}

impl FilterOp for Convolve {
    fn filter(&self, input: &FilterInput<'_>, rows: &mut RowBuffer) {
        let filtered = input.column_count_filtered();
        for row in 0..input.row_count() {
            let values = (0..filtered)
                .map(|index| self.convolve(input, input.index_original(index), row as i64))
                .collect();
            rows.add(values);
        }
    }
}

impl Filter<Convolve> {
    /// Convolve `cols` of `original` (all columns when empty) with `kernel`.
    pub fn new(
        original: Rc<dyn DataSource>,
        kernel: Option<Kernel>,
        mode: Mode,
        cols: &[usize],
    ) -> Result<Rc<Self>> {
        Filter::with_op(original, Convolve { kernel }, mode, cols)
    }

    pub fn kernel(&self) -> Option<Kernel> {
        self.op().kernel.clone()
    }

    /// Replace the kernel and recompute.
    pub fn set_kernel(&self, kernel: Option<Kernel>) {
        self.update_op(|op| op.kernel = kernel);
    }
}
