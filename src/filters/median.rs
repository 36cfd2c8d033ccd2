use std::collections::VecDeque;
use std::rc::Rc;

use super::filter::{Filter, FilterInput, FilterOp, Mode, RowBuffer};
use super::select;
use crate::data::source::DataSource;
use crate::error::{FilterError, Result};

/// Sliding-window median along the row axis, one column at a time.
pub type Median = Filter<MedianWindow>;

/// Window parameters of a [`Median`] filter.
///
/// For output row `r` the window holds the upstream rows
/// `r + offset - window_size ..= r + offset - 1`, so `offset` counts the
/// current row plus the rows ahead of it that take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MedianWindow {
    window_size: usize,
    offset: usize,
}

/// Largest accepted window offset; keeps `row + offset` within `i64`.
pub const MAX_OFFSET: usize = i32::MAX as usize;

fn check_offset(offset: usize) -> Result<usize> {
    if offset > MAX_OFFSET {
        return Err(FilterError::InvalidWindowOffset {
            offset,
            max: MAX_OFFSET,
        });
    }
    Ok(offset)
}

impl MedianWindow {
    pub fn new(window_size: usize, offset: usize) -> Result<Self> {
        if window_size == 0 {
            return Err(FilterError::InvalidWindowSize);
        }
        let offset = check_offset(offset)?;
        Ok(MedianWindow { window_size, offset })
    }

    /// A window centred on the current row.
    pub fn centered(window_size: usize) -> Result<Self> {
        Self::new(window_size, window_size / 2 + 1)
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl FilterOp for MedianWindow {
    fn filter(&self, input: &FilterInput<'_>, rows: &mut RowBuffer) {
        let size = self.window_size;
        // bounded by MAX_OFFSET
        let offset = self.offset as i64;
        let mut rng = rand::thread_rng();

        // Pre-fill every window with the samples before row 0.
        let mut windows: Vec<VecDeque<f64>> = (0..input.column_count_filtered())
            .map(|index| {
                let col = input.index_original(index);
                let mut window = VecDeque::with_capacity(size);
                window.extend((offset - size as i64..offset - 1).map(|row| input.get_original(col, row)));
                window
            })
            .collect();

        for row in 0..input.row_count() as i64 {
            let values = windows
                .iter_mut()
                .enumerate()
                .map(|(index, window)| {
                    if window.len() >= size {
                        window.pop_front();
                    }
                    let col = input.index_original(index);
                    window.push_back(input.get_original(col, row + offset - 1));
                    select::median(window.iter().copied(), &mut rng)
                })
                .collect();
            rows.add(values);
        }
    }
}

impl Filter<MedianWindow> {
    /// Median of `window_size` samples over `cols` of `original` (all columns
    /// when empty). See [`MedianWindow`] for the meaning of `offset`.
    pub fn new(
        original: Rc<dyn DataSource>,
        window_size: usize,
        offset: usize,
        mode: Mode,
        cols: &[usize],
    ) -> Result<Rc<Self>> {
        let window = MedianWindow::new(window_size, offset)?;
        Filter::with_op(original, window, mode, cols)
    }

    pub fn window_size(&self) -> usize {
        self.op().window_size
    }

    pub fn offset(&self) -> usize {
        self.op().offset
    }

    /// Change the number of samples per window and recompute.
    pub fn set_window_size(&self, window_size: usize) -> Result<()> {
        if window_size == 0 {
            return Err(FilterError::InvalidWindowSize);
        }
        self.update_op(|op| op.window_size = window_size);
        Ok(())
    }

    /// Change the window offset and recompute.
    pub fn set_offset(&self, offset: usize) -> Result<()> {
        let offset = check_offset(offset)?;
        self.update_op(|op| op.offset = offset);
        Ok(())
    }
}
