use std::path::Path;
use std::rc::Rc;

use anyhow::Context;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::data::source::DataSource;
use crate::error::{FilterError, Result};
use crate::filters::kernel::Kernel;
use crate::filters::median::MedianWindow;
use crate::filters::{kernel_utils, Convolution, Median, Mode, Resize};

// ---------------------------------------------------------------------------
// Pipeline configuration
// ---------------------------------------------------------------------------

/// A chain of filters, read from JSON:
///
/// ```json
/// { "filters": [
///     { "type": "convolution", "kernel": { "kind": "binomial", "size": 5 }, "columns": [1] },
///     { "type": "median", "window_size": 5, "mode": "mirror" },
///     { "type": "resize", "rows": 100 }
/// ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

/// One stage of a [`Pipeline`]. Empty `columns` means every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterSpec {
    Convolution {
        #[serde(default)]
        kernel: Option<KernelSpec>,
        #[serde(default)]
        mode: Mode,
        #[serde(default)]
        columns: Vec<usize>,
    },
    Median {
        window_size: usize,
        /// Defaults to a window centred on the current row.
        #[serde(default)]
        offset: Option<usize>,
        #[serde(default)]
        mode: Mode,
        #[serde(default)]
        columns: Vec<usize>,
    },
    Resize {
        /// Target column count; keeps the upstream count when absent.
        #[serde(default)]
        columns: Option<usize>,
        /// Target row count; keeps the upstream count when absent.
        #[serde(default)]
        rows: Option<usize>,
    },
}

/// How to build a convolution kernel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum KernelSpec {
    Binomial {
        size: usize,
    },
    BinomialVariance {
        variance: f64,
    },
    Uniform {
        size: usize,
        #[serde(default)]
        offset: Option<i64>,
        value: f64,
    },
    Custom {
        values: Vec<f64>,
        #[serde(default)]
        offset: Option<i64>,
    },
}

impl KernelSpec {
    /// Build the kernel. Binomial sizes above
    /// [`MAX_BINOMIAL_SIZE`](kernel_utils::MAX_BINOMIAL_SIZE) are rejected.
    pub fn build(&self) -> Result<Kernel> {
        let kernel = match self {
            KernelSpec::Binomial { size } => kernel_utils::binomial(check_binomial_size(*size)?),
            KernelSpec::BinomialVariance { variance } => {
                let size = kernel_utils::binomial_size_for_variance(*variance);
                kernel_utils::binomial(check_binomial_size(size)?)
            }
            KernelSpec::Uniform {
                size,
                offset,
                value,
            } => kernel_utils::uniform(*size, offset.unwrap_or(*size as i64 / 2), *value),
            KernelSpec::Custom { values, offset } => match offset {
                Some(offset) => Kernel::with_offset(*offset, values.clone()),
                None => Kernel::new(values.clone()),
            },
        };
        Ok(kernel)
    }
}

fn check_binomial_size(size: usize) -> Result<usize> {
    let max = kernel_utils::MAX_BINOMIAL_SIZE;
    if size > max {
        return Err(FilterError::KernelTooLarge { size, max });
    }
    Ok(size)
}

impl Pipeline {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Read a pipeline description from a JSON file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading pipeline {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing pipeline {}", path.display()))
    }

    /// Chain the filters onto `source`, returning the last stage.
    ///
    /// Each stage keeps its upstream alive, so holding the returned handle
    /// keeps the whole chain listening.
    pub fn build(&self, source: Rc<dyn DataSource>) -> Result<Rc<dyn DataSource>> {
        let mut current = source;
        for (stage, spec) in self.filters.iter().enumerate() {
            debug!("building stage {stage}: {spec:?}");
            current = spec.build(current)?;
        }
        Ok(current)
    }
}

impl FilterSpec {
    pub fn build(&self, source: Rc<dyn DataSource>) -> Result<Rc<dyn DataSource>> {
        let filter: Rc<dyn DataSource> = match self {
            FilterSpec::Convolution {
                kernel,
                mode,
                columns,
            } => {
                let kernel = kernel.as_ref().map(KernelSpec::build).transpose()?;
                Convolution::new(source, kernel, *mode, columns)?
            }
            FilterSpec::Median {
                window_size,
                offset,
                mode,
                columns,
            } => {
                let window = match offset {
                    Some(offset) => MedianWindow::new(*window_size, *offset)?,
                    None => MedianWindow::centered(*window_size)?,
                };
                Median::new(source, window.window_size(), window.offset(), *mode, columns)?
            }
            FilterSpec::Resize { columns, rows } => {
                let cols = columns.unwrap_or_else(|| source.column_count());
                let rows = rows.unwrap_or_else(|| source.row_count());
                Resize::new(source, cols, rows)?
            }
        };
        Ok(filter)
    }
}
