//! Incremental filters over tabular data.
//!
//! A [`DataTable`](data::table::DataTable) holds typed rows. Filters such as
//! [`Convolution`](filters::Convolution), [`Median`](filters::Median) and
//! [`Resize`](filters::Resize) wrap any [`DataSource`](data::source::DataSource),
//! cache their output and recompute it whenever the wrapped source changes.
//! Filters are sources themselves and can be chained.
//!
//! ```
//! use std::rc::Rc;
//! use rusty_filters::data::source::DataSource;
//! use rusty_filters::data::table::DataTable;
//! use rusty_filters::filters::{kernel_utils, Convolution, Mode};
//!
//! let table = Rc::new(DataTable::from_column(&[1.0, 1.0, 4.0, 1.0, 1.0]));
//! let smooth = Convolution::new(table.clone(), Some(kernel_utils::binomial(3)), Mode::Repeat, &[])?;
//! assert_eq!(smooth.get(0, 2).as_f64(), Some(2.5));
//!
//! table.set(0, 2, 1.0)?;
//! assert_eq!(smooth.get(0, 2).as_f64(), Some(1.0));
//! # Ok::<(), rusty_filters::error::FilterError>(())
//! ```

pub mod data;
pub mod error;
pub mod filters;
pub mod pipeline;

pub use error::{FilterError, Result};
