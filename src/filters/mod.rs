//! Filter layer: cached, edge-aware transforms over a [`DataSource`].
//!
//! Architecture:
//! ```text
//!   DataTable / any DataSource
//!        │  data_added / data_updated / data_removed
//!        ▼
//!   ┌──────────────────────────┐
//!   │ Filter<F>                 │  edge Mode, filtered columns, RowBuffer
//!   │   F: FilterOp             │  Convolve | MedianWindow | Resample
//!   └──────────────────────────┘
//!        │  re-broadcast to own listeners
//!        ▼
//!   downstream filters
//! ```
//!
//! [`DataSource`]: crate::data::source::DataSource

pub mod convolution;
pub mod filter;
pub mod kernel;
pub mod kernel_utils;
pub mod median;
pub mod resize;
pub mod select;

pub use convolution::Convolution;
pub use filter::{Filter, FilterInput, FilterOp, Mode, Resolved, RowBuffer};
pub use kernel::Kernel;
pub use median::Median;
pub use resize::Resize;
