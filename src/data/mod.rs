//! Data layer: cell types, the source/listener contract, tables and file I/O.
//!
//! Architecture:
//! ```text
//!  .parquet / .json / .csv
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Dataset
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │  DataTable    │  typed rows, notifies DataListeners
//!   └──────────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  writer   │  any DataSource → CSV
//!   └──────────┘
//! ```

pub mod loader;
pub mod model;
pub mod source;
pub mod table;
pub mod writer;
