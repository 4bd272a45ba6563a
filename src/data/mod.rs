/// Data layer: record model, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → ExecutionTable (typed, immutable)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterParams + Window → projected rows
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  rows → Summary<table> | Summary::Empty
///   └───────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  views    │  one filter/aggregate pairing per dashboard view
///   └──────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
pub mod views;

#[cfg(test)]
pub(crate) mod testutil;
