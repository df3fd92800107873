/// Data layer: core types, loading, and selection.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet / clipboard text
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  rows of text → Dataset (2 or 3 columns)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Dataset  │  Vec<Point>, identified by index
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ selection  │  box / lasso hit-testing → index set
///   └───────────┘
/// ```

pub mod loader;
pub mod model;
pub mod selection;
