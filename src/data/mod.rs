/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → StudentDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ StudentDataset │  Vec<StudentRecord>, observed ranges & categories
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply FilterSpec → FilteredView
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
