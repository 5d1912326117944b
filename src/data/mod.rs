/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///   cars.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce rows → CarDataset
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ CarDataset │  Vec<Record>, origin / cluster / model indices
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterState + mode → retained indices
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
