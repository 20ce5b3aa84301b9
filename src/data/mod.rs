/// Data layer: catalog types, loading, derivation, filtering and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  read cells → RawTitle          (cache: reload on source change)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  derive   │  parse dates / durations, impute, delay → Catalog
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterCriteria → FilteredView ──► export (CSV)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ aggregate │  counts, delays, histogram, rankings → Aggregates
///   └───────────┘
/// ```

pub mod aggregate;
pub mod cache;
pub mod derive;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
