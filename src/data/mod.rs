/// Data layer: records, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  URL / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → SalaryDataset
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ SalaryDataset  │  Vec<Record>, per-attribute domains
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView (row indices)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐     ┌─────────┐
///   │ aggregate  │ ◀── │ country  │  alpha-2 → alpha-3
///   └───────────┘     └─────────┘
///        │
///        ▼
///   DashboardSnapshot (summary, ranking, histogram, shares, countries)
/// ```

pub mod aggregate;
pub mod country;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
