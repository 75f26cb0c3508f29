/// Data layer: record types, loading, filtering and view projection.
///
/// Architecture:
/// ```text
///  .csv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Dataset (text fields, untouched)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  year == y, then exact risk-factor key → row indices
///   └──────────┘
///        │
///        ├─────────────────┐
///        ▼                 ▼
///   ┌──────────┐     ┌──────────┐
///   │  table    │     │  series   │  chronological ratings + tooltip data
///   └──────────┘     └──────────┘
/// ```

pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
pub mod series;
pub mod table;
