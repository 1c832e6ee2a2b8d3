/// Data layer: core types, loading, filtering, statistics, and export.
///
/// Architecture:
/// ```text
///        .csv
///         │
///         ▼
///   ┌──────────┐
///   │  loader   │  parse + coerce numerics → ListingTable (cached per path)
///   └──────────┘
///         │
///         ▼
///   ┌──────────────┐
///   │ ListingTable  │  Vec<Listing>, immutable after load
///   └──────────────┘
///         │
///         ▼
///   ┌──────────┐
///   │  filter   │  apply criteria → ordered row indices
///   └──────────┘
///         │
///         ├──▶ summary   count / mean / median
///         ├──▶ charts    scatter · boxes · model counts
///         └──▶ export    subset → CSV bytes
/// ```

pub mod charts;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod summary;
