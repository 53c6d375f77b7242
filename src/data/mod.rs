//! Data layer: core types, loading, caching, filtering and aggregation.
//!
//! Architecture:
//! ```text
//!  .csv / .parquet
//!        │
//!        ▼
//!   ┌────────────┐
//!   │ TableCache │  path + fingerprint → Arc<InventoryTable>
//!   └────────────┘
//!        │  (miss)
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → InventoryTable (+ derived columns)
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  facet selection → filtered records
//!   └──────────┘
//!        │
//!        ▼
//!   ┌───────────┐
//!   │ aggregate │  KPIs, group-bys, pivot, stock buckets, histogram
//!   └───────────┘
//! ```

pub mod aggregate;
pub mod cache;
pub mod error;
pub mod filter;
pub mod loader;
pub mod model;
