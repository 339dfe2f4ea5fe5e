//! Data layer: core types, loading, cleaning and projections.
//!
//! Architecture:
//! ```text
//!  file / URL
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  resolve source, sniff delimiter → RawTable
//!   └──────────┘   (memoised by cache::LoadCache)
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  clean    │  normalise, impute, derive, filter → Dataset
//!   └──────────┘   (lookup tables in countries)
//!        │
//!        ▼
//!   ┌──────────────┐
//!   │ filter/views  │  conjunction filters, mean aggregations
//!   └──────────────┘
//! ```

pub mod cache;
pub mod clean;
pub mod countries;
pub mod filter;
pub mod loader;
pub mod model;
pub mod views;
