//! Cleaning pipeline and view projections for the Eurostat in-work
//! at-risk-of-poverty table (`ilc_iw01`).
//!
//! The desktop dashboard in `main.rs` is a thin consumer of this library:
//! it loads the raw extract once, cleans it into an immutable
//! [`data::model::Dataset`] and renders the projections in [`data::views`].

pub mod config;
pub mod data;
pub mod error;
