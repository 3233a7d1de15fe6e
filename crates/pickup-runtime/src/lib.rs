//! Runtime layer for the pickup dashboard.
//!
//! Loads the dataset in the background, and turns control changes into
//! filtered views through explicit per-control handlers.

pub mod dashboard;
pub mod orchestrator;

pub use pickup_core as core;
pub use pickup_data as data;
