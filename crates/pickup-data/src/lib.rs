//! Data ingestion layer for the pickup dashboard.
//!
//! Fetches the pickup table over HTTP or from disk, transparently gunzips it,
//! parses it into a [`pickup_core::models::Dataset`], keeps loaded tables in
//! an explicit per-process cache, and bins pickups into hexagons for the map.

pub mod cache;
pub mod error;
pub mod hexbin;
pub mod loader;

pub use pickup_core as core;
