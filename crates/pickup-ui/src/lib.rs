//! Terminal UI layer for the pickup dashboard.
//!
//! Provides themes, the header and sidebar controls, the records table, the
//! per-minute bar chart, the hexagon map, and the application event loop
//! built on top of [`ratatui`].

pub mod app;
pub mod chart_view;
pub mod components;
pub mod map_view;
pub mod table_view;
pub mod themes;

pub use pickup_core as core;
