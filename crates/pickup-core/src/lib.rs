//! Core domain types for the pickup dashboard.
//!
//! Holds the pickup data model, the date and hour-bucket filters, the
//! per-minute aggregation, session state and CLI settings. Nothing in this
//! crate performs I/O beyond the last-used settings file.

pub mod aggregator;
pub mod error;
pub mod filters;
pub mod formatting;
pub mod models;
pub mod session;
pub mod settings;
pub mod time_utils;
