//! Small line-oriented widgets shared by the views.

pub mod controls;
pub mod header;
