//! Reusable widgets.

pub mod topology;
