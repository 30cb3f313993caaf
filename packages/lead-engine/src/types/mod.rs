//! Domain types for the lead engine.

pub mod config;
pub mod lead;
pub mod plan;
