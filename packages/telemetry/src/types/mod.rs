//! Data types for the telemetry pipeline.

pub mod config;
pub mod field;
pub mod report;
pub mod target;
