//! Core trait abstractions for the telemetry pipeline.
//!
//! These traits define the seams where network access and scheduling
//! can be swapped (real HTTP vs. mocks, tasks vs. threads).

pub mod executor;
pub mod fetcher;
