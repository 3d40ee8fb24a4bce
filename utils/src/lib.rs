//! Shared utilities for Arbiter binaries and services.

pub mod logging;
pub mod stats;

pub use logging::init_tracing;
pub use stats::StatsCounter;
