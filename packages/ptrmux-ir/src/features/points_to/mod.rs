//! Points-to resolution
//!
//! Computes, per access instruction and per function argument, the set of
//! candidate target globals it may reach: either conservatively (the full
//! enumerable-global list) or precisely from an externally supplied fact
//! database. This feature performs no alias analysis itself; it only consumes
//! facts.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::PointsToResolver;
pub use domain::{FactKind, FactRecord, PointsToTable};
pub use infrastructure::{run_analysis, FactDatabase};
pub use ports::FactSource;
