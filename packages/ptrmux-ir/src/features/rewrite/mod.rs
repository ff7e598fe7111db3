//! Enumeration and rewrite of indirect accesses

mod emit;
mod engine;

pub use engine::{RewriteEngine, RewriteOutcome, RewriteStats};
