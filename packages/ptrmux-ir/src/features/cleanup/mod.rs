//! Replacement application and dead-code retirement

mod replacer;

pub use replacer::CleanupEngine;
