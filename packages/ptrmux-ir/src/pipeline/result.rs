//! Run report

use serde::Serialize;

use crate::config::RunMode;
use crate::features::rewrite::RewriteStats;

/// Summary of one pass run over a module
#[derive(Debug, Clone, Serialize)]
pub struct PassReport {
    /// Resolution strategy that was selected
    pub mode: RunMode,

    /// Globals that received an identity index
    pub enumerable_globals: usize,

    /// Shadow tag variables created
    pub shadows_created: usize,

    /// Instructions with a non-empty points-to set
    pub resolved_instructions: usize,

    /// Arguments with a non-empty points-to set
    pub resolved_arguments: usize,

    /// Accesses that received a replacement value
    pub rewritten: usize,

    /// Instructions erased by cleanup
    pub erased: usize,

    /// Sweep counters
    pub stats: RewriteStats,
}

impl PassReport {
    /// JSON rendering, for diagnostics and host tooling
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
