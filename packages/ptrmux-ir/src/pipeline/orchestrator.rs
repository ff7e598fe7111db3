//! Pipeline orchestration
//!
//! One synchronous sweep in fixed order: index globals, resolve points-to
//! sets, rewrite accesses, apply replacements and erase. No fixpoint
//! iteration; indirection is assumed shallow (pointer or pointer-to-pointer).

use tracing::info;

use crate::config::{PassConfig, RunMode};
use crate::errors::Result;
use crate::features::cleanup::CleanupEngine;
use crate::features::global_index::GlobalIndexer;
use crate::features::points_to::{run_analysis, FactDatabase, PointsToResolver};
use crate::features::rewrite::RewriteEngine;
use crate::shared::models::Module;

use super::result::PassReport;

/// Runs the whole enumeration pass over a module
#[derive(Debug, Clone, Default)]
pub struct EnumerationPipeline {
    config: PassConfig,
}

impl EnumerationPipeline {
    pub fn new(config: PassConfig) -> Self {
        Self { config }
    }

    /// Transform the module in place and return a run report
    pub fn run(&self, module: &mut Module) -> Result<PassReport> {
        info!(module = %module.name, "starting pointer-access enumeration");

        let index = GlobalIndexer::new().run(module);
        info!(
            globals = index.len(),
            shadows = index.shadow_count(),
            "globals indexed"
        );

        let mode = self.config.run_mode();
        let table = match mode {
            RunMode::Conservative => {
                info!("no marker file; resolving conservatively");
                PointsToResolver::new(&index).resolve_conservative(module)
            }
            RunMode::Database => {
                info!("marker file present; resolving from fact database");
                run_analysis(&self.config.analysis_command, self.config.work_dir());
                let db = FactDatabase::load(&self.config.database_path())?;
                PointsToResolver::new(&index).resolve_from_facts(module, &db)
            }
        };
        table.trace_dump(module);

        let outcome = RewriteEngine::new(&index, &table).run(module)?;
        let stats = outcome.stats;
        let rewritten = outcome.replacements.len();
        let resolved_instructions = table.resolved_instructions();
        let resolved_arguments = table.resolved_arguments();

        let erased = CleanupEngine::apply(module, outcome, &table);

        info!(
            accesses = stats.accesses,
            candidates = stats.candidates,
            rewritten,
            erased,
            "pointer-access enumeration finished"
        );

        Ok(PassReport {
            mode,
            enumerable_globals: index.len(),
            shadows_created: index.shadow_count(),
            resolved_instructions,
            resolved_arguments,
            rewritten,
            erased,
            stats,
        })
    }
}
