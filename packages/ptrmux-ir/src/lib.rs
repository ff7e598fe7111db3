/*
 * ptrmux-ir - Pointer-Access Enumeration for Hardware Synthesis
 *
 * Rewrites indirect pointer accesses in an IR module into explicit,
 * enumerated selections over a bounded set of statically known targets, so a
 * synthesis backend can lower every dereference to a multiplexer instead of
 * address arithmetic.
 *
 * Feature-First Architecture:
 * - shared/      : Host IR module graph (globals, functions, instructions)
 * - features/    : Vertical slices (global_index → points_to → rewrite → cleanup)
 * - pipeline/    : Fixed-order orchestration
 * - config/      : Run configuration (marker file, database, analysis command)
 */

/// Shared models: the host IR
pub mod shared;

/// Feature modules (pipeline stages)
pub mod features;

/// Pipeline orchestration
pub mod pipeline;

/// Run configuration
pub mod config;

/// Error types
pub mod errors;

// Re-exports for the public API
pub use config::{PassConfig, RunMode};
pub use errors::{PtrMuxError, Result};
pub use features::cleanup::CleanupEngine;
pub use features::global_index::{GlobalIndex, GlobalIndexer};
pub use features::points_to::{
    FactDatabase, FactKind, FactRecord, FactSource, PointsToResolver, PointsToTable,
};
pub use features::rewrite::{RewriteEngine, RewriteOutcome, RewriteStats};
pub use pipeline::{EnumerationPipeline, PassReport};
pub use shared::models::{
    ArgRef, BasicBlock, Constant, FuncId, Function, FunctionBuilder, GlobalId, GlobalVariable,
    InstId, InstKind, Instruction, Linkage, Module, Parameter, Type, ValueRef,
};
