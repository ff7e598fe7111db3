//! Resolved points-to sets
//!
//! The table binds each access instruction (and each function argument) to
//! the ordered list of candidate globals it may denote. An absent or empty
//! entry disables rewriting for that instruction; a non-empty entry is never
//! recomputed.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::shared::models::{ArgRef, GlobalId, InstId, Module, ValueRef};

/// Points-to sets keyed by instruction and by argument
#[derive(Debug, Clone, Default)]
pub struct PointsToTable {
    insts: FxHashMap<InstId, Vec<GlobalId>>,
    args: FxHashMap<ArgRef, Vec<GlobalId>>,
}

impl PointsToTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate set of an instruction; empty slice when unresolved
    pub fn of_inst(&self, id: InstId) -> &[GlobalId] {
        self.insts.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Candidate set of an argument; empty slice when unresolved
    pub fn of_arg(&self, arg: ArgRef) -> &[GlobalId] {
        self.args.get(&arg).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether an instruction already has a non-empty set (populate-once)
    pub fn is_resolved(&self, id: InstId) -> bool {
        !self.of_inst(id).is_empty()
    }

    pub fn set_inst(&mut self, id: InstId, set: Vec<GlobalId>) {
        self.insts.insert(id, set);
    }

    pub fn set_arg(&mut self, arg: ArgRef, set: Vec<GlobalId>) {
        self.args.insert(arg, set);
    }

    pub fn resolved_instructions(&self) -> usize {
        self.insts.values().filter(|s| !s.is_empty()).count()
    }

    pub fn resolved_arguments(&self) -> usize {
        self.args.values().filter(|s| !s.is_empty()).count()
    }

    /// Dump the table at debug level, one line per resolved instruction
    pub fn trace_dump(&self, module: &Module) {
        for (&id, set) in &self.insts {
            let targets: Vec<String> = set
                .iter()
                .map(|&g| module.operand_label(&ValueRef::Global(g)))
                .collect();
            debug!(
                inst = %module.operand_label(&ValueRef::Inst(id)),
                targets = %targets.join(","),
                "points-to"
            );
        }
    }
}
