//! Replacement application and dead instruction removal
//!
//! Retargets every meaningful use of a superseded instruction to its
//! replacement, then erases the scheduled instructions in reverse discovery
//! order so consumers are unlinked before producers. Gep and load users are
//! never retargeted here: they carry their own replacement entries. Store
//! users only ever have their value operand overwritten; the address operand
//! is the rewrite engine's business.

use tracing::debug;

use crate::features::points_to::PointsToTable;
use crate::features::rewrite::RewriteOutcome;
use crate::shared::models::{InstId, Module, ValueRef};

/// Applies a rewrite outcome to the module
#[derive(Debug, Default)]
pub struct CleanupEngine;

impl CleanupEngine {
    /// Retarget uses and erase dead instructions; returns the number of
    /// instructions erased
    pub fn apply(module: &mut Module, outcome: RewriteOutcome, table: &PointsToTable) -> usize {
        let RewriteOutcome {
            replacements,
            mut removals,
            ..
        } = outcome;

        for (orig, replacement) in replacements.iter().rev() {
            Self::retarget_uses(module, *orig, replacement);

            // An original with a single-candidate set leaves its remaining
            // non-store consumers dead once the direct substitution is in.
            if table.of_inst(*orig).len() == 1 {
                for (user, _) in module.uses_of(&ValueRef::Inst(*orig)) {
                    let is_store = module.inst(user).map(|i| i.is_store()).unwrap_or(true);
                    if !is_store {
                        removals.push(user);
                    }
                }
            }
        }

        Self::erase_scheduled(module, &removals)
    }

    fn retarget_uses(module: &mut Module, orig: InstId, replacement: &ValueRef) {
        let uses = module.uses_of(&ValueRef::Inst(orig));
        for (user, pos) in uses {
            let Some(inst) = module.inst(user) else { continue };
            if inst.is_gep() || inst.is_load() {
                continue;
            }
            if inst.is_store() {
                // Value operand only; overwrite even when unchanged.
                if pos == 0 {
                    debug!(user = %module.operand_label(&ValueRef::Inst(user)),
                           "retargeting store value operand");
                    module.replace_operand(user, pos, replacement.clone());
                }
                continue;
            }
            let current = inst.operands()[pos].clone();
            if current == *replacement {
                continue;
            }
            module.replace_operand(user, pos, replacement.clone());
        }
    }

    fn erase_scheduled(module: &mut Module, removals: &[InstId]) -> usize {
        let mut erased = 0;
        for &id in removals.iter().rev() {
            if module.inst(id).is_none() {
                continue;
            }
            // One level of dependent cleanup: remaining users go first.
            let users: Vec<InstId> = module
                .uses_of(&ValueRef::Inst(id))
                .into_iter()
                .map(|(u, _)| u)
                .collect();
            for user in users {
                if module.inst(user).is_some() {
                    module.erase(user);
                    erased += 1;
                }
            }
            module.erase(id);
            erased += 1;
        }
        erased
    }
}
