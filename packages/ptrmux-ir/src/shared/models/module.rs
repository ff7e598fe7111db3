//! Module container
//!
//! Owns globals, functions, and the instruction arena. Editing follows a
//! snapshot discipline: callers iterate over cloned instruction-id lists and
//! apply insertions/erasures through the module, so there is no iterator
//! invalidation to reason about. Erasure tombstones the arena slot; ids are
//! never reused within a run.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::errors::{PtrMuxError, Result};

use super::function::{BasicBlock, Function};
use super::global::GlobalVariable;
use super::instruction::Instruction;
use super::value::{FuncId, GlobalId, InstId, ValueRef};

/// Top-level IR container
#[derive(Debug, Clone, Default)]
pub struct Module {
    pub name: String,
    globals: Vec<GlobalVariable>,
    functions: Vec<Function>,
    insts: Vec<Option<Instruction>>,
    global_names: FxHashMap<String, GlobalId>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    // ───────────────────────── globals ─────────────────────────

    /// Append a global in declaration order
    pub fn add_global(&mut self, gv: GlobalVariable) -> GlobalId {
        let id = GlobalId(self.globals.len() as u32);
        self.global_names.insert(gv.name.clone(), id);
        self.globals.push(gv);
        id
    }

    #[inline]
    pub fn global(&self, id: GlobalId) -> &GlobalVariable {
        &self.globals[id.0 as usize]
    }

    /// Globals with their ids, in declaration order
    pub fn globals(&self) -> impl Iterator<Item = (GlobalId, &GlobalVariable)> {
        self.globals
            .iter()
            .enumerate()
            .map(|(i, g)| (GlobalId(i as u32), g))
    }

    pub fn global_by_name(&self, name: &str) -> Option<GlobalId> {
        self.global_names.get(name).copied()
    }

    // ──────────────────────── functions ────────────────────────

    pub fn add_function(&mut self, func: Function) -> FuncId {
        let id = FuncId(self.functions.len() as u32);
        self.functions.push(func);
        id
    }

    #[inline]
    pub fn function(&self, id: FuncId) -> &Function {
        &self.functions[id.0 as usize]
    }

    #[inline]
    pub fn function_mut(&mut self, id: FuncId) -> &mut Function {
        &mut self.functions[id.0 as usize]
    }

    /// Functions with their ids, in declaration order
    pub fn functions(&self) -> impl Iterator<Item = (FuncId, &Function)> {
        self.functions
            .iter()
            .enumerate()
            .map(|(i, f)| (FuncId(i as u32), f))
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    // ──────────────────── instruction arena ────────────────────

    /// Allocate an instruction in the arena without placing it in a block
    pub fn alloc_inst(&mut self, inst: Instruction) -> InstId {
        let id = InstId(self.insts.len() as u32);
        self.insts.push(Some(inst));
        id
    }

    /// The instruction behind an id, `None` if it has been erased
    #[inline]
    pub fn inst(&self, id: InstId) -> Option<&Instruction> {
        self.insts.get(id.0 as usize).and_then(|slot| slot.as_ref())
    }

    #[inline]
    pub fn inst_mut(&mut self, id: InstId) -> Option<&mut Instruction> {
        self.insts
            .get_mut(id.0 as usize)
            .and_then(|slot| slot.as_mut())
    }

    /// Append an allocated instruction to the end of a block
    pub fn push_inst(&mut self, func: FuncId, block: usize, inst: Instruction) -> InstId {
        let id = self.alloc_inst(inst);
        self.functions[func.0 as usize].blocks[block].insts.push(id);
        id
    }

    /// Insert a new instruction immediately before an existing one
    ///
    /// Repeated insertions before the same anchor keep their emission order.
    pub fn insert_before(&mut self, anchor: InstId, inst: Instruction) -> Result<InstId> {
        let (f, b, pos) = self.locate(anchor).ok_or_else(|| {
            PtrMuxError::internal(format!("insertion anchor {:?} is not placed in any block", anchor))
        })?;
        let id = self.alloc_inst(inst);
        self.functions[f].blocks[b].insts.insert(pos, id);
        Ok(id)
    }

    /// Unlink an instruction from its block and tombstone its arena slot
    ///
    /// Erasing an already-erased id is a no-op.
    pub fn erase(&mut self, id: InstId) {
        if self.inst(id).is_none() {
            return;
        }
        if let Some((f, b, pos)) = self.locate(id) {
            self.functions[f].blocks[b].insts.remove(pos);
        }
        debug!("erasing instruction {:?}", id);
        self.insts[id.0 as usize] = None;
    }

    fn locate(&self, id: InstId) -> Option<(usize, usize, usize)> {
        for (fi, func) in self.functions.iter().enumerate() {
            for (bi, block) in func.blocks.iter().enumerate() {
                if let Some(pos) = block.insts.iter().position(|&i| i == id) {
                    return Some((fi, bi, pos));
                }
            }
        }
        None
    }

    // ────────────────────── use queries ──────────────────────

    /// All live instructions using `value` as an operand, in program order,
    /// paired with the operand position
    pub fn uses_of(&self, value: &ValueRef) -> Vec<(InstId, usize)> {
        let mut uses = Vec::new();
        for func in &self.functions {
            for block in &func.blocks {
                for &id in &block.insts {
                    if let Some(inst) = self.inst(id) {
                        for (pos, op) in inst.operands().iter().enumerate() {
                            if *op == value {
                                uses.push((id, pos));
                            }
                        }
                    }
                }
            }
        }
        uses
    }

    /// Overwrite one operand of an instruction
    pub fn replace_operand(&mut self, id: InstId, pos: usize, value: ValueRef) {
        if let Some(inst) = self.inst_mut(id) {
            if let Some(op) = inst.operands_mut().into_iter().nth(pos) {
                *op = value;
            }
        }
    }

    /// Snapshot of every placed instruction id, in program order
    pub fn all_inst_ids(&self) -> Vec<InstId> {
        let mut ids = Vec::new();
        for func in &self.functions {
            for block in &func.blocks {
                ids.extend(block.insts.iter().copied());
            }
        }
        ids
    }

    /// Number of live (non-erased) instructions
    pub fn live_inst_count(&self) -> usize {
        self.insts.iter().filter(|slot| slot.is_some()).count()
    }
}
