//! Enumeration rewrite engine
//!
//! Walks every instruction once, in program order, and converts each indirect
//! memory access into a chain of direct accesses merged by run-time equality
//! tests against the identity tag. The chain is left-folded over the
//! points-to set in set order; when no tag matches at run time the chain
//! yields the first candidate's value.
//!
//! Scalar and aggregate candidates take different routes on purpose: accesses
//! through a loaded pointer enumerate scalar storage only, accesses through
//! an address computation enumerate aggregate storage only. The two filters
//! stay separate.

use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::Result;
use crate::features::global_index::GlobalIndex;
use crate::features::points_to::PointsToTable;
use crate::shared::models::{
    Constant, FuncId, GlobalId, InstId, InstKind, Module, ValueRef,
};

use super::emit::{emit_gep, emit_icmp_eq, emit_load, emit_select, emit_store};

/// Counters kept across the sweep, reported at the end of the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    /// Access instructions considered
    pub accesses: usize,

    /// Candidate targets enumerated across all selection chains
    pub candidates: usize,
}

/// Everything the cleanup engine needs to retire the superseded instructions
#[derive(Debug, Default)]
pub struct RewriteOutcome {
    /// Original instruction to replacement value, in discovery order
    pub replacements: Vec<(InstId, ValueRef)>,

    /// Instructions scheduled for deletion, in discovery order
    pub removals: Vec<InstId>,

    pub stats: RewriteStats,
}

/// Single-sweep rewrite over a whole module
pub struct RewriteEngine<'a> {
    index: &'a GlobalIndex,
    table: &'a PointsToTable,
    by_id: FxHashMap<InstId, ValueRef>,
    replacements: Vec<(InstId, ValueRef)>,
    removals: Vec<InstId>,
    stats: RewriteStats,
}

impl<'a> RewriteEngine<'a> {
    pub fn new(index: &'a GlobalIndex, table: &'a PointsToTable) -> Self {
        Self {
            index,
            table,
            by_id: FxHashMap::default(),
            replacements: Vec::new(),
            removals: Vec::new(),
            stats: RewriteStats::default(),
        }
    }

    /// Rewrite every function, consuming the engine
    pub fn run(mut self, module: &mut Module) -> Result<RewriteOutcome> {
        for f in 0..module.function_count() {
            let func = FuncId(f as u32);
            let block_count = module.function(func).blocks.len();
            for b in 0..block_count {
                // Snapshot: rewriting inserts into and never removes from
                // this block, so the captured ids stay valid.
                let snapshot = module.function(func).blocks[b].insts.clone();
                for id in snapshot {
                    let Some(inst) = module.inst(id) else { continue };
                    match inst.kind.clone() {
                        InstKind::Load { addr } => self.rewrite_load(module, id, addr)?,
                        InstKind::Store { value, addr } => {
                            self.rewrite_store(module, id, value, addr)?
                        }
                        _ => {}
                    }
                }
            }
        }
        Ok(RewriteOutcome {
            replacements: self.replacements,
            removals: self.removals,
            stats: self.stats,
        })
    }

    // ─────────────────────────── loads ───────────────────────────

    fn rewrite_load(&mut self, module: &mut Module, id: InstId, addr: ValueRef) -> Result<()> {
        if let ValueRef::Global(g) = addr {
            if let Some(shadow) = self.index.shadow_of(g) {
                return self.rewrite_direct_load(module, id, shadow);
            }
        }

        let producer = addr
            .as_inst()
            .and_then(|i| module.inst(i).map(|inst| (i, inst.kind.clone())));
        match producer {
            Some((inner, InstKind::Load { .. })) => self.rewrite_load_via_load(module, id, inner),
            Some((gep, InstKind::Gep { base, indices })) => {
                self.rewrite_load_via_gep(module, id, gep, base, indices)
            }
            _ => {
                self.stats.accesses += 1;
                self.stats.candidates += 1;
                Ok(())
            }
        }
    }

    /// The accessed address is a shadowed global: read the tag directly
    fn rewrite_direct_load(
        &mut self,
        module: &mut Module,
        id: InstId,
        shadow: GlobalId,
    ) -> Result<()> {
        self.stats.accesses += 1;
        self.stats.candidates += 1;
        let name = module.global(shadow).name.clone();
        let new = emit_load(
            module,
            id,
            format!("{}_load", name),
            ValueRef::Global(shadow),
        )?;
        debug!(tag = %name, "direct load rewritten to tag load");
        self.record(id, new);
        self.removals.push(id);
        Ok(())
    }

    /// Double indirection: the address was itself produced by a load
    fn rewrite_load_via_load(
        &mut self,
        module: &mut Module,
        id: InstId,
        inner: InstId,
    ) -> Result<()> {
        self.stats.accesses += 1;
        let tag = self.by_id.get(&inner).cloned();
        let set = self.table.of_inst(inner).to_vec();

        let mut chain = Vec::new();
        for &cand in &set {
            let storage = self.index.storage_of(cand);
            if module.global(storage).ty.is_aggregate() {
                continue;
            }
            if self.is_self_comparison(module, tag.as_ref(), storage) {
                continue;
            }
            self.stats.candidates += 1;
            chain.push(cand);
        }

        if set.is_empty() {
            return Ok(());
        }
        if chain.is_empty() {
            warn!(inst = %module.operand_label(&ValueRef::Inst(id)),
                  "all candidates filtered out; load left untouched");
            return Ok(());
        }
        if chain.len() > 1 && tag.is_none() {
            warn!(inst = %module.operand_label(&ValueRef::Inst(id)),
                  "address producer has no replacement tag; load left untouched");
            return Ok(());
        }

        let mut acc: Option<ValueRef> = None;
        for &cand in &chain {
            let storage = self.index.storage_of(cand);
            let name = module.global(storage).name.clone();
            let cur = emit_load(
                module,
                id,
                format!("{}_load", name),
                ValueRef::Global(storage),
            )?;
            acc = Some(match acc {
                None => cur,
                Some(prev) => {
                    let idx = Constant::int32(self.index.index_of(cand));
                    let cmp = emit_icmp_eq(
                        module,
                        id,
                        format!("{}_cmp", name),
                        ValueRef::Const(idx),
                        tag.clone().unwrap_or_else(|| ValueRef::Const(Constant::int32(0))),
                    )?;
                    emit_select(module, id, format!("{}_select", name), cmp, cur, prev)?
                }
            });
        }

        if let Some(replacement) = acc {
            self.record(id, replacement);
            self.removals.push(id);
        }
        Ok(())
    }

    /// The address was produced by a single-index address computation:
    /// enumerate aggregate candidates only
    fn rewrite_load_via_gep(
        &mut self,
        module: &mut Module,
        id: InstId,
        gep: InstId,
        base: ValueRef,
        indices: Vec<ValueRef>,
    ) -> Result<()> {
        if indices.len() > 1 {
            debug!(indices = indices.len(), "multi-level address computation left untouched");
            return Ok(());
        }
        let set = self.table.of_inst(gep).to_vec();
        let gep_name = module
            .inst(gep)
            .map(|i| i.name.clone())
            .unwrap_or_default();
        // Unlike the load-through-load case, the untranslated base address
        // itself serves as the comparison value when no replacement exists.
        let tag = self
            .by_id
            .get(&gep_base_inst(&base))
            .cloned()
            .unwrap_or_else(|| base.clone());
        self.stats.accesses += 1;

        let chain: Vec<GlobalId> = set
            .iter()
            .copied()
            .filter(|&g| module.global(g).ty.is_aggregate())
            .collect();
        self.stats.candidates += chain.len();

        if set.is_empty() {
            return Ok(());
        }
        if chain.is_empty() {
            warn!(inst = %module.operand_label(&ValueRef::Inst(id)),
                  "no aggregate candidates; load left untouched");
            return Ok(());
        }

        let mut acc: Option<ValueRef> = None;
        for &cand in &chain {
            let gname = module.global(cand).name.clone();
            let new_gep = emit_gep(
                module,
                id,
                format!("{}{}_gep", gep_name, gname),
                ValueRef::Global(cand),
                prefixed_indices(&indices),
            )?;
            let cur = emit_load(module, id, format!("{}{}_load", gep_name, gname), new_gep)?;
            acc = Some(match acc {
                None => cur,
                Some(prev) => {
                    let idx = Constant::int32(self.index.index_of(cand));
                    let cmp = emit_icmp_eq(
                        module,
                        id,
                        format!("{}{}_cmp", gep_name, gname),
                        tag.clone(),
                        ValueRef::Const(idx),
                    )?;
                    emit_select(module, id, format!("{}{}_select", gep_name, gname), cmp, cur, prev)?
                }
            });
        }

        if let Some(replacement) = acc {
            self.record(id, replacement);
            self.removals.push(id);
        }
        Ok(())
    }

    // ─────────────────────────── stores ───────────────────────────

    fn rewrite_store(
        &mut self,
        module: &mut Module,
        id: InstId,
        value: ValueRef,
        addr: ValueRef,
    ) -> Result<()> {
        if let ValueRef::Global(g) = addr {
            if let Some(shadow) = self.index.shadow_of(g) {
                return self.rewrite_direct_store(module, id, value, shadow);
            }
        }

        let producer = addr
            .as_inst()
            .and_then(|i| module.inst(i).map(|inst| (i, inst.kind.clone())));
        match producer {
            Some((inner, InstKind::Load { .. })) => {
                self.rewrite_store_via_load(module, id, value, inner)
            }
            Some((gep, InstKind::Gep { base, indices })) => {
                self.rewrite_store_via_gep(module, id, value, gep, base, indices)
            }
            _ => {
                self.stats.accesses += 1;
                self.stats.candidates += 1;
                Ok(())
            }
        }
    }

    /// Destination is a shadowed global: record the identity of whatever is
    /// being stored into the tag variable
    fn rewrite_direct_store(
        &mut self,
        module: &mut Module,
        id: InstId,
        value: ValueRef,
        shadow: GlobalId,
    ) -> Result<()> {
        self.stats.accesses += 1;
        self.stats.candidates += 1;
        let idx = self.stored_identity(module, &value);
        let resolved = if idx > 0 {
            ValueRef::Const(Constant::int32(idx))
        } else {
            self.replacement_of(&value)
                .unwrap_or(ValueRef::Const(Constant::int32(0)))
        };
        debug!(tag = %module.global(shadow).name, index = idx, "direct store rewritten to tag store");
        emit_store(module, id, resolved, ValueRef::Global(shadow))?;
        self.removals.push(id);
        Ok(())
    }

    /// Store through a loaded pointer: enumerate scalar candidates
    fn rewrite_store_via_load(
        &mut self,
        module: &mut Module,
        id: InstId,
        value: ValueRef,
        inner: InstId,
    ) -> Result<()> {
        self.stats.accesses += 1;
        let tag = self.by_id.get(&inner).cloned();
        let set = self.table.of_inst(inner).to_vec();
        if set.is_empty() {
            return Ok(());
        }

        let store_name = module.inst(id).map(|i| i.name.clone()).unwrap_or_default();
        let mut chain = Vec::new();
        for &cand in &set {
            let storage = self.index.storage_of(cand);
            if module.global(storage).ty.is_aggregate() {
                continue;
            }
            self.stats.candidates += 1;
            if self.is_self_comparison(module, tag.as_ref(), storage) {
                continue;
            }
            chain.push(cand);
        }

        let resolved = self.resolve_stored_value(module, &value);

        if set.len() == 1 {
            if let Some(&cand) = chain.first() {
                let storage = self.index.storage_of(cand);
                emit_store(module, id, resolved, ValueRef::Global(storage))?;
            }
        } else if !chain.is_empty() {
            let Some(tag) = tag else {
                warn!(store = %store_name,
                      "address producer has no replacement tag; store left untouched");
                return Ok(());
            };
            for &cand in &chain {
                let storage = self.index.storage_of(cand);
                let name = module.global(storage).name.clone();
                let cur = emit_load(
                    module,
                    id,
                    format!("{}{}_load", store_name, name),
                    ValueRef::Global(storage),
                )?;
                let idx = Constant::int32(self.index.index_of(cand));
                let cmp = emit_icmp_eq(
                    module,
                    id,
                    format!("{}{}_cmp", store_name, name),
                    tag.clone(),
                    ValueRef::Const(idx),
                )?;
                let sel = emit_select(
                    module,
                    id,
                    format!("{}{}_select", store_name, name),
                    cmp,
                    resolved.clone(),
                    cur,
                )?;
                emit_store(module, id, sel, ValueRef::Global(storage))?;
            }
        }

        self.removals.push(id);
        Ok(())
    }

    /// Store through a single-index address computation: enumerate aggregate
    /// candidates, read-modify-write each one
    fn rewrite_store_via_gep(
        &mut self,
        module: &mut Module,
        id: InstId,
        value: ValueRef,
        gep: InstId,
        base: ValueRef,
        indices: Vec<ValueRef>,
    ) -> Result<()> {
        if indices.len() > 1 {
            debug!(indices = indices.len(), "multi-level address computation left untouched");
            return Ok(());
        }
        let tag = self.by_id.get(&gep_base_inst(&base)).cloned();
        let set = self.table.of_inst(gep).to_vec();
        self.stats.accesses += 1;
        if set.is_empty() {
            return Ok(());
        }

        let gep_name = module.inst(gep).map(|i| i.name.clone()).unwrap_or_default();
        let chain: Vec<GlobalId> = set
            .iter()
            .copied()
            .filter(|&g| module.global(g).ty.is_aggregate())
            .collect();
        self.stats.candidates += chain.len();

        let resolved = self.replacement_of(&value).unwrap_or_else(|| value.clone());

        let tag = if set.len() > 1 && !chain.is_empty() {
            match tag {
                Some(t) => Some(t),
                None => {
                    warn!(gep = %gep_name,
                          "address producer has no replacement tag; store left untouched");
                    return Ok(());
                }
            }
        } else {
            tag
        };

        for &cand in &chain {
            let gname = module.global(cand).name.clone();
            let new_gep = emit_gep(
                module,
                id,
                format!("{}{}_gep", gep_name, gname),
                ValueRef::Global(cand),
                prefixed_indices(&indices),
            )?;
            if set.len() == 1 {
                emit_store(module, id, value.clone(), new_gep)?;
                break;
            }
            let cur = emit_load(module, id, format!("{}{}_load", gep_name, gname), new_gep.clone())?;
            let idx = Constant::int32(self.index.index_of(cand));
            let cmp = emit_icmp_eq(
                module,
                id,
                format!("{}{}_cmp", gep_name, gname),
                tag.clone().unwrap_or_else(|| ValueRef::Const(Constant::int32(0))),
                ValueRef::Const(idx),
            )?;
            let sel = emit_select(
                module,
                id,
                format!("{}{}_select", gep_name, gname),
                cmp,
                resolved.clone(),
                cur,
            )?;
            emit_store(module, id, sel, new_gep)?;
        }

        self.removals.push(id);
        Ok(())
    }

    // ─────────────────────── value resolution ───────────────────────

    /// Identity index of a stored value, 0 when it has none
    ///
    /// Resolution order: function argument (first candidate of its resolved
    /// set), address computation (identity of its base), then the value's own
    /// identity if it is an enumerable global.
    fn stored_identity(&self, module: &Module, value: &ValueRef) -> i64 {
        match value {
            ValueRef::Arg(arg) => self
                .table
                .of_arg(*arg)
                .first()
                .map(|&g| self.index.index_of(g))
                .unwrap_or(0),
            ValueRef::Inst(i) => match module.inst(*i).map(|inst| &inst.kind) {
                Some(InstKind::Gep { base, .. }) => base
                    .as_global()
                    .map(|g| self.index.index_of(g))
                    .unwrap_or(0),
                _ => 0,
            },
            ValueRef::Global(g) => self.index.index_of(*g),
            ValueRef::Const(_) => 0,
        }
    }

    /// The value a rewritten store writes: an identity constant when the
    /// stored value has one, otherwise its replacement, otherwise itself
    fn resolve_stored_value(&self, module: &Module, value: &ValueRef) -> ValueRef {
        let idx = self.stored_identity(module, value);
        if idx > 0 {
            ValueRef::Const(Constant::int32(idx))
        } else {
            self.replacement_of(value).unwrap_or_else(|| value.clone())
        }
    }

    fn replacement_of(&self, value: &ValueRef) -> Option<ValueRef> {
        value.as_inst().and_then(|i| self.by_id.get(&i)).cloned()
    }

    /// Comparing a candidate against the load it was itself read from is
    /// redundant
    fn is_self_comparison(
        &self,
        module: &Module,
        tag: Option<&ValueRef>,
        storage: GlobalId,
    ) -> bool {
        let Some(ValueRef::Inst(i)) = tag else {
            return false;
        };
        matches!(
            module.inst(*i).map(|inst| &inst.kind),
            Some(InstKind::Load {
                addr: ValueRef::Global(g)
            }) if *g == storage
        )
    }

    fn record(&mut self, orig: InstId, replacement: ValueRef) {
        self.by_id.insert(orig, replacement.clone());
        self.replacements.push((orig, replacement));
    }
}

/// Index list of a synthesized address computation: one zero per original
/// index (32-bit when the index is a run-time value, 64-bit when literal),
/// then the original indices
fn prefixed_indices(indices: &[ValueRef]) -> Vec<ValueRef> {
    let mut out = Vec::with_capacity(indices.len() * 2);
    for idx in indices {
        out.push(if matches!(idx, ValueRef::Inst(_)) {
            ValueRef::Const(Constant::int32(0))
        } else {
            ValueRef::Const(Constant::int64(0))
        });
    }
    out.extend(indices.iter().cloned());
    out
}

/// The instruction behind a gep base, or a sentinel that matches nothing
fn gep_base_inst(base: &ValueRef) -> InstId {
    base.as_inst().unwrap_or(InstId(u32::MAX))
}
