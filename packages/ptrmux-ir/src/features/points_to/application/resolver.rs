//! Points-to resolution
//!
//! Two strategies, chosen once per run. Conservative resolution assigns every
//! access instruction the full candidate list (semantics-preserving, maximally
//! branchy). Fact-based resolution scans the external database per
//! instruction and per function argument: first matching record wins, the
//! listed names are resolved against enumerable globals by their rendered
//! spelling, and unknown names are silently dropped.

use tracing::debug;

use crate::features::global_index::GlobalIndex;
use crate::features::points_to::domain::{FactKind, PointsToTable};
use crate::features::points_to::ports::FactSource;
use crate::shared::models::{ArgRef, GlobalId, InstKind, Module, ValueRef};

/// Resolves points-to sets for one run
pub struct PointsToResolver<'a> {
    index: &'a GlobalIndex,
    table: PointsToTable,
}

impl<'a> PointsToResolver<'a> {
    pub fn new(index: &'a GlobalIndex) -> Self {
        Self {
            index,
            table: PointsToTable::new(),
        }
    }

    /// Assign every load, store, and address computation the full candidate
    /// list
    pub fn resolve_conservative(mut self, module: &Module) -> PointsToTable {
        let full: Vec<GlobalId> = self.index.candidates().to_vec();
        for (_, func) in module.functions() {
            for block in &func.blocks {
                for &id in &block.insts {
                    let Some(inst) = module.inst(id) else { continue };
                    if inst.is_load() || inst.is_store() || inst.is_gep() {
                        self.table.set_inst(id, full.clone());
                    }
                }
            }
        }
        self.table
    }

    /// Resolve from the fact database; instructions whose set is already
    /// non-empty are skipped
    pub fn resolve_from_facts(mut self, module: &Module, source: &dyn FactSource) -> PointsToTable {
        for (fid, func) in module.functions() {
            for position in 0..func.params.len() {
                let arg = ArgRef {
                    func: fid,
                    index: position as u32,
                };
                let label = module.operand_label(&ValueRef::Arg(arg));
                let record = source.first_match(&func.name, FactKind::Argument, &[label.as_str()]);
                if let Some(record) = record {
                    if record.count > 0 {
                        let set = self.resolve_targets(module, &record.targets);
                        if !set.is_empty() {
                            self.table.set_arg(arg, set);
                        }
                    }
                }
            }

            for block in &func.blocks {
                for &id in &block.insts {
                    let Some(inst) = module.inst(id) else { continue };
                    if self.table.is_resolved(id) {
                        continue;
                    }
                    let query = match &inst.kind {
                        InstKind::Load { addr } => Some((FactKind::Load, vec![
                            module.operand_label(&ValueRef::Inst(id)),
                            module.operand_label(addr),
                        ])),
                        InstKind::Store { value, addr } => Some((FactKind::Store, vec![
                            module.operand_label(value),
                            module.operand_label(addr),
                        ])),
                        InstKind::Gep { .. } => Some((FactKind::AddressComp, vec![
                            module.operand_label(&ValueRef::Inst(id)),
                        ])),
                        _ => None,
                    };
                    let Some((kind, key)) = query else { continue };
                    let key: Vec<&str> = key.iter().map(String::as_str).collect();
                    if let Some(record) = source.first_match(&func.name, kind, &key) {
                        if record.count > 0 {
                            let set = self.resolve_targets(module, &record.targets);
                            if !set.is_empty() {
                                self.table.set_inst(id, set);
                            }
                        }
                    }
                }
            }
        }
        self.table
    }

    /// Resolve fact target names against enumerable globals, preserving
    /// order; names matching nothing are dropped
    fn resolve_targets(&self, module: &Module, names: &[String]) -> Vec<GlobalId> {
        let mut set = Vec::new();
        for name in names {
            let mut matched = false;
            for &g in self.index.candidates() {
                if module.operand_label(&ValueRef::Global(g)) == *name {
                    set.push(g);
                    matched = true;
                }
            }
            if !matched {
                debug!(name = %name, "fact target names no enumerable global; dropped");
            }
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::global_index::GlobalIndexer;
    use crate::features::points_to::infrastructure::FactDatabase;
    use crate::shared::models::{
        FunctionBuilder, GlobalVariable, Linkage, Module, Type,
    };

    fn fixture() -> (Module, GlobalIndex, crate::shared::models::InstId) {
        let mut m = Module::new("m");
        let a = m.add_global(GlobalVariable::new("a", Type::Int32, Linkage::External));
        m.add_global(GlobalVariable::new("b", Type::Int32, Linkage::External));
        let index = GlobalIndexer::new().run(&mut m);

        let mut f = FunctionBuilder::new(&mut m, "main");
        let v = f.load("v", ValueRef::Global(a));
        let load_id = v.as_inst().unwrap();
        f.store(v, ValueRef::Global(a));
        (m, index, load_id)
    }

    #[test]
    fn test_conservative_assigns_full_list() {
        let (m, index, load_id) = fixture();
        let table = PointsToResolver::new(&index).resolve_conservative(&m);
        assert_eq!(table.of_inst(load_id), index.candidates());
        assert_eq!(table.resolved_instructions(), 2);
    }

    #[test]
    fn test_facts_resolve_by_rendered_label() {
        let (m, index, load_id) = fixture();
        let db = FactDatabase::parse("main:load:%v:@a:1:@b\n").unwrap();
        let table = PointsToResolver::new(&index).resolve_from_facts(&m, &db);
        let b = m.global_by_name("b").unwrap();
        assert_eq!(table.of_inst(load_id), &[b]);
    }

    #[test]
    fn test_unknown_target_names_are_dropped() {
        let (m, index, load_id) = fixture();
        let db = FactDatabase::parse("main:load:%v:@a:2:@zzz:@b\n").unwrap();
        let table = PointsToResolver::new(&index).resolve_from_facts(&m, &db);
        let b = m.global_by_name("b").unwrap();
        assert_eq!(table.of_inst(load_id), &[b]);
    }

    #[test]
    fn test_zero_count_leaves_set_empty() {
        let (m, index, load_id) = fixture();
        let db = FactDatabase::parse("main:load:%v:@a:0\n").unwrap();
        let table = PointsToResolver::new(&index).resolve_from_facts(&m, &db);
        assert!(table.of_inst(load_id).is_empty());
    }

    #[test]
    fn test_wrong_function_does_not_match() {
        let (m, index, load_id) = fixture();
        let db = FactDatabase::parse("other:load:%v:@a:1:@b\n").unwrap();
        let table = PointsToResolver::new(&index).resolve_from_facts(&m, &db);
        assert!(table.of_inst(load_id).is_empty());
    }

    #[test]
    fn test_argument_facts_bind_to_arguments() {
        let mut m = Module::new("m");
        m.add_global(GlobalVariable::new("a", Type::Int32, Linkage::External));
        let index = GlobalIndexer::new().run(&mut m);

        let mut f = FunctionBuilder::new(&mut m, "main");
        let _p = f.param("p", Type::Int32.pointer_to());
        let fid = f.func();

        let db = FactDatabase::parse("main:aargument:%p:1:@a\n").unwrap();
        let table = PointsToResolver::new(&index).resolve_from_facts(&m, &db);
        let arg = ArgRef { func: fid, index: 0 };
        let a = m.global_by_name("a").unwrap();
        assert_eq!(table.of_arg(arg), &[a]);
    }
}
