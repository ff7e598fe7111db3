//! Shared fixtures for the integration suites
#![allow(dead_code)]

use ptrmux_ir::{
    Constant, FunctionBuilder, GlobalVariable, InstId, InstKind, Instruction, Linkage, Module,
    Type, ValueRef,
};

/// Two scalar data globals and a pointer global:
///
/// ```text
/// @A: i32, @B: i32, @P: i32*
/// main:
///   store @A, @P      ; P = &A
///   %p = load @P
///   %v = load %p      ; double indirection
/// ```
pub fn worked_example() -> Module {
    let mut m = Module::new("worked_example");
    let a = m.add_global(GlobalVariable::new("A", Type::Int32, Linkage::External));
    m.add_global(GlobalVariable::new("B", Type::Int32, Linkage::External));
    let p = m.add_global(GlobalVariable::new(
        "P",
        Type::Int32.pointer_to(),
        Linkage::External,
    ));

    let mut f = FunctionBuilder::new(&mut m, "main");
    f.store(ValueRef::Global(a), ValueRef::Global(p));
    let loaded = f.load("p", ValueRef::Global(p));
    f.load("v", loaded);
    m
}

/// Aggregate candidates behind a pointer:
///
/// ```text
/// @tab: [4 x i32], @arr: [4 x i32], @P: i32*
/// main:
///   %p = load @P
///   %g = gep %p, 3
///   %v = load %g
/// ```
pub fn aggregate_example() -> Module {
    let mut m = Module::new("aggregate_example");
    m.add_global(GlobalVariable::new(
        "tab",
        Type::array_of(Type::Int32, 4),
        Linkage::External,
    ));
    m.add_global(GlobalVariable::new(
        "arr",
        Type::array_of(Type::Int32, 4),
        Linkage::External,
    ));
    let p = m.add_global(GlobalVariable::new(
        "P",
        Type::Int32.pointer_to(),
        Linkage::External,
    ));

    let mut f = FunctionBuilder::new(&mut m, "main");
    let loaded = f.load("p", ValueRef::Global(p));
    let gep = f.gep("g", loaded, vec![ValueRef::Const(Constant::int64(3))]);
    f.load("v", gep);
    m
}

/// All live instructions, in program order
pub fn live(m: &Module) -> Vec<(InstId, Instruction)> {
    m.all_inst_ids()
        .into_iter()
        .filter_map(|id| m.inst(id).map(|i| (id, i.clone())))
        .collect()
}

/// Find a live instruction by SSA label
pub fn by_name(m: &Module, name: &str) -> Option<(InstId, Instruction)> {
    live(m).into_iter().find(|(_, i)| i.name == name)
}

/// Count live instructions matching a predicate
pub fn count_matching(m: &Module, pred: impl Fn(&InstKind) -> bool) -> usize {
    live(m).iter().filter(|(_, i)| pred(&i.kind)).count()
}

/// Stable textual rendering of module contents for determinism checks
pub fn dump(m: &Module) -> String {
    let mut out = String::new();
    for (_, gv) in m.globals() {
        out.push_str(&format!("global {} {:?} {:?}\n", gv.name, gv.ty, gv.initializer));
    }
    for (_, func) in m.functions() {
        out.push_str(&format!("fn {}\n", func.name));
        for block in &func.blocks {
            for &id in &block.insts {
                if let Some(inst) = m.inst(id) {
                    out.push_str(&format!("  {} = {:?}\n", inst.name, inst.kind));
                }
            }
        }
    }
    out
}
