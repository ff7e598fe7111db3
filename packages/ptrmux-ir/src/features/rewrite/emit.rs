//! Instruction emission helpers
//!
//! All synthesized instructions are placed immediately before the access they
//! replace; repeated emissions against the same anchor keep their order.

use crate::errors::Result;
use crate::shared::models::{InstId, InstKind, Instruction, Module, ValueRef};

pub(crate) fn emit_load(
    module: &mut Module,
    anchor: InstId,
    name: String,
    addr: ValueRef,
) -> Result<ValueRef> {
    let id = module.insert_before(anchor, Instruction::new(name, InstKind::Load { addr }))?;
    Ok(ValueRef::Inst(id))
}

pub(crate) fn emit_store(
    module: &mut Module,
    anchor: InstId,
    value: ValueRef,
    addr: ValueRef,
) -> Result<InstId> {
    module.insert_before(anchor, Instruction::unnamed(InstKind::Store { value, addr }))
}

pub(crate) fn emit_gep(
    module: &mut Module,
    anchor: InstId,
    name: String,
    base: ValueRef,
    indices: Vec<ValueRef>,
) -> Result<ValueRef> {
    let id = module.insert_before(anchor, Instruction::new(name, InstKind::Gep { base, indices }))?;
    Ok(ValueRef::Inst(id))
}

pub(crate) fn emit_icmp_eq(
    module: &mut Module,
    anchor: InstId,
    name: String,
    lhs: ValueRef,
    rhs: ValueRef,
) -> Result<ValueRef> {
    let id = module.insert_before(anchor, Instruction::new(name, InstKind::ICmpEq { lhs, rhs }))?;
    Ok(ValueRef::Inst(id))
}

pub(crate) fn emit_select(
    module: &mut Module,
    anchor: InstId,
    name: String,
    cond: ValueRef,
    on_true: ValueRef,
    on_false: ValueRef,
) -> Result<ValueRef> {
    let id = module.insert_before(
        anchor,
        Instruction::new(name, InstKind::Select {
            cond,
            on_true,
            on_false,
        }),
    )?;
    Ok(ValueRef::Inst(id))
}
