//! Function construction helper
//!
//! Appends instructions to a block and hands back `ValueRef`s, so host-side
//! code (and tests) can assemble a module without touching arena ids.

use super::function::{BasicBlock, Function, Parameter};
use super::instruction::{InstKind, Instruction};
use super::module::Module;
use super::types::Type;
use super::value::{ArgRef, FuncId, InstId, ValueRef};

/// Builder that appends instructions to the current block of one function
pub struct FunctionBuilder<'m> {
    module: &'m mut Module,
    func: FuncId,
    block: usize,
}

impl<'m> FunctionBuilder<'m> {
    /// Create a function with an `entry` block and position the builder on it
    pub fn new(module: &'m mut Module, name: impl Into<String>) -> Self {
        let mut func = Function::new(name);
        func.blocks.push(BasicBlock::new("entry"));
        let func = module.add_function(func);
        Self {
            module,
            func,
            block: 0,
        }
    }

    /// Declare a parameter and return a reference to it
    pub fn param(&mut self, name: impl Into<String>, ty: Type) -> ValueRef {
        let f = self.module.function_mut(self.func);
        f.params.push(Parameter {
            name: name.into(),
            ty,
        });
        ValueRef::Arg(ArgRef {
            func: self.func,
            index: (self.module.function(self.func).params.len() - 1) as u32,
        })
    }

    /// Open a new block and position the builder on it
    pub fn block(&mut self, label: impl Into<String>) -> usize {
        let f = self.module.function_mut(self.func);
        f.blocks.push(BasicBlock::new(label));
        self.block = f.blocks.len() - 1;
        self.block
    }

    pub fn load(&mut self, name: impl Into<String>, addr: ValueRef) -> ValueRef {
        self.named(name, InstKind::Load { addr })
    }

    pub fn store(&mut self, value: ValueRef, addr: ValueRef) -> InstId {
        self.push(Instruction::unnamed(InstKind::Store { value, addr }))
    }

    pub fn gep(
        &mut self,
        name: impl Into<String>,
        base: ValueRef,
        indices: Vec<ValueRef>,
    ) -> ValueRef {
        self.named(name, InstKind::Gep { base, indices })
    }

    pub fn icmp_eq(&mut self, name: impl Into<String>, lhs: ValueRef, rhs: ValueRef) -> ValueRef {
        self.named(name, InstKind::ICmpEq { lhs, rhs })
    }

    pub fn select(
        &mut self,
        name: impl Into<String>,
        cond: ValueRef,
        on_true: ValueRef,
        on_false: ValueRef,
    ) -> ValueRef {
        self.named(name, InstKind::Select {
            cond,
            on_true,
            on_false,
        })
    }

    /// Any other instruction, by mnemonic
    pub fn opaque(
        &mut self,
        name: impl Into<String>,
        op: impl Into<String>,
        operands: Vec<ValueRef>,
    ) -> ValueRef {
        self.named(name, InstKind::Opaque {
            op: op.into(),
            operands,
        })
    }

    /// The function being built
    pub fn func(&self) -> FuncId {
        self.func
    }

    fn named(&mut self, name: impl Into<String>, kind: InstKind) -> ValueRef {
        ValueRef::Inst(self.push(Instruction::new(name, kind)))
    }

    fn push(&mut self, inst: Instruction) -> InstId {
        self.module.push_inst(self.func, self.block, inst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::models::global::{GlobalVariable, Linkage};

    #[test]
    fn test_builder_appends_in_order() {
        let mut m = Module::new("m");
        let g = m.add_global(GlobalVariable::new("g", Type::Int32, Linkage::External));

        let mut b = FunctionBuilder::new(&mut m, "f");
        let v = b.load("v", ValueRef::Global(g));
        b.store(v.clone(), ValueRef::Global(g));
        let fid = b.func();

        let insts = &m.function(fid).blocks[0].insts;
        assert_eq!(insts.len(), 2);
        assert_eq!(ValueRef::Inst(insts[0]), v);
    }
}
