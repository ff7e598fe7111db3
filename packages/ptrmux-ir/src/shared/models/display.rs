//! Operand label rendering
//!
//! The fact database joins records to live IR by the exact textual spelling of
//! operands, so this rendering is a stability contract: `%label` for
//! instruction results and arguments, `@name` for globals, the bare decimal
//! for constants. Unnamed instructions render their arena id.

use super::module::Module;
use super::value::ValueRef;

impl Module {
    /// Render a value the way it is spelled as an operand
    pub fn operand_label(&self, value: &ValueRef) -> String {
        match value {
            ValueRef::Global(id) => format!("@{}", self.global(*id).name),
            ValueRef::Inst(id) => match self.inst(*id) {
                Some(inst) if !inst.name.is_empty() => format!("%{}", inst.name),
                _ => format!("%{}", id.0),
            },
            ValueRef::Arg(arg) => {
                let param = &self.function(arg.func).params[arg.index as usize];
                format!("%{}", param.name)
            }
            ValueRef::Const(c) => c.value.to_string(),
        }
    }
}
