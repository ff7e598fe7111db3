//! Value references and constants
//!
//! A `ValueRef` names anything an instruction operand can denote: a global, an
//! instruction result, a function argument, or an integer constant. References
//! are plain ids into the owning `Module`, so they stay valid across edits
//! until the referenced entity is erased.

use serde::{Deserialize, Serialize};

use super::types::Type;

/// Identifier of a global variable within its module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalId(pub u32);

/// Identifier of a function within its module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FuncId(pub u32);

/// Identifier of an instruction in the module arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstId(pub u32);

/// A function argument, addressed by function and parameter position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArgRef {
    pub func: FuncId,
    pub index: u32,
}

/// Integer constant with an explicit type
///
/// The type matters: synthesized address computations distinguish 32-bit and
/// 64-bit zero prefixes depending on whether the original index was a
/// run-time value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Constant {
    pub value: i64,
    pub ty: Type,
}

impl Constant {
    /// 32-bit integer constant
    #[inline]
    pub fn int32(value: i64) -> Self {
        Self {
            value,
            ty: Type::Int32,
        }
    }

    /// 64-bit integer constant
    #[inline]
    pub fn int64(value: i64) -> Self {
        Self {
            value,
            ty: Type::Int64,
        }
    }
}

/// Reference to any operand-capable value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueRef {
    Global(GlobalId),
    Inst(InstId),
    Arg(ArgRef),
    Const(Constant),
}

impl ValueRef {
    /// The instruction id, if this reference denotes an instruction result
    #[inline]
    pub fn as_inst(&self) -> Option<InstId> {
        match self {
            ValueRef::Inst(id) => Some(*id),
            _ => None,
        }
    }

    /// The global id, if this reference denotes a global
    #[inline]
    pub fn as_global(&self) -> Option<GlobalId> {
        match self {
            ValueRef::Global(id) => Some(*id),
            _ => None,
        }
    }

    /// Whether this reference is a constant
    #[inline]
    pub fn is_const(&self) -> bool {
        matches!(self, ValueRef::Const(_))
    }
}

impl From<Constant> for ValueRef {
    fn from(c: Constant) -> Self {
        ValueRef::Const(c)
    }
}
