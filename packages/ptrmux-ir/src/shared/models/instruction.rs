//! Instruction model
//!
//! Instructions carry an optional SSA-style label (`name`) and a kind with
//! positional operands. Operand positions follow the usual convention the
//! cleanup rules depend on: a store's value is operand 0 and its address is
//! operand 1.

use serde::{Deserialize, Serialize};

use super::value::ValueRef;

/// Instruction payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstKind {
    /// Read through an address
    Load { addr: ValueRef },

    /// Write a value through an address
    Store { value: ValueRef, addr: ValueRef },

    /// Address computation: base plus an index list
    Gep { base: ValueRef, indices: Vec<ValueRef> },

    /// Integer equality test
    ICmpEq { lhs: ValueRef, rhs: ValueRef },

    /// Two-way multiplexer on a boolean condition
    Select {
        cond: ValueRef,
        on_true: ValueRef,
        on_false: ValueRef,
    },

    /// Any other instruction; participates in use lists and operand
    /// replacement but is never rewritten itself
    Opaque { op: String, operands: Vec<ValueRef> },
}

/// A single instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// SSA label; empty for unnamed (typically stores)
    pub name: String,
    pub kind: InstKind,
}

impl Instruction {
    pub fn new(name: impl Into<String>, kind: InstKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Unnamed instruction (stores)
    pub fn unnamed(kind: InstKind) -> Self {
        Self {
            name: String::new(),
            kind,
        }
    }

    #[inline]
    pub fn is_load(&self) -> bool {
        matches!(self.kind, InstKind::Load { .. })
    }

    #[inline]
    pub fn is_store(&self) -> bool {
        matches!(self.kind, InstKind::Store { .. })
    }

    #[inline]
    pub fn is_gep(&self) -> bool {
        matches!(self.kind, InstKind::Gep { .. })
    }

    /// Operands in positional order
    pub fn operands(&self) -> Vec<&ValueRef> {
        match &self.kind {
            InstKind::Load { addr } => vec![addr],
            InstKind::Store { value, addr } => vec![value, addr],
            InstKind::Gep { base, indices } => {
                let mut ops = vec![base];
                ops.extend(indices.iter());
                ops
            }
            InstKind::ICmpEq { lhs, rhs } => vec![lhs, rhs],
            InstKind::Select {
                cond,
                on_true,
                on_false,
            } => vec![cond, on_true, on_false],
            InstKind::Opaque { operands, .. } => operands.iter().collect(),
        }
    }

    /// Mutable operands in positional order
    pub fn operands_mut(&mut self) -> Vec<&mut ValueRef> {
        match &mut self.kind {
            InstKind::Load { addr } => vec![addr],
            InstKind::Store { value, addr } => vec![value, addr],
            InstKind::Gep { base, indices } => {
                let mut ops = vec![base];
                ops.extend(indices.iter_mut());
                ops
            }
            InstKind::ICmpEq { lhs, rhs } => vec![lhs, rhs],
            InstKind::Select {
                cond,
                on_true,
                on_false,
            } => vec![cond, on_true, on_false],
            InstKind::Opaque { operands, .. } => operands.iter_mut().collect(),
        }
    }
}
