//! IR type model
//!
//! Minimal structural types for the module graph: integers, pointers, and the
//! two aggregate shapes (arrays and structs). The rewrite engine only ever
//! asks two questions of a type: "is it a pointer?" and "is it an aggregate?".

use serde::{Deserialize, Serialize};
use std::fmt;

/// Structural IR type
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// 32-bit integer (also the tag type of shadow index globals)
    Int32,

    /// 64-bit integer
    Int64,

    /// Pointer to a pointee type
    Pointer(Box<Type>),

    /// Fixed-length array
    Array { elem: Box<Type>, len: u64 },

    /// Named struct with ordered field types
    Struct { name: String, fields: Vec<Type> },
}

impl Type {
    /// Whether this type is a pointer
    #[inline]
    pub fn is_pointer(&self) -> bool {
        matches!(self, Type::Pointer(_))
    }

    /// Whether this type is an aggregate (array or struct)
    #[inline]
    pub fn is_aggregate(&self) -> bool {
        matches!(self, Type::Array { .. } | Type::Struct { .. })
    }

    /// The pointee type, if this is a pointer
    pub fn pointee(&self) -> Option<&Type> {
        match self {
            Type::Pointer(inner) => Some(inner),
            _ => None,
        }
    }

    /// Wrap this type in a pointer
    pub fn pointer_to(self) -> Type {
        Type::Pointer(Box::new(self))
    }

    /// Convenience constructor for an array type
    pub fn array_of(elem: Type, len: u64) -> Type {
        Type::Array {
            elem: Box::new(elem),
            len,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int32 => write!(f, "i32"),
            Type::Int64 => write!(f, "i64"),
            Type::Pointer(inner) => write!(f, "{}*", inner),
            Type::Array { elem, len } => write!(f, "[{} x {}]", len, elem),
            Type::Struct { name, .. } => write!(f, "%{}", name),
        }
    }
}
