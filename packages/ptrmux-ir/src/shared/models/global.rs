//! Module-level storage locations

use serde::{Deserialize, Serialize};

use super::types::Type;
use super::value::Constant;

/// Linkage kind of a global variable
///
/// `Private` and `Appending` mark compiler-internal artifacts (string tables,
/// metadata arrays); everything else is ordinary program data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Linkage {
    External,
    Internal,
    Private,
    Appending,
}

/// A module-level storage location
///
/// `ty` is the *stored* type: a global declared `i32` stores an `i32` and its
/// address is an `i32*`. A global whose stored type is itself a pointer is a
/// pointer-to-pointer storage location and gets a shadow tag variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalVariable {
    pub name: String,
    pub ty: Type,
    pub linkage: Linkage,
    pub initializer: Option<Constant>,
}

impl GlobalVariable {
    pub fn new(name: impl Into<String>, ty: Type, linkage: Linkage) -> Self {
        Self {
            name: name.into(),
            ty,
            linkage,
            initializer: None,
        }
    }

    /// Attach an initializer
    pub fn with_initializer(mut self, init: Constant) -> Self {
        self.initializer = Some(init);
        self
    }

    /// Whether this global is ordinary program data, i.e. a candidate for
    /// identity indexing (excludes compiler-private and appending artifacts)
    #[inline]
    pub fn is_enumerable(&self) -> bool {
        !matches!(self.linkage, Linkage::Private | Linkage::Appending)
    }

    /// Whether this global stores a pointer (its address is a `T**`)
    #[inline]
    pub fn holds_pointer(&self) -> bool {
        self.ty.is_pointer()
    }
}
