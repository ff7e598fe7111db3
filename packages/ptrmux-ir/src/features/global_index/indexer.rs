//! Identity indexing of module globals
//!
//! Assigns a 1-based integer identity to every enumerable global in
//! declaration order (0 is reserved for "not a known global"), and creates
//! one shadow tag variable per enumerable global that stores a pointer. The
//! shadow is an `i32` global named `{original}_index`, initialized to 0; at
//! run time it holds the identity index of whichever target the original
//! pointer currently designates.

use rustc_hash::FxHashMap;
use tracing::debug;

use crate::shared::models::{Constant, GlobalId, GlobalVariable, Linkage, Module, Type};

/// Suffix of shadow tag variable names
pub const SHADOW_SUFFIX: &str = "_index";

/// Identity indices and shadow map for one run
///
/// `order` lists the enumerable globals in declaration order; a global's
/// identity index is its position plus one. Shadows are created after the
/// order is frozen, so they never appear in it.
#[derive(Debug, Clone, Default)]
pub struct GlobalIndex {
    order: Vec<GlobalId>,
    shadows: FxHashMap<GlobalId, GlobalId>,
}

impl GlobalIndex {
    /// Identity index of a global, 0 if it is not indexed
    pub fn index_of(&self, id: GlobalId) -> i64 {
        self.order
            .iter()
            .position(|&g| g == id)
            .map(|p| p as i64 + 1)
            .unwrap_or(0)
    }

    /// The shadow tag variable of a pointer-storing global, if one exists
    #[inline]
    pub fn shadow_of(&self, id: GlobalId) -> Option<GlobalId> {
        self.shadows.get(&id).copied()
    }

    /// The storage location stood up for a candidate: its shadow when it has
    /// one, otherwise the candidate itself
    #[inline]
    pub fn storage_of(&self, id: GlobalId) -> GlobalId {
        self.shadow_of(id).unwrap_or(id)
    }

    /// Enumerable globals in index order
    pub fn candidates(&self) -> &[GlobalId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn shadow_count(&self) -> usize {
        self.shadows.len()
    }
}

/// Builds the [`GlobalIndex`] for a module
#[derive(Debug, Default)]
pub struct GlobalIndexer;

impl GlobalIndexer {
    pub fn new() -> Self {
        Self
    }

    /// Index the module's globals and create shadow tag variables
    ///
    /// Deterministic: re-running on an unmodified module yields identical
    /// indices. The only module mutation is the addition of shadow globals.
    pub fn run(&self, module: &mut Module) -> GlobalIndex {
        let mut index = GlobalIndex::default();

        for (id, gv) in module.globals() {
            if gv.is_enumerable() {
                debug!(global = %gv.name, index = index.order.len() + 1, "indexing global");
                index.order.push(id);
            }
        }

        // Shadow creation walks the same declaration order; each new shadow
        // lands at the end of the global list and stays out of `order`.
        let pointer_holders: Vec<(GlobalId, String)> = module
            .globals()
            .filter(|(_, gv)| gv.is_enumerable() && gv.holds_pointer())
            .map(|(id, gv)| (id, gv.name.clone()))
            .collect();

        for (id, name) in pointer_holders {
            let shadow_name = format!("{}{}", name, SHADOW_SUFFIX);
            debug!(global = %name, shadow = %shadow_name, "creating shadow tag variable");
            let shadow = module.add_global(
                GlobalVariable::new(shadow_name, Type::Int32, Linkage::External)
                    .with_initializer(Constant::int32(0)),
            );
            index.shadows.insert(id, shadow);
        }

        index
    }
}
