//! Seam between the resolver and whatever supplies alias facts

use super::domain::{FactKind, FactRecord};

/// Source of alias facts the resolver scans
///
/// `first_match` must honor record order: the first record whose function,
/// kind, and key labels all match wins, and later records are never
/// consulted for that query.
pub trait FactSource {
    fn first_match(&self, function: &str, kind: FactKind, key: &[&str]) -> Option<&FactRecord>;

    /// Whether the source holds no records at all
    fn is_empty(&self) -> bool;
}
