//! Fact records consumed from the external alias database
//!
//! One record per line, colon-separated:
//!
//! ```text
//! <function>:load:<load-label>:<address-label>:<count>[:<global-name>]*
//! <function>:store:<value-label>:<address-label>:<count>[:<global-name>]*
//! <function>:agep:<result-label>:<base-label>:<count>[:<global-name>]*
//! <function>:aargument:<argument-label>:<count>[:<global-name>]*
//! ```
//!
//! Labels are the exact operand spelling the IR renders; global names carry
//! their `@` sigil. A count of 0 means the analysis had nothing to say.

use serde::{Deserialize, Serialize};

/// The operation a fact record describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FactKind {
    Load,
    Store,
    AddressComp,
    Argument,
}

impl FactKind {
    /// Parse the second field of a fact line
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "load" => Some(FactKind::Load),
            "store" => Some(FactKind::Store),
            "agep" => Some(FactKind::AddressComp),
            "aargument" => Some(FactKind::Argument),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            FactKind::Load => "load",
            FactKind::Store => "store",
            FactKind::AddressComp => "agep",
            FactKind::Argument => "aargument",
        }
    }

    /// Number of label fields a record of this kind carries
    pub fn label_count(&self) -> usize {
        match self {
            FactKind::Load | FactKind::Store | FactKind::AddressComp => 2,
            FactKind::Argument => 1,
        }
    }

    /// Number of leading labels that form the match key
    ///
    /// Address-computation records carry a base label but match on the
    /// result label alone.
    pub fn key_arity(&self) -> usize {
        match self {
            FactKind::Load | FactKind::Store => 2,
            FactKind::AddressComp | FactKind::Argument => 1,
        }
    }
}

/// A single parsed fact line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactRecord {
    /// Enclosing function name
    pub function: String,

    /// Operation kind
    pub kind: FactKind,

    /// Operand labels, in line order
    pub labels: Vec<String>,

    /// Declared candidate count; 0 means no targets follow
    pub count: usize,

    /// Candidate global names (with `@` sigil), in line order
    pub targets: Vec<String>,
}

impl FactRecord {
    /// Whether this record matches a query key
    pub fn matches(&self, function: &str, kind: FactKind, key: &[&str]) -> bool {
        self.kind == kind
            && self.function == function
            && self
                .labels
                .iter()
                .take(kind.key_arity())
                .map(String::as_str)
                .eq(key.iter().copied())
    }
}
