//! Global identity indexing and shadow tag creation

mod indexer;

pub use indexer::{GlobalIndex, GlobalIndexer, SHADOW_SUFFIX};
