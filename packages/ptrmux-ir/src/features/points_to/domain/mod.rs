//! Points-to domain model

mod fact;
mod table;

pub use fact::{FactKind, FactRecord};
pub use table::PointsToTable;
