//! Shared models: the host IR module graph the pass operates on

mod builder;
mod display;
mod function;
mod global;
mod instruction;
mod module;
mod types;
mod value;

pub use builder::FunctionBuilder;
pub use function::{BasicBlock, Function, Parameter};
pub use global::{GlobalVariable, Linkage};
pub use instruction::{InstKind, Instruction};
pub use module::Module;
pub use types::Type;
pub use value::{ArgRef, Constant, FuncId, GlobalId, InstId, ValueRef};
