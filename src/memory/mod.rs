//! Memory structure
//!
//! Two flat, fixed-capacity stores: one for instructions and one for data.
//! Neither ever fails; accesses outside the capacity read 0 and drop writes.

pub mod data;
pub mod instruction;

pub use data::DataMemory;
pub use instruction::InstructionMemory;

/// Capacity of each store in bytes
pub const MEMORY_SIZE: usize = 2048;

/// Word width in bytes
pub const WORD_SIZE: usize = 4;
