pub mod alu;
pub mod cpu;
pub mod flags;
pub mod instruction;
pub mod loader;
pub mod memory;
pub mod register_file;
pub mod run_wrapper;

pub mod stages_simple;

pub mod pipelined;
pub mod single_cycle;

pub mod dump;
pub mod trace;

pub mod error;
