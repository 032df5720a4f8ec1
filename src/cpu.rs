//! CPU state shared by the pipelined and single-cycle implementations

use crate::memory::DataMemory;
use crate::memory::InstructionMemory;
use crate::pipelined::pipeline::Hazard;
use crate::register_file::RegisterFile;

/// CPU state
#[derive(Clone, Default)]
pub struct CPUState {
    /// Program counter
    pub pc: Register,
    /// General purpose registers
    pub gpr: RegisterFile,
    /// Instruction memory
    pub imem: InstructionMemory,
    /// Data memory
    pub dmem: DataMemory,

    /// CPU policy
    pub policy: CPUPolicy,

    /// History of execution
    pub history: CPUHistory,
}

impl CPUState {
    pub fn make(policy: CPUPolicy) -> Self {
        Self { policy, ..Default::default() }
    }

    /// Increments history cycle count
    pub fn update_cycle_count(&mut self, value: u64) {
        self.history.cycle_count += value;
    }

    /// Increments history instruction count
    pub fn update_inst_count(&mut self, value: u64) {
        self.history.inst_count += value;
    }
}

/// A single 32-bit register
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Register {
    /// Current data in the register
    data: u32,
}

impl Register {
    pub fn new(data: u32) -> Self {
        Self { data }
    }

    /// Reads the register
    pub fn read(&self) -> u32 {
        self.data
    }

    /// Writes to register
    pub fn write(&mut self, value: u32) {
        self.data = value;
    }
}

/// Implementation enum
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Implementation {
    SingleCycle,
    #[default]
    Pipelined,
}

/// How the pipeline deals with hazards forwarding cannot cover
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HazardPolicy {
    /// Insert a bubble for load-use and branch-operand hazards
    #[default]
    Interlock,
    /// Forwarding only; stale operands are used as-is
    ForwardOnly,
}

/// CPU policy
#[derive(Clone, Copy, Debug, Default)]
pub struct CPUPolicy {
    pub verbose: bool,
    pub implementation: Implementation,
    pub history: bool,
    pub hazard: HazardPolicy,
}

/// History module
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CPUHistory {
    pub cycle_count: u64,
    /// Instructions that completed write-back, bubbles excluded
    pub inst_count: u64,
    /// Cycles spent stalled on a hazard
    pub stall_count: u64,
    /// ALU operands bypassed from EX/MEM
    pub ex_mem_forward_count: u64,
    /// ALU operands bypassed from MEM/WB
    pub mem_wb_forward_count: u64,
    /// Branch operands bypassed into the equality unit
    pub equality_forward_count: u64,
}

impl CPUHistory {
    /// Cycles per retired instruction
    pub fn cpi(&self) -> Option<f64> {
        (self.inst_count > 0)
            .then(|| self.cycle_count as f64 / self.inst_count as f64)
    }
}

/// Raw instruction words occupying each stage
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StageWords {
    pub pc: u32,
    pub fetch: u32,
    pub decode: u32,
    pub execute: u32,
    pub memory: u32,
    pub write_back: u32,
}

/// A steppable processor model
pub trait Simulator {
    /// Advance by one step: a clock cycle for the pipeline,
    /// one whole instruction for the single-cycle model
    fn step(&mut self);

    fn cpu(&self) -> &CPUState;

    fn cpu_mut(&mut self) -> &mut CPUState;

    /// The words currently in each stage
    fn stage_words(&self) -> StageWords;

    /// Whether the sentinel word has reached completion
    fn halted_on(&self, sentinel: u32) -> bool;

    /// Hazard that stalled the last step, if any
    fn last_stall(&self) -> Option<Hazard> {
        None
    }
}
