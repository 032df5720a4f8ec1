//! Pipeline state
use std::fmt;

use crate::instruction::Function;
use crate::instruction::Instruction;
use crate::instruction::NOP;

/// Pipeline state = 4 pipeline registers.
/// The engine keeps one of these as the latched output sides and
/// builds a fresh one as the input sides every cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PipelineState {
    pub if_id: IFIDRegister,
    pub id_ex: IDEXRegister,
    pub ex_mem: EXMEMRegister,
    pub mem_wb: MEMWBRegister,
}

/// Reason for holding decode and fetch for a cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hazard {
    /// A load in EX produces a source of the instruction in ID
    LoadUse { reg: u32 },
    /// A branch in ID compares a register the instruction in EX produces
    BranchOnExecute { reg: u32 },
    /// A branch in ID compares a register a load in MEM produces
    BranchOnLoad { reg: u32 },
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hazard::LoadUse { reg } => write!(f, "load-use R{:02x}", reg),
            Hazard::BranchOnExecute { reg } => {
                write!(f, "branch-on-execute R{:02x}", reg)
            }
            Hazard::BranchOnLoad { reg } => {
                write!(f, "branch-on-load R{:02x}", reg)
            }
        }
    }
}

/// Whether `producer` writes a non-zero register that `inst` reads,
/// returning that register
fn produces_source(producer: Option<u32>, inst: &Instruction) -> Option<u32> {
    let reg = producer.filter(|&reg| reg != 0)?;
    let attributes = inst.attributes;
    let hit = (inst.reads_rs() && attributes.rs == reg)
        || (inst.reads_rt() && attributes.rt == reg);
    hit.then_some(reg)
}

impl PipelineState {
    /// Hazards forwarding cannot resolve.
    /// Only consulted under the interlock policy.
    pub fn hazard(&self) -> Option<Hazard> {
        let decoding = Instruction::new(self.if_id.raw_inst);
        let executing = &self.id_ex.inst;

        if executing.controls.mem_read {
            if let Some(reg) =
                produces_source(executing.destination(), &decoding)
            {
                return Some(Hazard::LoadUse { reg });
            }
        }

        if decoding.function != Function::BEQ {
            return None;
        }

        if let Some(reg) = produces_source(executing.destination(), &decoding) {
            return Some(Hazard::BranchOnExecute { reg });
        }

        let in_memory = &self.ex_mem.inst;
        if in_memory.controls.mem_read && in_memory.controls.reg_write {
            if let Some(reg) =
                produces_source(Some(self.ex_mem.reg_num), &decoding)
            {
                return Some(Hazard::BranchOnLoad { reg });
            }
        }

        None
    }

    /// Operand 1 (rs) can be forwarded from the instruction in MEM
    pub fn ex_mem_forward_rs(&self) -> bool {
        self.ex_mem_writes(self.id_ex.inst.attributes.rs)
    }

    /// Operand 2 (rt) can be forwarded from the instruction in MEM
    pub fn ex_mem_forward_rt(&self) -> bool {
        self.ex_mem_writes(self.id_ex.inst.attributes.rt)
    }

    /// Operand 1 (rs) can be forwarded from the instruction in WB.
    /// Precondition: ex_mem_forward_rs is false
    pub fn mem_wb_forward_rs(&self) -> bool {
        self.mem_wb_writes(self.id_ex.inst.attributes.rs)
    }

    /// Operand 2 (rt) can be forwarded from the instruction in WB.
    /// Precondition: ex_mem_forward_rt is false
    pub fn mem_wb_forward_rt(&self) -> bool {
        self.mem_wb_writes(self.id_ex.inst.attributes.rt)
    }

    /// Equality unit: rs of the decoding instruction is
    /// produced by the instruction in MEM
    pub fn equality_forward_rs(&self, inst: &Instruction) -> bool {
        self.ex_mem_writes(inst.attributes.rs)
    }

    /// Equality unit: rt of the decoding instruction is
    /// produced by the instruction in MEM
    pub fn equality_forward_rt(&self, inst: &Instruction) -> bool {
        self.ex_mem_writes(inst.attributes.rt)
    }

    fn ex_mem_writes(&self, reg: u32) -> bool {
        reg != 0
            && self.ex_mem.inst.controls.reg_write
            && self.ex_mem.reg_num == reg
    }

    fn mem_wb_writes(&self, reg: u32) -> bool {
        reg != 0
            && self.mem_wb.inst.controls.reg_write
            && self.mem_wb.reg_num == reg
    }
}

/// IF/ID register
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IFIDRegister {
    /// Raw instruction
    pub raw_inst: u32,
}

impl Default for IFIDRegister {
    fn default() -> Self {
        Self { raw_inst: NOP }
    }
}

/// ID/EX register
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IDEXRegister {
    /// Wrapped instruction, carrying fields and control signals
    pub inst: Instruction,

    /// Register value of rs, as read in ID
    pub rs_data: u32,
    /// Register value of rt, as read in ID
    pub rt_data: u32,

    /// Address fetched next; doubles as the program counter
    pub next_pc: u32,
}

impl IDEXRegister {
    /// An empty slot that keeps the program counter where it is
    pub fn bubble(next_pc: u32) -> Self {
        Self { next_pc, ..Default::default() }
    }
}

/// EX/MEM register
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EXMEMRegister {
    /// Wrapped instruction
    pub inst: Instruction,

    /// Execution result
    pub alu_result: u32,

    /// Forwarded rt value, stored by SW
    pub rt_data: u32,

    /// Destination register index
    pub reg_num: u32,
}

/// MEM/WB register
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MEMWBRegister {
    /// Wrapped instruction
    pub inst: Instruction,

    /// Destination register index
    pub reg_num: u32,

    /// Actual write back result,
    /// which is computed during the MEM stage
    pub wb_result: u32,
}
