//! Primitive implementation of 5 stages.
//! Pure combinational pieces shared by the pipelined and single-cycle models.

use crate::alu::{alu, ALUSrc};
use crate::instruction::Instruction;
use crate::memory::DataMemory;
use crate::memory::InstructionMemory;
use crate::register_file::RegisterFile;

/// IF: Fetch the instruction from memory
pub fn instruction_fetch(pc: u32, imem: &InstructionMemory) -> u32 {
    imem.value_at(pc)
}

/// ID: Instruction decode
pub fn instruction_decode(raw_inst: u32) -> Instruction {
    Instruction::new(raw_inst)
}

/// ID: Register read through both ports
pub fn register_read(inst: &Instruction, gpr: &RegisterFile) -> (u32, u32) {
    (gpr.read(inst.attributes.rs), gpr.read(inst.attributes.rt))
}

/// ID: Next PC selection.
/// `pc` is the address being fetched alongside this decode;
/// targets are relative to `pc + 4`. Jump wins over branch.
pub fn next_pc(inst: &Instruction, pc: u32, equal: bool) -> u32 {
    let sequential = pc.wrapping_add(4);
    let branch_addr = sequential.wrapping_add(inst.attributes.imm << 2);
    let jump_addr = (sequential & 0xf000_0000) | (inst.attributes.target << 2);

    let next = match inst.controls.branch && equal {
        true => branch_addr,
        false => sequential,
    };
    match inst.controls.jump {
        true => jump_addr,
        false => next,
    }
}

/// EX: Compute stuff
pub fn execute(inst: &Instruction, op1: u32, op2: u32) -> u32 {
    use ALUSrc::*;
    let op2 = match inst.controls.alu_src {
        REG => op2,
        IMM => inst.attributes.imm,
    };
    alu(inst.controls.alu_op, op1, op2)
}

/// EX: Register write destination multiplexor
pub fn destination(inst: &Instruction) -> u32 {
    match inst.controls.reg_dst {
        true => inst.attributes.rd,
        false => inst.attributes.rt,
    }
}

/// MEM: Access memory and select the write-back value
pub fn memory_access(
    inst: &Instruction,
    dmem: &mut DataMemory,
    exec_result: u32,
    store_data: u32,
) -> u32 {
    let controls = inst.controls;
    let mem_data = dmem.read(exec_result, controls.mem_read);
    dmem.write(exec_result, store_data, controls.mem_write);

    match controls.mem_to_reg {
        true => mem_data,
        false => exec_result,
    }
}

/// WB: Write stuff back to the selected register
pub fn write_back(
    inst: &Instruction,
    gpr: &mut RegisterFile,
    reg_num: u32,
    wb_result: u32,
) {
    gpr.write(reg_num, wb_result, inst.controls.reg_write);
}

#[cfg(test)]
mod tests {
    use super::*;

    // beq $0, $0, +2
    const BEQ_TAKEN: u32 = 0x1000_0002;

    #[test]
    fn test_next_pc_sequential() {
        let add = Instruction::new(0x0022_1820);
        assert_eq!(next_pc(&add, 0x40, true), 0x44);
    }

    #[test]
    fn test_next_pc_branch() {
        let beq = Instruction::new(BEQ_TAKEN);
        assert_eq!(next_pc(&beq, 0x40, true), 0x44 + 8);
        assert_eq!(next_pc(&beq, 0x40, false), 0x44);

        // beq $0, $0, -4
        let back = Instruction::new(0x1000_fffc);
        assert_eq!(next_pc(&back, 0x40, true), 0x44 - 16);
    }

    #[test]
    fn test_next_pc_jump() {
        // j 0x40 (word target 0x10)
        let j = Instruction::new(0x0800_0010);
        assert_eq!(next_pc(&j, 0x100, false), 0x40);
        // Upper bits come from pc + 4
        assert_eq!(next_pc(&j, 0x3fff_fffc, false), 0x4000_0040);
    }

    #[test]
    fn test_jump_beats_branch() {
        // A word that asks for both cannot be decoded,
        // so force the control lines directly.
        let mut inst = Instruction::new(0x0800_0010);
        inst.controls.branch = true;
        inst.attributes.imm = 2;
        assert_eq!(next_pc(&inst, 0x100, true), 0x40);
    }

    #[test]
    fn test_execute_immediate() {
        // lw $5, -4($1)
        let lw = Instruction::new(0x8c25_fffc);
        assert_eq!(execute(&lw, 104, 0xdead), 100);
        assert_eq!(destination(&lw), 5);
    }

    #[test]
    fn test_memory_access() {
        let mut dmem = DataMemory::make();
        // sw $2, 100($0)
        let sw = Instruction::new(0xac02_0064);
        assert_eq!(memory_access(&sw, &mut dmem, 100, 0x77), 100);
        assert_eq!(dmem.read(100, true), 0x77);

        // lw $5, 100($0)
        let lw = Instruction::new(0x8c05_0064);
        assert_eq!(memory_access(&lw, &mut dmem, 100, 0), 0x77);
    }

    #[test]
    fn test_write_back() {
        let mut gpr = RegisterFile::new();
        let add = Instruction::new(0x0022_1820);
        write_back(&add, &mut gpr, 3, 12);
        assert_eq!(gpr.read(3), 12);

        let sw = Instruction::new(0xac02_0064);
        write_back(&sw, &mut gpr, 2, 99);
        assert_eq!(gpr.read(2), 0);
    }
}
