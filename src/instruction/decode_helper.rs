//! Decoding helper functions.
//! Field extraction, opcode/funct dispatch and control derivation.

use super::Attributes;
use super::Controls;
use super::Function;
use super::Opcode;
use crate::alu::ALUClass;
use crate::alu::ALUOp;
use crate::alu::ALUSrc;

const OP_RTYPE: u32 = 0x00;
const OP_JMP: u32 = 0x02;
const OP_BEQ: u32 = 0x04;
const OP_LW: u32 = 0x23;
const OP_SW: u32 = 0x2b;

const FUNCT_ADD: u32 = 0x20;
const FUNCT_SUB: u32 = 0x22;
const FUNCT_AND: u32 = 0x24;
const FUNCT_OR: u32 = 0x25;
const FUNCT_SLT: u32 = 0x2a;

/// Bits `start..=end` of `value`, shifted down to bit 0
pub fn bits(value: u32, start: u32, end: u32) -> u32 {
    let width = end - start + 1;
    if width >= 32 {
        return value >> start;
    }
    (value >> start) & ((1 << width) - 1)
}

/// Sign-extends a 16-bit immediate to 32 bits
pub fn sign_extend16(value: u32) -> u32 {
    (value as u16 as i16) as i32 as u32
}

/// Returns the opcode from a raw instruction
pub fn raw_to_opcode(raw_inst: u32) -> Opcode {
    match get_opcode(raw_inst) {
        OP_RTYPE => Opcode::RType,
        OP_JMP => Opcode::Jump,
        OP_BEQ => Opcode::BranchEq,
        OP_LW => Opcode::Load,
        OP_SW => Opcode::Store,
        other => Opcode::Other(other),
    }
}

/// Extracts every positional field
pub fn parse(raw_inst: u32) -> Attributes {
    Attributes {
        opcode: get_opcode(raw_inst),
        rs: get_rs(raw_inst),
        rt: get_rt(raw_inst),
        rd: get_rd(raw_inst),
        funct: get_funct(raw_inst),
        imm: sign_extend16(bits(raw_inst, 0, 15)),
        target: bits(raw_inst, 0, 25),
    }
}

/// Determines the operation; one arm per supported opcode/funct pair
pub fn get_function(opcode: Opcode, funct: u32) -> Function {
    use Function::*;
    match (opcode, funct) {
        (Opcode::RType, FUNCT_ADD) => ADD,
        (Opcode::RType, FUNCT_SUB) => SUB,
        (Opcode::RType, FUNCT_AND) => AND,
        (Opcode::RType, FUNCT_OR) => OR,
        (Opcode::RType, FUNCT_SLT) => SLT,
        (Opcode::Load, _) => LW,
        (Opcode::Store, _) => SW,
        (Opcode::BranchEq, _) => BEQ,
        (Opcode::Jump, _) => J,
        _ => Unimplemented,
    }
}

/// ALU operation class from the opcode
pub fn get_alu_class(opcode: Opcode) -> ALUClass {
    match opcode {
        Opcode::Load | Opcode::Store => ALUClass::LoadStore,
        Opcode::BranchEq => ALUClass::Branch,
        Opcode::RType => ALUClass::RType,
        Opcode::Jump | Opcode::Other(_) => ALUClass::Invalid,
    }
}

/// ALU control from the operation class and funct field
pub fn get_alu_control(class: ALUClass, funct: u32) -> ALUOp {
    match class {
        ALUClass::LoadStore => ALUOp::ADD,
        // Compare by subtraction
        ALUClass::Branch => ALUOp::SUB,
        ALUClass::RType => match funct {
            FUNCT_ADD => ALUOp::ADD,
            FUNCT_SUB => ALUOp::SUB,
            FUNCT_AND => ALUOp::AND,
            FUNCT_OR => ALUOp::OR,
            FUNCT_SLT => ALUOp::SLT,
            _ => ALUOp::Invalid,
        },
        ALUClass::Invalid => ALUOp::Invalid,
    }
}

/// Control signals. Unimplemented words get none of them,
/// so they flow through the pipeline as bubbles.
pub fn get_controls(function: Function, alu_op: ALUOp) -> Controls {
    use Function::*;

    if function == Unimplemented {
        return Controls::default();
    }

    let rtype = matches!(function, ADD | SUB | AND | OR | SLT);
    Controls {
        reg_dst: rtype,
        alu_src: match function {
            LW | SW => ALUSrc::IMM,
            _ => ALUSrc::REG,
        },
        branch: function == BEQ,
        jump: function == J,
        mem_read: function == LW,
        mem_write: function == SW,
        mem_to_reg: function == LW,
        reg_write: rtype || function == LW,
        alu_op,
    }
}

/// Extracts opcode from a raw instruction
fn get_opcode(raw_inst: u32) -> u32 {
    bits(raw_inst, 26, 31)
}

/// Extracts the funct field from a raw instruction
fn get_funct(raw_inst: u32) -> u32 {
    bits(raw_inst, 0, 5)
}

/// Extracts the rs field from a raw instruction
fn get_rs(raw_inst: u32) -> u32 {
    bits(raw_inst, 21, 25)
}

/// Extracts the rt field from a raw instruction
fn get_rt(raw_inst: u32) -> u32 {
    bits(raw_inst, 16, 20)
}

/// Extracts the rd field from a raw instruction
fn get_rd(raw_inst: u32) -> u32 {
    bits(raw_inst, 11, 15)
}
