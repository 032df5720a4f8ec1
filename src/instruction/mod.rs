//! Instruction representation

use crate::alu::ALUOp;
use crate::alu::ALUSrc;

pub mod decode_helper;

/// The all-zero word. It decodes as an unimplemented R-type
/// and is what an empty pipeline register holds.
pub(crate) const NOP: u32 = 0x0;

/// Wrapped instruction
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Raw representation
    pub raw_inst: u32,
    /// Opcode
    pub opcode: Opcode,
    /// Function
    pub function: Function,
    /// Subfields
    pub attributes: Attributes,
    /// Control signals
    pub controls: Controls,
}

impl Instruction {
    /// Decodes a raw word. Decoding never fails; words outside the
    /// supported subset become `Function::Unimplemented` with every
    /// control signal cleared.
    pub fn new(raw_inst: u32) -> Self {
        let opcode = decode_helper::raw_to_opcode(raw_inst);
        let attributes = decode_helper::parse(raw_inst);
        let function = decode_helper::get_function(opcode, attributes.funct);
        let alu_class = decode_helper::get_alu_class(opcode);
        let alu_op = decode_helper::get_alu_control(alu_class, attributes.funct);
        let controls = decode_helper::get_controls(function, alu_op);

        Self { raw_inst, opcode, function, attributes, controls }
    }

    /// Whether this is the empty-pipeline word
    pub fn is_bubble(&self) -> bool {
        self.raw_inst == NOP
    }

    /// Whether the rs field is a source operand
    pub fn reads_rs(&self) -> bool {
        use Function::*;
        matches!(self.function, ADD | SUB | AND | OR | SLT | LW | SW | BEQ)
    }

    /// Whether the rt field is a source operand
    pub fn reads_rt(&self) -> bool {
        use Function::*;
        matches!(self.function, ADD | SUB | AND | OR | SLT | SW | BEQ)
    }

    /// Register written back by this instruction, if any
    pub fn destination(&self) -> Option<u32> {
        if !self.controls.reg_write {
            return None;
        }
        Some(match self.controls.reg_dst {
            true => self.attributes.rd,
            false => self.attributes.rt,
        })
    }
}

impl Default for Instruction {
    fn default() -> Self {
        Self::new(NOP)
    }
}

/// Primary opcode (bits 26-31)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Opcode {
    /// 0x00
    RType,
    /// 0x02
    Jump,
    /// 0x04
    BranchEq,
    /// 0x23
    Load,
    /// 0x2b
    Store,
    /// Anything else
    Other(u32),
}

/// Decoded operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Function {
    ADD,
    SUB,
    AND,
    OR,
    SLT,
    LW,
    SW,
    BEQ,
    J,
    #[default]
    Unimplemented,
}

/// Positional instruction fields.
/// Every field is extracted regardless of format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    pub opcode: u32,
    pub rs: u32,
    pub rt: u32,
    pub rd: u32,
    pub funct: u32,
    /// Sign-extended 16-bit immediate
    pub imm: u32,
    /// 26-bit jump target
    pub target: u32,
}

/// Control signals
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Controls {
    /// Destination is rd (R-type) instead of rt
    pub reg_dst: bool,
    pub alu_src: ALUSrc,
    pub branch: bool,
    pub jump: bool,
    pub mem_read: bool,
    pub mem_write: bool,
    /// Write back the loaded word instead of the ALU result
    pub mem_to_reg: bool,
    pub reg_write: bool,
    pub alu_op: ALUOp,
}
