//! ALU implementation

/// Performs an atomic ALU operation.
/// All arithmetic wraps in two's complement.
pub fn alu(op: ALUOp, op1: u32, op2: u32) -> u32 {
    match op {
        ALUOp::AND => op1 & op2,
        ALUOp::OR => op1 | op2,
        ALUOp::ADD => op1.wrapping_add(op2),
        ALUOp::SUB => op1.wrapping_sub(op2),
        // Unsigned comparison, like the reference datapath
        ALUOp::SLT => (op1 < op2) as u32,
        ALUOp::NOR => !(op1 | op2),
        ALUOp::Invalid => 0,
    }
}

/// Selector for ALU src2 input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ALUSrc {
    // From register
    #[default]
    REG,
    // From sign-extended immediate
    IMM,
}

/// Coarse operation class derived from the opcode,
/// refined into an [`ALUOp`] by the ALU control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ALUClass {
    LoadStore,
    Branch,
    RType,
    Invalid,
}

/// ALU control codes. The discriminants are the 4-bit control lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ALUOp {
    AND = 0x0,
    OR = 0x1,
    ADD = 0x2,
    SUB = 0x6,
    SLT = 0x7,
    NOR = 0xc,
    /// No defined operation
    #[default]
    Invalid = 0xf,
}

impl ALUOp {
    /// Decodes a 4-bit control value; unknown codes map to `Invalid`
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            0x0 => ALUOp::AND,
            0x1 => ALUOp::OR,
            0x2 => ALUOp::ADD,
            0x6 => ALUOp::SUB,
            0x7 => ALUOp::SLT,
            0xc => ALUOp::NOR,
            _ => ALUOp::Invalid,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ALUOp::AND, 0b1100, 0b1010, 0b1000)]
    #[case(ALUOp::OR, 0b1100, 0b1010, 0b1110)]
    #[case(ALUOp::ADD, 5, 7, 12)]
    #[case(ALUOp::ADD, u32::MAX, 1, 0)]
    #[case(ALUOp::SUB, 5, 7, (-2i32) as u32)]
    #[case(ALUOp::SLT, 3, 4, 1)]
    #[case(ALUOp::SLT, 4, 4, 0)]
    #[case(ALUOp::NOR, 0, 0, u32::MAX)]
    #[case(ALUOp::Invalid, 123, 456, 0)]
    fn test_alu(
        #[case] op: ALUOp,
        #[case] op1: u32,
        #[case] op2: u32,
        #[case] expected: u32,
    ) {
        assert_eq!(alu(op, op1, op2), expected);
    }

    #[test]
    fn test_slt_is_unsigned() {
        // -1 is the largest unsigned value
        assert_eq!(alu(ALUOp::SLT, (-1i32) as u32, 1), 0);
        assert_eq!(alu(ALUOp::SLT, 1, (-1i32) as u32), 1);
    }

    #[test]
    fn test_from_bits() {
        for op in [
            ALUOp::AND,
            ALUOp::OR,
            ALUOp::ADD,
            ALUOp::SUB,
            ALUOp::SLT,
            ALUOp::NOR,
            ALUOp::Invalid,
        ] {
            assert_eq!(ALUOp::from_bits(op.bits()), op);
        }
        assert_eq!(ALUOp::from_bits(0x3), ALUOp::Invalid);
    }
}
