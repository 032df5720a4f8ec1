//! Instruction encoders and a small harness shared by the integration tests
#![allow(dead_code)]

use sim_lib::cpu::{CPUPolicy, CPUState, HazardPolicy, Implementation};
use sim_lib::cpu::Simulator;
use sim_lib::pipelined::Pipeline;
use sim_lib::run_wrapper::{self, RunMode};
use sim_lib::single_cycle::SingleCycle;

pub const NOP: u32 = 0;
pub const HALT: u32 = 0xffff_ffff;

fn r_type(funct: u32, rd: u32, rs: u32, rt: u32) -> u32 {
    (rs << 21) | (rt << 16) | (rd << 11) | funct
}

fn i_type(opcode: u32, rs: u32, rt: u32, imm: i16) -> u32 {
    (opcode << 26) | (rs << 21) | (rt << 16) | (imm as u16 as u32)
}

pub fn add(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(0x20, rd, rs, rt)
}

pub fn sub(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(0x22, rd, rs, rt)
}

pub fn and(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(0x24, rd, rs, rt)
}

pub fn or(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(0x25, rd, rs, rt)
}

pub fn slt(rd: u32, rs: u32, rt: u32) -> u32 {
    r_type(0x2a, rd, rs, rt)
}

/// `lw $rt, offset($base)`
pub fn lw(rt: u32, offset: i16, base: u32) -> u32 {
    i_type(0x23, base, rt, offset)
}

/// `sw $rt, offset($base)`
pub fn sw(rt: u32, offset: i16, base: u32) -> u32 {
    i_type(0x2b, base, rt, offset)
}

/// `beq $rs, $rt, offset`, offset in words
pub fn beq(rs: u32, rt: u32, offset: i16) -> u32 {
    i_type(0x04, rs, rt, offset)
}

/// `j target`, target in words
pub fn j(target: u32) -> u32 {
    (0x02 << 26) | (target & 0x03ff_ffff)
}

/// Initial machine state: a program plus preset registers and data words
#[derive(Clone, Default)]
pub struct Machine {
    cpu: CPUState,
}

impl Machine {
    pub fn new(program: &[u32]) -> Self {
        let mut cpu = CPUState::default();
        for (i, &word) in program.iter().enumerate() {
            assert!(cpu.imem.set_at(4 * i as u32, word));
        }
        Self { cpu }
    }

    pub fn reg(mut self, index: u32, value: u32) -> Self {
        self.cpu.gpr.write(index, value, true);
        self
    }

    pub fn word(mut self, address: u32, value: u32) -> Self {
        self.cpu.dmem.write(address, value, true);
        self
    }

    fn with_policy(&self, policy: CPUPolicy) -> CPUState {
        let mut cpu = self.cpu.clone();
        cpu.policy = policy;
        cpu
    }

    pub fn pipeline(&self) -> Pipeline {
        Pipeline::from_cpu(self.with_policy(CPUPolicy::default()))
    }

    pub fn forward_only(&self) -> Pipeline {
        Pipeline::from_cpu(self.with_policy(CPUPolicy {
            hazard: HazardPolicy::ForwardOnly,
            ..Default::default()
        }))
    }

    pub fn single_cycle(&self) -> SingleCycle {
        SingleCycle::from_cpu(self.with_policy(CPUPolicy {
            implementation: Implementation::SingleCycle,
            ..Default::default()
        }))
    }
}

/// Steps until HALT completes
pub fn run_to_halt(sim: &mut dyn Simulator) {
    let mode = RunMode::UntilHalt { sentinel: HALT, limit: 10_000 };
    assert!(run_wrapper::execute(sim, mode).unwrap());
}

pub fn run_cycles(sim: &mut dyn Simulator, cycles: u64) {
    run_wrapper::execute(sim, RunMode::Cycles(cycles)).unwrap();
}
