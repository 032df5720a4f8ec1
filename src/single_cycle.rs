//! Single cycle implementation.
//!
//! Executes one whole instruction per step. Control transfers follow the
//! pipeline's timing: the instruction after a branch or jump always runs,
//! and targets are relative to the address after that one.

use tracing::debug;

use crate::cpu::CPUPolicy;
use crate::cpu::CPUState;
use crate::cpu::Simulator;
use crate::cpu::StageWords;
use crate::stages_simple::*;

/// Non-pipelined reference processor
#[derive(Clone, Default)]
pub struct SingleCycle {
    cpu: CPUState,
    /// Address of the instruction after the current one
    npc: u32,
    /// Last executed word
    last_inst: u32,
}

impl SingleCycle {
    pub fn new(policy: CPUPolicy) -> Self {
        Self::from_cpu(CPUState::make(policy))
    }

    /// Wraps a prepared CPU state, starting at its program counter
    pub fn from_cpu(cpu: CPUState) -> Self {
        let npc = cpu.pc.read().wrapping_add(4);
        Self { cpu, npc, last_inst: 0 }
    }

    /// Current program counter
    pub fn pc(&self) -> u32 {
        self.cpu.pc.read()
    }
}

impl Simulator for SingleCycle {
    fn step(&mut self) {
        let cpu = &mut self.cpu;
        cpu.update_cycle_count(1);

        let pc = cpu.pc.read();
        debug!("[SINGLE] PC: {:#010x}", pc);

        // IF
        let raw_inst = instruction_fetch(pc, &cpu.imem);
        // ID
        let inst = instruction_decode(raw_inst);
        let (rs, rt) = register_read(&inst, &cpu.gpr);
        let target = next_pc(&inst, self.npc, rs == rt);
        // EX
        let exec_result = execute(&inst, rs, rt);
        // MEM
        let wb_result = memory_access(&inst, &mut cpu.dmem, exec_result, rt);
        // WB
        write_back(&inst, &mut cpu.gpr, destination(&inst), wb_result);

        if !inst.is_bubble() {
            cpu.update_inst_count(1);
        }

        cpu.pc.write(self.npc);
        self.npc = target;
        self.last_inst = raw_inst;
    }

    fn cpu(&self) -> &CPUState {
        &self.cpu
    }

    fn cpu_mut(&mut self) -> &mut CPUState {
        &mut self.cpu
    }

    /// Only the fetch and write-back slots are meaningful here
    fn stage_words(&self) -> StageWords {
        let pc = self.pc();
        StageWords {
            pc,
            fetch: self.cpu.imem.value_at(pc),
            write_back: self.last_inst,
            ..Default::default()
        }
    }

    fn halted_on(&self, sentinel: u32) -> bool {
        self.cpu.history.cycle_count > 0 && self.last_inst == sentinel
    }
}
