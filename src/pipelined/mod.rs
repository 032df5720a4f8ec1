//! Pipelined implementation

use tracing::debug;

use crate::cpu::CPUPolicy;
use crate::cpu::CPUState;
use crate::cpu::HazardPolicy;
use crate::cpu::Simulator;
use crate::cpu::StageWords;
use crate::pipelined::pipeline::Hazard;
use crate::pipelined::pipeline::IDEXRegister;
use crate::pipelined::pipeline::PipelineState;

pub mod pipeline;
pub mod stages;

/// Five-stage pipeline engine.
///
/// `latched` holds the output side of every pipeline register. A cycle
/// computes all input sides from it into a separate `PipelineState` and
/// then replaces `latched` wholesale, so no stage can observe another
/// stage's result from the same cycle.
#[derive(Clone, Default)]
pub struct Pipeline {
    cpu: CPUState,
    latched: PipelineState,
    last_stall: Option<Hazard>,
}

impl Pipeline {
    pub fn new(policy: CPUPolicy) -> Self {
        Self::from_cpu(CPUState::make(policy))
    }

    /// Wraps a prepared CPU state. The pipeline starts empty and
    /// fetches from the CPU's program counter.
    pub fn from_cpu(cpu: CPUState) -> Self {
        let latched = PipelineState {
            id_ex: IDEXRegister::bubble(cpu.pc.read()),
            ..Default::default()
        };
        Self { cpu, latched, last_stall: None }
    }

    /// Output sides of the pipeline registers
    pub fn latched(&self) -> &PipelineState {
        &self.latched
    }

    /// Current program counter
    pub fn pc(&self) -> u32 {
        self.cpu.pc.read()
    }

    /// One clock cycle
    pub fn advance(&mut self) {
        let current = self.latched;
        let cpu = &mut self.cpu;

        cpu.update_cycle_count(1);
        debug!(
            "New cycle {}; PC: {:#010x}",
            cpu.history.cycle_count,
            cpu.pc.read()
        );

        // WB goes first: the register file is written in the first half
        // of the cycle and read by ID in the second half.
        stages::write_back(&current, &mut cpu.gpr);
        if !current.mem_wb.inst.is_bubble() {
            cpu.update_inst_count(1);
        }

        let stall = match cpu.policy.hazard {
            HazardPolicy::Interlock => current.hazard(),
            HazardPolicy::ForwardOnly => None,
        };

        let (if_id, id_ex) = match stall {
            Some(hazard) => {
                debug!("Inserting bubble due to {}", hazard);
                cpu.history.stall_count += 1;
                (current.if_id, IDEXRegister::bubble(current.id_ex.next_pc))
            }
            None => {
                let if_id = stages::instruction_fetch(&current, &cpu.imem);
                let id_ex = stages::instruction_decode(&current, &cpu.gpr);
                if id_ex.inst.controls.branch {
                    if current.equality_forward_rs(&id_ex.inst) {
                        cpu.history.equality_forward_count += 1;
                    }
                    if current.equality_forward_rt(&id_ex.inst) {
                        cpu.history.equality_forward_count += 1;
                    }
                }
                (if_id, id_ex)
            }
        };

        let ex_mem = stages::execute(&current);
        Self::record_forwarding(cpu, &current);

        let mem_wb = stages::memory_access(&current, &mut cpu.dmem);

        // Clock edge
        self.latched = PipelineState { if_id, id_ex, ex_mem, mem_wb };
        self.cpu.pc.write(self.latched.id_ex.next_pc);
        self.last_stall = stall;
    }

    fn record_forwarding(cpu: &mut CPUState, current: &PipelineState) {
        let inst = &current.id_ex.inst;
        let history = &mut cpu.history;
        if inst.reads_rs() {
            if current.ex_mem_forward_rs() {
                history.ex_mem_forward_count += 1;
            } else if current.mem_wb_forward_rs() {
                history.mem_wb_forward_count += 1;
            }
        }
        if inst.reads_rt() {
            if current.ex_mem_forward_rt() {
                history.ex_mem_forward_count += 1;
            } else if current.mem_wb_forward_rt() {
                history.mem_wb_forward_count += 1;
            }
        }
    }
}

impl Simulator for Pipeline {
    fn step(&mut self) {
        self.advance();
    }

    fn cpu(&self) -> &CPUState {
        &self.cpu
    }

    fn cpu_mut(&mut self) -> &mut CPUState {
        &mut self.cpu
    }

    fn stage_words(&self) -> StageWords {
        let pc = self.pc();
        StageWords {
            pc,
            fetch: self.cpu.imem.value_at(pc),
            decode: self.latched.if_id.raw_inst,
            execute: self.latched.id_ex.inst.raw_inst,
            memory: self.latched.ex_mem.inst.raw_inst,
            write_back: self.latched.mem_wb.inst.raw_inst,
        }
    }

    /// The sentinel sits in MEM/WB: everything before it has written back
    fn halted_on(&self, sentinel: u32) -> bool {
        self.latched.mem_wb.inst.raw_inst == sentinel
    }

    fn last_stall(&self) -> Option<Hazard> {
        self.last_stall
    }
}
