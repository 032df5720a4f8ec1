//! A simulator wrapper

use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::cpu::CPUPolicy;
use crate::cpu::CPUState;
use crate::cpu::Implementation;
use crate::cpu::Simulator;
use crate::dump;
use crate::error::SimulatorError;
use crate::error::SimulatorResult;
use crate::loader;
use crate::loader::LoadReport;
use crate::pipelined::Pipeline;
use crate::single_cycle::SingleCycle;
use crate::trace::TraceWriter;

/// Word that ends a run-until-halt simulation by default
pub const DEFAULT_SENTINEL: u32 = 0xffff_ffff;
/// Cycle limit for run-until-halt mode by default
pub const DEFAULT_CYCLE_LIMIT: u64 = 1_000_000;

/// How long to simulate
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunMode {
    /// Exactly this many steps
    Cycles(u64),
    /// Until `sentinel` completes, failing after `limit` steps
    UntilHalt { sentinel: u32, limit: u64 },
}

impl Default for RunMode {
    fn default() -> Self {
        RunMode::UntilHalt {
            sentinel: DEFAULT_SENTINEL,
            limit: DEFAULT_CYCLE_LIMIT,
        }
    }
}

impl RunMode {
    fn validate(&self) -> SimulatorResult<()> {
        match *self {
            // Word 0 is also what empty memory and bubbles read as
            RunMode::UntilHalt { sentinel: 0, .. } => Err(
                SimulatorError::ConfigError(
                    "halt word must not be 00000000".to_string(),
                ),
            ),
            _ => Ok(()),
        }
    }
}

/// Everything one simulation needs
#[derive(Clone, Debug, Default)]
pub struct RunConfig {
    pub program: PathBuf,
    pub data: Option<PathBuf>,
    pub mode: RunMode,
    pub policy: CPUPolicy,
    pub trace: Option<PathBuf>,
}

/// Result of a completed run
pub struct RunOutcome {
    pub sim: Box<dyn Simulator>,
    pub program_report: LoadReport,
    pub data_report: Option<LoadReport>,
    /// Whether the run stopped on the halt word
    pub halted: bool,
}

/// Builds the processor model selected by the CPU's policy
pub fn make_simulator(cpu: CPUState) -> Box<dyn Simulator> {
    match cpu.policy.implementation {
        Implementation::SingleCycle => Box::new(SingleCycle::from_cpu(cpu)),
        Implementation::Pipelined => Box::new(Pipeline::from_cpu(cpu)),
    }
}

/// Steps `sim` according to `mode`, calling `on_step` after every step.
/// Returns whether the halt word was reached.
pub fn execute_with(
    sim: &mut dyn Simulator,
    mode: RunMode,
    mut on_step: impl FnMut(&dyn Simulator) -> SimulatorResult<()>,
) -> SimulatorResult<bool> {
    mode.validate()?;

    match mode {
        RunMode::Cycles(cycles) => {
            for _ in 0..cycles {
                sim.step();
                on_step(sim)?;
            }
            Ok(false)
        }
        RunMode::UntilHalt { sentinel, limit } => {
            let mut steps = 0;
            while !sim.halted_on(sentinel) {
                if steps >= limit {
                    return Err(SimulatorError::ExecutionLimitReached(limit));
                }
                sim.step();
                on_step(sim)?;
                steps += 1;
            }
            Ok(true)
        }
    }
}

/// Steps `sim` according to `mode`
pub fn execute(sim: &mut dyn Simulator, mode: RunMode) -> SimulatorResult<bool> {
    execute_with(sim, mode, |_| Ok(()))
}

/// Loads the program and the optional data image into a fresh CPU
pub fn prepare(
    config: &RunConfig,
) -> SimulatorResult<(CPUState, LoadReport, Option<LoadReport>)> {
    let mut cpu = CPUState::make(config.policy);
    let program_report = loader::load_program(&mut cpu, &config.program)?;
    let data_report = match &config.data {
        Some(path) => Some(loader::load_data(&mut cpu, path)?),
        None => None,
    };
    Ok((cpu, program_report, data_report))
}

/// Run simulation on the given program
pub fn run(config: &RunConfig) -> SimulatorResult<RunOutcome> {
    config.mode.validate()?;

    let (cpu, program_report, data_report) = prepare(config)?;
    let mut sim = make_simulator(cpu);

    let verbose = config.policy.verbose;
    let mut trace =
        config.trace.as_deref().map(TraceWriter::create).transpose()?;

    let halted = execute_with(sim.as_mut(), config.mode, |s| {
        if verbose {
            debug!(
                "State after cycle {}:\n{}",
                s.cpu().history.cycle_count,
                dump::dump(s)
            );
        }
        match trace.as_mut() {
            Some(trace) => trace.record(s),
            None => Ok(()),
        }
    })?;

    if let Some(trace) = trace {
        trace.finish()?;
    }

    let history = sim.cpu().history;
    info!(
        "Simulated {} cycle(s), {} instruction(s) completed",
        history.cycle_count, history.inst_count
    );

    Ok(RunOutcome { sim, program_report, data_report, halted })
}
