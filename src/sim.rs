use std::error::Error;

use sim_lib::cpu::{CPUPolicy, HazardPolicy};
use sim_lib::dump;
use sim_lib::flags::SimArgs;
use sim_lib::loader::LoadReport;
use sim_lib::run_wrapper::{self, RunConfig, RunMode};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report_skipped(kind: &str, report: &LoadReport) {
    if report.is_clean() {
        return;
    }
    eprintln!(
        "[LOAD] {}: {} word(s) loaded, {} line(s) skipped",
        kind,
        report.loaded,
        report.skipped.len()
    );
    for skipped in &report.skipped {
        eprintln!("[LOAD]   line {}: {}", skipped.line, skipped.reason);
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = SimArgs::from_env_or_exit();
    init_logging(args.verbose);

    let mut policy = CPUPolicy {
        verbose: args.verbose,
        history: args.history,
        ..Default::default()
    };
    if let Some(backend) = args.implementation {
        policy.implementation = backend.into();
    }
    if args.no_interlock {
        policy.hazard = HazardPolicy::ForwardOnly;
    }

    let mode = match args.cycles {
        Some(cycles) => RunMode::Cycles(cycles),
        None => RunMode::UntilHalt {
            sentinel: args
                .halt_on
                .map_or(run_wrapper::DEFAULT_SENTINEL, |word| word.0),
            limit: args.max_cycles.unwrap_or(run_wrapper::DEFAULT_CYCLE_LIMIT),
        },
    };

    let config = RunConfig {
        program: args.program,
        data: args.data,
        mode,
        policy,
        trace: args.trace,
    };

    let outcome = run_wrapper::run(&config)?;

    report_skipped("program", &outcome.program_report);
    if let Some(report) = &outcome.data_report {
        report_skipped("data", report);
    }

    print!("{}", dump::dump(outcome.sim.as_ref()));

    if policy.history {
        eprint!("{}", dump::history(outcome.sim.as_ref()));
    }

    Ok(())
}
