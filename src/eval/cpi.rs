use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use sim_lib::cpu::{CPUPolicy, CPUState, HazardPolicy, Implementation};
use sim_lib::error::SimulatorResult;
use sim_lib::run_wrapper::{self, RunConfig, RunMode};

const PROGRAM_DIR: &str = "programs";
const OUTPUT_PATH: &str = "eval/sim_eval.csv";

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    if let Err(e) = run_eval() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Runs one model to the halt word and returns its final state
fn simulate(cpu: &CPUState, policy: CPUPolicy) -> SimulatorResult<CPUState> {
    let mut cpu = cpu.clone();
    cpu.policy = policy;
    let mut sim = run_wrapper::make_simulator(cpu);
    run_wrapper::execute(sim.as_mut(), RunMode::default())?;
    Ok(sim.cpu().clone())
}

fn list_programs() -> SimulatorResult<Vec<PathBuf>> {
    let mut programs: Vec<PathBuf> = fs::read_dir(PROGRAM_DIR)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|ext| ext == "hex"))
        .collect();
    programs.sort();
    Ok(programs)
}

fn program_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn run_eval() -> SimulatorResult<()> {
    if let Some(parent) = Path::new(OUTPUT_PATH).parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(OUTPUT_PATH)?;

    writer.write_record([
        "Program",
        "Hazard policy",
        "Cycles",
        "Instructions",
        "Stall cycles",
        "CPI",
        "Matches reference",
    ])?;

    for path in list_programs()? {
        let program = program_name(&path);
        eprintln!("Running program: {}", path.display());

        // A sibling `.data` file seeds data memory
        let data = path.with_extension("data");
        let config = RunConfig {
            program: path.clone(),
            data: data.exists().then_some(data),
            ..Default::default()
        };
        let (cpu, report, _) = run_wrapper::prepare(&config)?;
        if !report.is_clean() {
            eprintln!(
                "Warning: {} line(s) skipped in '{}'",
                report.skipped.len(),
                program
            );
        }

        let reference = match simulate(
            &cpu,
            CPUPolicy {
                implementation: Implementation::SingleCycle,
                ..Default::default()
            },
        ) {
            Ok(reference) => reference,
            Err(e) => {
                eprintln!(
                    "Warning: Failed to run program '{}': {}",
                    program, e
                );
                writer.write_record([
                    program.as_str(),
                    "Error",
                    "",
                    "",
                    "",
                    "",
                    "",
                ])?;
                continue;
            }
        };

        for (label, hazard) in [
            ("interlock", HazardPolicy::Interlock),
            ("forward-only", HazardPolicy::ForwardOnly),
        ] {
            let policy = CPUPolicy { hazard, ..Default::default() };
            match simulate(&cpu, policy) {
                Ok(state) => {
                    let history = state.history;
                    let matches = state.gpr == reference.gpr
                        && state.dmem == reference.dmem;
                    let cpi = history.cpi().map_or_else(
                        || "n/a".to_string(),
                        |cpi| format!("{:.3}", cpi),
                    );
                    writer.write_record([
                        program.as_str(),
                        label,
                        &history.cycle_count.to_string(),
                        &history.inst_count.to_string(),
                        &history.stall_count.to_string(),
                        &cpi,
                        if matches { "yes" } else { "no" },
                    ])?;
                }
                Err(e) => {
                    eprintln!(
                        "Warning: Failed to run program '{}' ({}): {}",
                        program, label, e
                    );
                    writer.write_record([
                        program.as_str(),
                        label,
                        "Error",
                        "",
                        "",
                        "",
                        "",
                    ])?;
                }
            }
        }
    }

    writer.flush()?;
    eprintln!("Results written to {}", OUTPUT_PATH);
    Ok(())
}
