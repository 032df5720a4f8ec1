//! Textual state dump

use std::fmt::Write;

use crate::cpu::Simulator;

/// Renders the pipeline stage words and the register file
pub fn dump(sim: &dyn Simulator) -> String {
    let words = sim.stage_words();
    let mut out = String::new();

    // Writing into a String cannot fail
    let _ = writeln!(out, "PIPELINE");
    let _ = writeln!(out, "IF:  {:08x} (PC = {:08x})", words.fetch, words.pc);
    let _ = writeln!(out, "ID:  {:08x}", words.decode);
    let _ = writeln!(out, "EXE: {:08x}", words.execute);
    let _ = writeln!(out, "MEM: {:08x}", words.memory);
    let _ = writeln!(out, "WB:  {:08x}", words.write_back);
    let _ = writeln!(out, "REGISTER FILE");
    let _ = write!(out, "{}", sim.cpu().gpr);

    out
}

/// Renders the `[HISTORY]` summary lines
pub fn history(sim: &dyn Simulator) -> String {
    let history = sim.cpu().history;
    let mut out = String::new();

    let _ = writeln!(out, "[HISTORY] # cycles = {}", history.cycle_count);
    let _ = writeln!(out, "[HISTORY] # instructions = {}", history.inst_count);
    let _ = writeln!(out, "[HISTORY] # stall cycles = {}", history.stall_count);
    let _ = writeln!(
        out,
        "[HISTORY] forwards: EX/MEM = {}, MEM/WB = {}, equality unit = {}",
        history.ex_mem_forward_count,
        history.mem_wb_forward_count,
        history.equality_forward_count
    );
    match history.cpi() {
        Some(cpi) => {
            let _ = writeln!(out, "[HISTORY] CPI = {:.2}", cpi);
        }
        None => {
            let _ = writeln!(out, "[HISTORY] CPI = n/a");
        }
    }

    out
}
