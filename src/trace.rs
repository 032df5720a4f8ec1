//! Per-cycle CSV trace of the pipeline

use std::io;
use std::path::Path;

use crate::cpu::Simulator;
use crate::error::SimulatorResult;

const HEADER: [&str; 9] =
    ["Cycle", "PC", "IF", "ID", "EX", "MEM", "WB", "Stall", "Retired"];

/// Writes one row per simulated cycle
pub struct TraceWriter<W: io::Write> {
    writer: csv::Writer<W>,
}

impl TraceWriter<std::fs::File> {
    /// Creates the trace file and writes the header
    pub fn create(path: &Path) -> SimulatorResult<Self> {
        Self::new(csv::Writer::from_path(path)?)
    }
}

impl<W: io::Write> TraceWriter<W> {
    pub fn from_writer(inner: W) -> SimulatorResult<Self> {
        Self::new(csv::Writer::from_writer(inner))
    }

    fn new(mut writer: csv::Writer<W>) -> SimulatorResult<Self> {
        writer.write_record(HEADER)?;
        Ok(Self { writer })
    }

    /// Records the state latched by the last step
    pub fn record(&mut self, sim: &dyn Simulator) -> SimulatorResult<()> {
        let words = sim.stage_words();
        let history = sim.cpu().history;
        let stall = sim
            .last_stall()
            .map(|hazard| hazard.to_string())
            .unwrap_or_default();

        self.writer.write_record([
            history.cycle_count.to_string(),
            format!("{:08x}", words.pc),
            format!("{:08x}", words.fetch),
            format!("{:08x}", words.decode),
            format!("{:08x}", words.execute),
            format!("{:08x}", words.memory),
            format!("{:08x}", words.write_back),
            stall,
            history.inst_count.to_string(),
        ])?;
        Ok(())
    }

    /// Flushes and returns the underlying writer
    pub fn finish(self) -> SimulatorResult<W> {
        self.writer
            .into_inner()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()).into())
    }
}
