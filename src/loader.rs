//! Utility functions for preparing the CPU and memory for execution.
//!
//! Programs and data images are text: one word per line, written as
//! `address value` or `address type value` in hexadecimal. The `type`
//! column is accepted and ignored. `#` starts a comment.

use std::fs;
use std::path::Path;

use tracing::debug;
use tracing::warn;

use crate::cpu::CPUState;
use crate::error::LineError;
use crate::error::LoadError;
use crate::error::SimulatorResult;
use crate::memory::DataMemory;

/// A line that was not loaded, and why
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number
    pub line: usize,
    pub text: String,
    pub reason: LineError,
}

/// Outcome of loading one file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Number of words stored
    pub loaded: usize,
    pub skipped: Vec<SkippedLine>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Parses a hexadecimal number with an optional `0x` prefix
fn parse_hex(token: &str) -> Result<u32, LineError> {
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u32::from_str_radix(digits, 16)
        .map_err(|_| LineError::InvalidHex(token.to_string()))
}

/// Parses one line into `(address, value)`.
/// Blank and comment-only lines yield `None`.
pub fn parse_line(line: &str) -> Result<Option<(u32, u32)>, LineError> {
    let content = line.split('#').next().unwrap_or("");
    let fields: Vec<&str> = content.split_whitespace().collect();

    match fields.as_slice() {
        [] => Ok(None),
        [address, value] | [address, _, value] => {
            Ok(Some((parse_hex(address)?, parse_hex(value)?)))
        }
        _ => Err(LineError::FieldCount(fields.len())),
    }
}

/// Feeds every well-formed line to `store`, collecting the rest
fn load_words(
    text: &str,
    mut store: impl FnMut(u32, u32) -> Result<(), LineError>,
) -> LoadReport {
    let mut report = LoadReport::default();

    for (index, line) in text.lines().enumerate() {
        let result = parse_line(line).and_then(|parsed| match parsed {
            Some((address, value)) => store(address, value).map(|_| true),
            None => Ok(false),
        });

        match result {
            Ok(true) => report.loaded += 1,
            Ok(false) => {}
            Err(reason) => {
                warn!("Skipping line {}: {} ({:?})", index + 1, reason, line);
                report.skipped.push(SkippedLine {
                    line: index + 1,
                    text: line.to_string(),
                    reason,
                });
            }
        }
    }

    debug!(
        "Loaded {} word(s), skipped {} line(s)",
        report.loaded,
        report.skipped.len()
    );
    report
}

/// Loads program text into instruction memory
pub fn load_program_str(cpu: &mut CPUState, text: &str) -> LoadReport {
    let imem = &mut cpu.imem;
    load_words(text, |address, value| {
        if address % 4 != 0 {
            return Err(LineError::Misaligned(address));
        }
        match imem.set_at(address, value) {
            true => Ok(()),
            false => Err(LineError::AddressOutOfBounds(address)),
        }
    })
}

/// Loads data-image text into data memory
pub fn load_data_str(cpu: &mut CPUState, text: &str) -> LoadReport {
    let dmem = &mut cpu.dmem;
    load_words(text, |address, value| {
        if !DataMemory::contains(address) {
            return Err(LineError::AddressOutOfBounds(address));
        }
        dmem.write(address, value, true);
        Ok(())
    })
}

fn read_file(path: &Path) -> SimulatorResult<String> {
    fs::read_to_string(path)
        .map_err(|e| LoadError::FileReadError(path.to_path_buf(), e).into())
}

/// Loads a program file into instruction memory
pub fn load_program(cpu: &mut CPUState, path: &Path) -> SimulatorResult<LoadReport> {
    let text = read_file(path)?;
    debug!("Loading program from {}", path.display());
    Ok(load_program_str(cpu, &text))
}

/// Loads a data-image file into data memory
pub fn load_data(cpu: &mut CPUState, path: &Path) -> SimulatorResult<LoadReport> {
    let text = read_file(path)?;
    debug!("Loading data image from {}", path.display());
    Ok(load_data_str(cpu, &text))
}
