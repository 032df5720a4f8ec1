use std::path::PathBuf;
use std::str::FromStr;

use crate::cpu::Implementation;

xflags::xflags! {
    /// MIPS five-stage pipeline simulator.
    cmd sim-args {
        /// Path to the program file (`address [type] value` per line, hex).
        required program: PathBuf

        /// Number of cycles to simulate. Without it the simulator runs
        /// until the halt word reaches write-back.
        optional cycles: u64

        /// Path to a data-memory image, same format as the program.
        optional --data path: PathBuf

        /// Halt word for run-until-halt mode (hex, default ffffffff).
        optional --halt-on word: HexWord

        /// Cycle limit for run-until-halt mode (default 1000000).
        optional --max-cycles limit: u64

        /// Specifies the simulator implementation.
        /// P: Pipelined (default)
        /// S: Single-cycle reference
        optional -i, --implementation backend: BackendArg

        /// Disables the hazard interlock; only forwarding is applied.
        optional --no-interlock

        /// Writes a per-cycle CSV trace to the given path.
        optional --trace path: PathBuf

        /// Prints cycle, instruction, stall and forwarding counts.
        optional --history

        /// Enables verbose mode, logging every stage at debug level.
        optional -v, --verbose
    }
}

#[derive(Debug)]
pub enum BackendArg {
    Pipelined,
    SingleCycle,
}

impl FromStr for BackendArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "P" => Ok(BackendArg::Pipelined),
            "S" => Ok(BackendArg::SingleCycle),
            _ => Err(format!(
                "Invalid implementation: '{}'. Expected 'P' or 'S'.",
                s
            )),
        }
    }
}

impl From<BackendArg> for Implementation {
    fn from(val: BackendArg) -> Self {
        match val {
            BackendArg::Pipelined => Implementation::Pipelined,
            BackendArg::SingleCycle => Implementation::SingleCycle,
        }
    }
}

/// A 32-bit word written in hex, `0x` prefix optional
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexWord(pub u32);

impl FromStr for HexWord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        u32::from_str_radix(digits, 16)
            .map(HexWord)
            .map_err(|_| format!("Invalid hex word: '{}'.", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_arg() {
        assert!(matches!("p".parse(), Ok(BackendArg::Pipelined)));
        assert!(matches!("S".parse(), Ok(BackendArg::SingleCycle)));
        assert!("X".parse::<BackendArg>().is_err());
    }

    #[test]
    fn test_hex_word() {
        assert_eq!("ffffffff".parse(), Ok(HexWord(0xffff_ffff)));
        assert_eq!("0x0000000c".parse(), Ok(HexWord(0xc)));
        assert!("0xg".parse::<HexWord>().is_err());
    }

    #[test]
    fn test_parse_args() {
        let args = SimArgs::from_vec(vec![
            "prog.hex".into(),
            "12".into(),
            "--no-interlock".into(),
            "-i".into(),
            "S".into(),
        ])
        .unwrap();
        assert_eq!(args.program, PathBuf::from("prog.hex"));
        assert_eq!(args.cycles, Some(12));
        assert!(args.no_interlock);
        assert!(matches!(args.implementation, Some(BackendArg::SingleCycle)));
        assert!(!args.history);
    }
}
