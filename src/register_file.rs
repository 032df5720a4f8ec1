//! Register bank with a hardwired zero register

use std::fmt;

/// Number of general purpose registers
pub const REGISTER_COUNT: usize = 32;

/// Register bank: two read ports, one conditional write port.
/// Register 0 accepts writes but always reads 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u32; REGISTER_COUNT],
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register; out-of-range indices read 0
    pub fn read(&self, index: u32) -> u32 {
        match index {
            0 => 0,
            i if (i as usize) < REGISTER_COUNT => self.regs[i as usize],
            _ => 0,
        }
    }

    /// Writes a register when `enable` is set.
    /// Writes to register 0 or out-of-range indices are discarded.
    pub fn write(&mut self, index: u32, value: u32, enable: bool) {
        if !enable || index == 0 {
            return;
        }
        if let Some(reg) = self.regs.get_mut(index as usize) {
            *reg = value;
        }
    }

    /// Snapshot of all registers as read through the read port
    pub fn values(&self) -> [u32; REGISTER_COUNT] {
        let mut values = self.regs;
        values[0] = 0;
        values
    }
}

/// Four columns of eight, `Rxx: value` in hex
impl fmt::Display for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..8u32 {
            writeln!(
                f,
                "R{:02x}: {:08x} R{:02x}: {:08x} R{:02x}: {:08x} R{:02x}: {:08x}",
                i,
                self.read(i),
                i + 8,
                self.read(i + 8),
                i + 16,
                self.read(i + 16),
                i + 24,
                self.read(i + 24),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_read_write() {
        let mut regs = RegisterFile::new();
        regs.write(5, 0x1234, true);
        assert_eq!(regs.read(5), 0x1234);

        regs.write(5, 0x9999, false);
        assert_eq!(regs.read(5), 0x1234);
    }

    #[test]
    fn test_zero_register() {
        let mut regs = RegisterFile::new();
        regs.write(0, 0xffff_ffff, true);
        assert_eq!(regs.read(0), 0);
        assert_eq!(regs.values()[0], 0);
    }

    #[test]
    fn test_out_of_range() {
        let mut regs = RegisterFile::new();
        regs.write(32, 7, true);
        assert_eq!(regs.read(32), 0);
        assert_eq!(regs, RegisterFile::new());
    }

    #[test]
    fn test_display() {
        let mut regs = RegisterFile::new();
        regs.write(31, 0xabcd, true);
        let text = regs.to_string();
        assert_eq!(text.lines().count(), 8);
        assert!(text.starts_with("R00: 00000000 R08: 00000000"));
        assert!(text.contains("R1f: 0000abcd"));
    }

    proptest! {
        #[test]
        fn prop_zero_register_stays_zero(
            writes in prop::collection::vec((0u32..32, any::<u32>(), any::<bool>()), 0..64)
        ) {
            let mut regs = RegisterFile::new();
            for (index, value, enable) in writes {
                regs.write(index, value, enable);
                prop_assert_eq!(regs.read(0), 0);
            }
        }
    }
}
