//! Byte-addressed data memory with little-endian words

use super::MEMORY_SIZE;
use super::WORD_SIZE;

/// Data memory
#[derive(Clone, PartialEq, Eq)]
pub struct DataMemory {
    data: Box<[u8; MEMORY_SIZE]>,
}

impl Default for DataMemory {
    fn default() -> Self {
        Self::make()
    }
}

impl DataMemory {
    /// Make a zeroed data memory
    pub fn make() -> Self {
        Self { data: Box::new([0; MEMORY_SIZE]) }
    }

    /// Byte range of the word at `address`, if all four bytes are inside
    fn word_range(address: u32) -> Option<std::ops::Range<usize>> {
        let start = address as usize;
        let end = start.checked_add(WORD_SIZE)?;
        (end <= MEMORY_SIZE).then_some(start..end)
    }

    /// Whether a whole word fits at `address`
    pub fn contains(address: u32) -> bool {
        Self::word_range(address).is_some()
    }

    /// Writes the word at `address` if `enable` is set.
    /// Words that do not fit are dropped.
    pub fn write(&mut self, address: u32, value: u32, enable: bool) {
        if !enable {
            return;
        }
        if let Some(range) = Self::word_range(address) {
            self.data[range].copy_from_slice(&value.to_le_bytes());
        }
    }

    /// Reads the word at `address` if `enable` is set, 0 otherwise
    pub fn read(&self, address: u32, enable: bool) -> u32 {
        if !enable {
            return 0;
        }
        match Self::word_range(address) {
            Some(range) => {
                let mut bytes = [0u8; WORD_SIZE];
                bytes.copy_from_slice(&self.data[range]);
                u32::from_le_bytes(bytes)
            }
            None => 0,
        }
    }

    /// Get the byte at the given address, 0 outside the store
    pub fn get8(&self, address: u32) -> u8 {
        self.data.get(address as usize).copied().unwrap_or(0)
    }
}
