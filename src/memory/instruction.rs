//! Instruction memory, word addressed by byte address

use super::MEMORY_SIZE;
use super::WORD_SIZE;

const WORD_COUNT: usize = MEMORY_SIZE / WORD_SIZE;

/// Instruction memory
#[derive(Clone)]
pub struct InstructionMemory {
    words: Box<[u32; WORD_COUNT]>,
}

impl Default for InstructionMemory {
    fn default() -> Self {
        Self::make()
    }
}

impl InstructionMemory {
    /// Make an empty instruction memory
    pub fn make() -> Self {
        Self { words: Box::new([0; WORD_COUNT]) }
    }

    /// Word index of a byte address, if it is inside the store
    fn index(address: u32) -> Option<usize> {
        let index = (address >> 2) as usize;
        (index < WORD_COUNT).then_some(index)
    }

    /// Whether the word at `address` exists
    pub fn contains(address: u32) -> bool {
        Self::index(address).is_some()
    }

    /// Store a word. Returns false if the address is outside the store.
    pub fn set_at(&mut self, address: u32, value: u32) -> bool {
        match Self::index(address) {
            Some(index) => {
                self.words[index] = value;
                true
            }
            None => false,
        }
    }

    /// The word at `address`, or 0 outside the store
    pub fn value_at(&self, address: u32) -> u32 {
        Self::index(address).map_or(0, |index| self.words[index])
    }
}
