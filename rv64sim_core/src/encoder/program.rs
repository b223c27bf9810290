use bimap::BiBTreeMap;

use super::SkippedLine;

/// Capacity of the instruction store, in instructions.
pub const IMEM_SIZE: usize = 256;

/// One encoded instruction at its byte address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EncodedInstruction {
    pub address: u64,
    pub word: u32,
}

/// Fixed-capacity instruction store. Addresses are assigned sequentially
/// from 0 in steps of 4; the store is built once by the encoder and
/// read-only during execution.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InstructionMemory {
    entries: Vec<EncodedInstruction>,
}

impl InstructionMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a word at the next address. `None` when the store is full.
    pub fn push(&mut self, word: u32) -> Option<u64> {
        if self.entries.len() >= IMEM_SIZE {
            return None;
        }
        let address = 4 * self.entries.len() as u64;
        self.entries.push(EncodedInstruction { address, word });
        Some(address)
    }

    /// The word stored at a byte address, if any.
    pub fn fetch(&self, address: u64) -> Option<u32> {
        if address % 4 != 0 {
            return None;
        }
        self.entries
            .get((address / 4) as usize)
            .map(|entry| entry.word)
    }

    /// Address of the highest stored instruction; `None` while empty.
    pub fn last_address(&self) -> Option<u64> {
        self.entries.last().map(|entry| entry.address)
    }

    pub fn entries(&self) -> &[EncodedInstruction] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Product of the encoder: the populated store, a map between addresses
/// and trace line numbers, and the lines skipped for unknown mnemonics.
#[derive(Clone, Debug)]
pub struct EncodedProgram {
    pub instruction_memory: InstructionMemory,

    /// Instruction addresses (left) to 1-based trace line numbers (right)
    pub source_map: BiBTreeMap<u64, usize>,

    pub skipped: Vec<SkippedLine>,
}

impl EncodedProgram {
    pub fn new() -> Self {
        EncodedProgram {
            instruction_memory: InstructionMemory::new(),
            source_map: BiBTreeMap::new(),
            skipped: Vec::new(),
        }
    }
}

impl Default for EncodedProgram {
    fn default() -> Self {
        Self::new()
    }
}
