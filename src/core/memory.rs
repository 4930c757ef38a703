//! Word-addressable memory with a bounded capacity.
//!
//! Addressing is byte-oriented in the ISA; word index = byte address / 4
//! (§3). Program words and data words share one flat space.

use crate::common::error::SimError;

/// Flat memory image: `capacity` words, each with an "ever-written" flag.
#[derive(Clone, Debug)]
pub struct Memory {
    values: Vec<u32>,
    written: Vec<bool>,
    /// Number of words populated from the image file (distinct from
    /// `capacity`, which bounds the addressable space).
    size: usize,
    capacity: usize,
}

impl Memory {
    pub fn new(capacity: usize) -> Self {
        Self {
            values: vec![0; capacity],
            written: vec![false; capacity],
            size: 0,
            capacity,
        }
    }

    /// Populates memory indices `0, 1, 2, …` from `words`, in order.
    /// Fails if `words` exceeds the configured capacity.
    pub fn load(&mut self, words: &[u32]) -> Result<(), SimError> {
        if words.len() > self.capacity {
            return Err(SimError::Config(format!(
                "memory image has {} words, exceeding capacity {}",
                words.len(),
                self.capacity
            )));
        }
        self.values[..words.len()].copy_from_slice(words);
        self.size = words.len();
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether word index `idx` lies within the *loaded program* (used by
    /// IF to decide whether the PC still has instructions to fetch).
    pub fn in_loaded_range(&self, idx: usize) -> bool {
        idx < self.size
    }

    fn check_bounds(&self, idx: usize, byte_addr: u32) -> Result<(), SimError> {
        if idx >= self.capacity {
            return Err(SimError::OutOfRange { address: byte_addr });
        }
        Ok(())
    }

    /// Reads the word at byte address `addr` (`addr / 4` must be within
    /// capacity).
    pub fn read_word(&self, addr: u32) -> Result<u32, SimError> {
        let idx = (addr / 4) as usize;
        self.check_bounds(idx, addr)?;
        Ok(self.values[idx])
    }

    /// Writes `val` to the word at byte address `addr`, marking it
    /// modified. The modified flag, once set, is never cleared.
    pub fn write_word(&mut self, addr: u32, val: u32) -> Result<(), SimError> {
        let idx = (addr / 4) as usize;
        self.check_bounds(idx, addr)?;
        self.values[idx] = val;
        self.written[idx] = true;
        Ok(())
    }

    pub fn is_written(&self, idx: usize) -> bool {
        self.written.get(idx).copied().unwrap_or(false)
    }

    /// Iterates over `(word_index, value)` for every word ever written.
    pub fn written_entries(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.written
            .iter()
            .enumerate()
            .filter(|(_, &w)| w)
            .map(|(i, _)| (i, self.values[i]))
    }
}
