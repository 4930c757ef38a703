//! Memory-image loader (§6).
//!
//! The image format is one 32-bit word per line, written in hexadecimal
//! without a leading `0x`. Blank lines are skipped; anything else that
//! fails to parse is a fatal `SimError::Io`. Program words and data words
//! share one flat address space, so the loader has no idea which lines
//! are instructions and which are data — it just fills memory in order.

use std::fs;

use crate::common::error::SimError;

/// Reads `path` and parses every non-blank line as a hex-encoded 32-bit
/// word, in order. Does not enforce the memory capacity; that check
/// happens in `Memory::load`, which knows the configured bound.
pub fn load_image(path: &str) -> Result<Vec<u32>, SimError> {
    let text = fs::read_to_string(path)
        .map_err(|e| SimError::Io(format!("could not read memory image '{path}': {e}")))?;

    let mut words = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let word = u32::from_str_radix(trimmed, 16).map_err(|e| {
            SimError::Io(format!(
                "{path}:{}: could not parse '{trimmed}' as a hex word: {e}",
                lineno + 1
            ))
        })?;
        words.push(word);
    }
    Ok(words)
}
