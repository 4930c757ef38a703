//! Error and fatal-condition types for the simulator.
//!
//! The simulator is a batch program: every error kind here is fatal (see
//! `spec.md` §7). There is no recoverable path; `main` prints the error
//! and exits non-zero.

use std::fmt;

/// A fatal simulator error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
    /// Missing or invalid CLI flags / config file.
    Config(String),
    /// The memory image file could not be opened or a line could not be
    /// parsed as a hex word.
    Io(String),
    /// The opcode bits did not match one of the 18 defined encodings.
    Decode { word: u32 },
    /// A computed word address fell outside the configured memory
    /// capacity.
    OutOfRange { address: u32 },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::Config(msg) => write!(f, "configuration error: {msg}"),
            SimError::Io(msg) => write!(f, "I/O error: {msg}"),
            SimError::Decode { word } => write!(f, "invalid opcode in word {word:#010x}"),
            SimError::OutOfRange { address } => {
                write!(f, "memory address {address:#010x} out of range")
            }
        }
    }
}

impl std::error::Error for SimError {}
