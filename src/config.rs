//! Command-line parsing and simulator configuration.
//!
//! Mirrors the teacher's CLI-args-plus-TOML-config layering, scaled down
//! to the two mandatory flags the spec requires (`-f`, `-m`) plus a
//! handful of optional, non-architectural tunables.

use std::fs;

use clap::Parser;
use serde::Deserialize;

use crate::common::error::SimError;

const DEFAULT_MEMORY_CAPACITY: usize = 1024;

/// Operating mode selected with `-m` (§6).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    NonPipelined,
    PipelinedNoForward,
    PipelinedForward,
}

impl Mode {
    pub fn is_pipelined(self) -> bool {
        !matches!(self, Mode::NonPipelined)
    }

    pub fn forwarding_enabled(self) -> bool {
        matches!(self, Mode::PipelinedForward)
    }

    fn from_u8(v: u8) -> Result<Self, SimError> {
        match v {
            0 => Ok(Mode::NonPipelined),
            1 => Ok(Mode::PipelinedNoForward),
            2 => Ok(Mode::PipelinedForward),
            other => Err(SimError::Config(format!(
                "invalid mode: {other}. Mode must be 0, 1, or 2"
            ))),
        }
    }
}

/// Raw command-line arguments, parsed with `clap`.
#[derive(Parser, Debug)]
#[command(author, version, about = "MIPS Lite cycle-accurate pipeline simulator")]
struct Args {
    /// Memory image file (one hex word per line).
    #[arg(short = 'f', long = "file")]
    file: String,

    /// Operating mode: 0 = non-pipelined, 1 = pipelined without
    /// forwarding, 2 = pipelined with forwarding.
    #[arg(short = 'm', long = "mode")]
    mode: u8,

    /// Emit one stage-by-stage trace line per cycle to stderr.
    #[arg(short = 't', long = "trace", default_value_t = false)]
    trace: bool,

    /// Optional TOML file overriding secondary tunables (memory
    /// capacity, default trace setting).
    #[arg(short = 'c', long = "config")]
    config: Option<String>,
}

/// Secondary, non-architectural tunables that may be overridden by a
/// `-c` config file. Mode and the image path stay CLI-only per §6.
#[derive(Debug, Deserialize, Default)]
struct FileOverrides {
    memory: Option<MemoryOverrides>,
    general: Option<GeneralOverrides>,
}

#[derive(Debug, Deserialize)]
struct MemoryOverrides {
    capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct GeneralOverrides {
    trace: Option<bool>,
}

/// Fully resolved simulator configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub image_path: String,
    pub mode: Mode,
    pub trace: bool,
    pub memory_capacity: usize,
}

impl Config {
    /// Parses `std::env::args`, applies any `-c` config file overrides,
    /// and validates the result. Returns a `SimError::Config` on any
    /// invalid or missing required flag.
    pub fn from_args() -> Result<Self, SimError> {
        let args = Args::parse();
        let mode = Mode::from_u8(args.mode)?;

        let mut memory_capacity = DEFAULT_MEMORY_CAPACITY;
        let mut trace = args.trace;

        if let Some(path) = &args.config {
            let text = fs::read_to_string(path)
                .map_err(|e| SimError::Config(format!("could not read config '{path}': {e}")))?;
            let overrides: FileOverrides = toml::from_str(&text)
                .map_err(|e| SimError::Config(format!("could not parse config '{path}': {e}")))?;

            if let Some(mem) = overrides.memory {
                if let Some(cap) = mem.capacity {
                    memory_capacity = cap;
                }
            }
            if let Some(general) = overrides.general {
                if let Some(t) = general.trace {
                    // CLI flag wins if explicitly passed; otherwise take the file's value.
                    trace = trace || t;
                }
            }
        }

        if args.file.trim().is_empty() {
            return Err(SimError::Config("filename not specified".to_string()));
        }

        Ok(Config {
            image_path: args.file,
            mode,
            trace,
            memory_capacity,
        })
    }
}
