//! The top-level simulated machine: architectural state plus the
//! pipeline driver loop.

use crate::common::error::SimError;
use crate::config::Mode;
use crate::core::pipeline::Latches;
use crate::core::record::Stage;
use crate::core::stages::{decode, execute, fetch, memory_access, write_back};
use crate::core::{Memory, RegisterFile};
use crate::isa::InstrClass;

/// Per-class retired instruction counts (§6). `total` increments only
/// when EX actually runs for a non-squashed instruction, matching the
/// reference behavior of never counting a branch-shadow instruction that
/// was squashed before reaching EX.
#[derive(Clone, Copy, Debug, Default)]
pub struct Counts {
    pub total: u64,
    pub arithmetic: u64,
    pub logical: u64,
    pub memory: u64,
    pub control: u64,
}

impl Counts {
    pub fn record(&mut self, class: InstrClass) {
        self.total += 1;
        match class {
            InstrClass::Arithmetic => self.arithmetic += 1,
            InstrClass::Logical => self.logical += 1,
            InstrClass::Memory => self.memory += 1,
            InstrClass::Control => self.control += 1,
        }
    }
}

/// The whole simulated machine: registers, memory, the fetch PC, the
/// pipeline latch array, and bookkeeping for the final report.
pub struct MachineState {
    pub regs: RegisterFile,
    pub memory: Memory,
    pub pc: u32,
    pub pipeline: Latches,
    pub mode: Mode,
    pub clock: u64,
    pub counts: Counts,
    pub trace: bool,
    /// Set once a `HALT` is fetched or the PC runs past the loaded
    /// program; no further instructions are fetched after this.
    pub no_more_fetch: bool,
    /// Set when a `HALT` instruction reaches EX. Fetch stops immediately
    /// (`no_more_fetch` is set alongside it), but instructions already
    /// in flight ahead of `HALT` are allowed to drain normally — the run
    /// loop keeps ticking until `is_done()`, not the instant this flips.
    pub halt: bool,
}

impl MachineState {
    pub fn new(mode: Mode, memory: Memory, trace: bool) -> Self {
        MachineState {
            regs: RegisterFile::new(),
            memory,
            pc: 0,
            pipeline: Latches::new(mode.is_pipelined()),
            mode,
            clock: 0,
            counts: Counts::default(),
            trace,
            no_more_fetch: false,
            halt: false,
        }
    }

    /// Whether the simulation has nothing left to do: no more
    /// instructions to fetch (either the program ran out, or `HALT`
    /// executed), and the pipeline has fully drained of whatever was
    /// still in flight.
    pub fn is_done(&self) -> bool {
        self.no_more_fetch && self.pipeline.is_empty()
    }

    /// Runs one clock cycle: every stage function observes and mutates
    /// the latch array, in `Wb -> Mem -> Ex -> Id -> If` order, then the
    /// latch array advances every occupant by one stage.
    pub fn tick(&mut self) -> Result<(), SimError> {
        write_back::write_back(self)?;
        memory_access::memory_access(self)?;
        execute::execute(self)?;
        decode::decode(self)?;
        fetch::fetch(self)?;

        self.pipeline.advance();
        self.clock += 1;
        Ok(())
    }

    /// The final, corrected PC (§4.4): the fetch PC minus 4 bytes for
    /// every instruction still occupying a pre-`Ex` slot when the
    /// simulation stopped (instructions fetched but never actually
    /// retired into the architectural stream).
    pub fn corrected_pc(&self) -> u32 {
        let unresolved = self.pipeline.occupants_before(Stage::Ex) as u32;
        self.pc.wrapping_sub(unresolved * 4)
    }
}
