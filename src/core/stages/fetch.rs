//! The IF stage (§4.2).
//!
//! Fetches the next word at the PC into the `If` slot, provided that
//! slot is free, the machine hasn't halted, and the PC still points into
//! the loaded program.

use crate::common::error::SimError;
use crate::core::machine::MachineState;
use crate::core::record::InstructionRecord;

pub fn fetch(machine: &mut MachineState) -> Result<(), SimError> {
    if machine.halt || !machine.pipeline.can_fetch() {
        return Ok(());
    }

    let idx = (machine.pc / 4) as usize;
    if !machine.memory.in_loaded_range(idx) {
        machine.no_more_fetch = true;
        return Ok(());
    }

    let pc = machine.pc;
    let word = machine.memory.read_word(pc)?;
    machine.pipeline.fetch_in(InstructionRecord::fetched(word, pc));
    machine.pc = machine.pc.wrapping_add(4);

    if machine.trace {
        eprintln!("[{:>6}] IF   pc={pc:#010x} word={word:#010x}", machine.clock);
    }
    Ok(())
}
