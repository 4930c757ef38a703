//! The MEM stage (§4.2).
//!
//! Only `LDW`/`STW` occupants do anything here. `STW`'s store value is
//! read straight from the register file rather than through the
//! forwarding annotation: by construction the producer that could race
//! it has already retired (its `Wb` runs earlier in the same tick,
//! before `Mem`, whenever it is close enough in the pipeline to matter),
//! so the architectural value is always current (§4.2, §9 open question
//! 2).

use crate::common::error::SimError;
use crate::core::machine::MachineState;
use crate::core::record::Stage;
use crate::isa::Opcode;

pub fn memory_access(machine: &mut MachineState) -> Result<(), SimError> {
    let is_pipelined = machine.mode.is_pipelined();
    let target = Stage::Mem;

    let Some(mut occ) = machine.pipeline.occupant(is_pipelined, target).cloned() else {
        return Ok(());
    };

    match occ.opcode {
        Some(Opcode::Ldw) => {
            occ.mdr = machine.memory.read_word(occ.alu_out)?;
        }
        Some(Opcode::Stw) => {
            let store_val = machine.regs.read(occ.rt);
            machine.memory.write_word(occ.alu_out, store_val)?;
        }
        _ => {}
    }

    if machine.trace {
        eprintln!(
            "[{:>6}] MEM  pc={:#010x} word={:#010x} addr={:#010x}",
            machine.clock, occ.pc, occ.word, occ.alu_out
        );
    }

    if let Some(slot) = machine.pipeline.occupant_mut(is_pipelined, target) {
        *slot = occ;
    }
    Ok(())
}
