//! The WB stage (§4.2).
//!
//! Writes the instruction's result into the register file and marks the
//! destination register modified. `STW` and `J`-type instructions never
//! reach this stage (they retire at `Mem`/`Ex` respectively with nothing
//! left to write back).

use crate::common::error::SimError;
use crate::core::machine::MachineState;
use crate::core::record::Stage;
use crate::isa::{InstrType, Opcode};

pub fn write_back(machine: &mut MachineState) -> Result<(), SimError> {
    let is_pipelined = machine.mode.is_pipelined();
    let target = Stage::Wb;

    let Some(occ) = machine.pipeline.occupant(is_pipelined, target).cloned() else {
        return Ok(());
    };

    match occ.opcode {
        Some(Opcode::Ldw) => machine.regs.write(occ.rt, occ.mdr),
        Some(op) if op.instr_type() == InstrType::R => machine.regs.write(occ.rd, occ.alu_out),
        Some(op) if op.instr_type() == InstrType::IImm => machine.regs.write(occ.rt, occ.alu_out),
        _ => {}
    }

    if machine.trace {
        eprintln!(
            "[{:>6}] WB   pc={:#010x} word={:#010x}",
            machine.clock, occ.pc, occ.word
        );
    }

    Ok(())
}
