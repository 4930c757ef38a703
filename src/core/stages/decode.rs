//! The ID stage (§4.2).
//!
//! Decodes the occupant currently at stage `Id`, then — in either
//! pipelined mode — invokes the hazard/forwarding unit against the
//! instructions ahead of it in the pipeline.

use crate::common::error::SimError;
use crate::core::machine::MachineState;
use crate::core::pipeline::hazards::resolve_hazard;
use crate::core::record::Stage;
use crate::isa::{sign_extend16, InstrType, Opcode};

pub fn decode(machine: &mut MachineState) -> Result<(), SimError> {
    let is_pipelined = machine.mode.is_pipelined();
    let target = Stage::Id;

    let Some(mut occ) = machine.pipeline.occupant(is_pipelined, target).cloned() else {
        return Ok(());
    };

    let opcode = Opcode::decode(occ.word)?;
    if occ.word & (1 << 31) != 0 {
        eprintln!(
            "warning: bit 31 set in word {:#010x} fetched at pc {:#010x}; masked off per the 5-bit opcode field",
            occ.word, occ.pc
        );
    }

    let kind = opcode.instr_type();
    occ.opcode = Some(opcode);
    occ.kind = Some(kind);
    occ.rs = ((occ.word >> 21) & 0x1F) as u8;
    occ.rt = ((occ.word >> 16) & 0x1F) as u8;

    if kind == InstrType::R {
        occ.rd = ((occ.word >> 11) & 0x1F) as u8;
    } else {
        occ.imm = sign_extend16((occ.word & 0xFFFF) as u16);
        occ.alu_out = occ.pc.wrapping_add((occ.imm << 2) as u32);
    }

    if is_pipelined {
        let resolution = resolve_hazard(&occ, &machine.pipeline, machine.mode.forwarding_enabled());
        if resolution.needs_stall() {
            machine.pipeline.stall();
        } else {
            occ.forward.rs = resolution.forward_rs;
            occ.forward.rt = resolution.forward_rt;
        }
    }

    if machine.trace {
        eprintln!(
            "[{:>6}] ID   pc={:#010x} word={:#010x} stall={}",
            machine.clock,
            occ.pc,
            occ.word,
            is_pipelined && machine.pipeline.stalled()
        );
    }

    if let Some(slot) = machine.pipeline.occupant_mut(is_pipelined, target) {
        *slot = occ;
    }
    Ok(())
}
