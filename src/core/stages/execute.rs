//! The EX stage (§4.2).
//!
//! Computes the ALU result (or effective address, or branch outcome)
//! for the occupant at stage `Ex`, applying any forwarded operand the
//! hazard unit annotated at `Id`. Instruction-class counts (§6) are
//! incremented here, exactly once per instruction that actually reaches
//! this point — a branch-shadow instruction squashed while still
//! upstream of `Ex` never runs this function at all, so it never counts
//! (open question 4, resolved in `DESIGN.md`).

use crate::common::error::SimError;
use crate::core::machine::MachineState;
use crate::core::record::Stage;
use crate::isa::{apply_op, InstrType, Opcode};

pub fn execute(machine: &mut MachineState) -> Result<(), SimError> {
    let is_pipelined = machine.mode.is_pipelined();
    let target = Stage::Ex;

    let Some(mut occ) = machine.pipeline.occupant(is_pipelined, target).cloned() else {
        return Ok(());
    };

    let opcode = occ.opcode.expect("instruction reaching EX must have been decoded");
    let kind = occ.kind.expect("instruction reaching EX must have been decoded");

    let rs_val = occ.forward.rs.unwrap_or_else(|| machine.regs.read(occ.rs));
    let rt_val = occ.forward.rt.unwrap_or_else(|| machine.regs.read(occ.rt));

    let mut branch_taken = false;
    match kind {
        InstrType::R => occ.alu_out = apply_op(rs_val, rt_val, opcode),
        InstrType::IImm => occ.alu_out = apply_op(rs_val, occ.imm as u32, opcode),
        InstrType::IMem => occ.alu_out = rs_val.wrapping_add(occ.imm as u32),
        InstrType::J => {
            match opcode {
                Opcode::Bz => {
                    if rs_val == 0 {
                        machine.pc = occ.alu_out;
                        branch_taken = true;
                    }
                }
                Opcode::Beq => {
                    if rs_val == rt_val {
                        machine.pc = occ.alu_out;
                        branch_taken = true;
                    }
                }
                Opcode::Jr => {
                    machine.pc = rs_val;
                    branch_taken = true;
                }
                Opcode::Halt => {
                    machine.halt = true;
                    machine.no_more_fetch = true;
                    branch_taken = true;
                }
                _ => unreachable!("non-control opcode decoded as J-type"),
            }
            // J-type instructions complete entirely in EX; there is
            // nothing left for MEM/WB to do, so retire on the next
            // advance rather than continuing to occupy slots.
            occ.squashed = true;
        }
    }

    if branch_taken && is_pipelined {
        machine.pipeline.flush_before(Stage::Ex);
    }

    machine.counts.record(opcode.class());

    if machine.trace {
        eprintln!(
            "[{:>6}] EX   pc={:#010x} word={:#010x} alu_out={:#010x}{}",
            machine.clock,
            occ.pc,
            occ.word,
            occ.alu_out,
            if branch_taken { " flush" } else { "" }
        );
    }

    if let Some(slot) = machine.pipeline.occupant_mut(is_pipelined, target) {
        *slot = occ;
    }
    Ok(())
}
