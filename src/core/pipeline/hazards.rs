//! The hazard-detection/forwarding unit (§4.3).
//!
//! Inspects the producers currently sitting in `Ex`, `Mem`, and `Wb` (in
//! that order — the closest producer wins) against the operand registers
//! an instruction in `Id` is about to read, and decides whether EX can
//! proceed with a forwarded value or whether the pipeline must stall.

use crate::core::pipeline::latches::Latches;
use crate::core::record::{InstructionRecord, Stage};
use crate::isa::Opcode;

/// Outcome of a hazard check against one consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Resolution {
    pub stall: bool,
    pub forward_rs: Option<u32>,
    pub forward_rt: Option<u32>,
}

impl Resolution {
    pub fn none() -> Self {
        Resolution::default()
    }

    pub fn needs_stall(self) -> bool {
        self.stall
    }
}

/// The architectural registers `consumer` will read at EX, in `(rs, rt)`
/// order. `STW` reads both: `rs` as the base address, `rt` as the value
/// to store.
fn operands_read(consumer: &InstructionRecord) -> (Option<u8>, Option<u8>) {
    let Some(opcode) = consumer.opcode else {
        return (None, None);
    };
    match opcode {
        Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Or | Opcode::And | Opcode::Xor => {
            (Some(consumer.rs), Some(consumer.rt))
        }
        Opcode::Addi | Opcode::Subi | Opcode::Muli | Opcode::Ori | Opcode::Andi | Opcode::Xori => {
            (Some(consumer.rs), None)
        }
        Opcode::Ldw => (Some(consumer.rs), None),
        Opcode::Stw => (Some(consumer.rs), Some(consumer.rt)),
        Opcode::Beq => (Some(consumer.rs), Some(consumer.rt)),
        Opcode::Bz => (Some(consumer.rs), None),
        Opcode::Jr => (Some(consumer.rs), None),
        Opcode::Halt => (None, None),
    }
}

/// Whether `producer` has a value ready to forward *right now* (this is
/// called during `Id`, after `Ex`/`Mem`/`Wb` have already run this tick,
/// so a producer sitting in `Ex` already has `alu_out` computed, and one
/// sitting in `Mem` already has `mdr` loaded).
fn forwardable_value(producer: &InstructionRecord) -> Option<u32> {
    match producer.opcode? {
        Opcode::Ldw => {
            if producer.stage.index() >= Stage::Mem.index() {
                Some(producer.mdr)
            } else {
                None
            }
        }
        _ if producer.writes_register().is_some() => {
            if producer.stage.index() >= Stage::Ex.index() {
                Some(producer.alu_out)
            } else {
                None
            }
        }
        _ => None,
    }
}

/// Finds the closest producer of `reg` among `Ex`, `Mem`, `Wb` (checked
/// in that order), skipping non-producers (`STW`, `J`-type, squashed
/// occupants).
fn find_producer<'a>(latches: &'a Latches, reg: u8) -> Option<&'a InstructionRecord> {
    for stage in [Stage::Ex, Stage::Mem, Stage::Wb] {
        if let Some(occ) = latches.peek(stage) {
            if !occ.squashed && occ.writes_register() == Some(reg) {
                return Some(occ);
            }
        }
    }
    None
}

/// Resolves RAW hazards for `consumer`, currently in `Id`, against the
/// instructions ahead of it in the pipeline.
///
/// With forwarding disabled, a producer still in `Ex` or `Mem` forces a
/// stall — but one already in `Wb` does not, since §5 guarantees `Wb`
/// completes before `Ex` reads the register file in the same tick, so by
/// the time this consumer reaches `Ex` the producer's write is already
/// visible through the architectural register file. With forwarding
/// enabled, a producer with a value ready yields a forward; one without
/// (the load-use case, where `LDW` is still in `Ex`) still forces exactly
/// one stall cycle, since the load's word is not available until `Mem`.
pub fn resolve_hazard(
    consumer: &InstructionRecord,
    latches: &Latches,
    forwarding_enabled: bool,
) -> Resolution {
    let (rs, rt) = operands_read(consumer);
    let mut result = Resolution::none();

    for (reg, slot) in [(rs, &mut result.forward_rs), (rt, &mut result.forward_rt)] {
        let Some(reg) = reg else { continue };
        let Some(producer) = find_producer(latches, reg) else {
            continue;
        };

        if !forwarding_enabled {
            if producer.stage.index() < Stage::Wb.index() {
                result.stall = true;
            }
            continue;
        }

        match forwardable_value(producer) {
            Some(value) => *slot = Some(value),
            None => result.stall = true,
        }
    }

    if result.stall {
        result.forward_rs = None;
        result.forward_rt = None;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::record::InstructionRecord;

    fn producer(opcode: Opcode, stage: Stage, rd: u8, rt: u8, alu_out: u32, mdr: u32) -> InstructionRecord {
        let mut rec = InstructionRecord::fetched(0, 0);
        rec.opcode = Some(opcode);
        rec.stage = stage;
        rec.rd = rd;
        rec.rt = rt;
        rec.alu_out = alu_out;
        rec.mdr = mdr;
        rec
    }

    fn consumer(opcode: Opcode, rs: u8, rt: u8) -> InstructionRecord {
        let mut rec = InstructionRecord::fetched(0, 0);
        rec.opcode = Some(opcode);
        rec.stage = Stage::Id;
        rec.rs = rs;
        rec.rt = rt;
        rec
    }

    #[test]
    fn no_hazard_when_registers_disjoint() {
        let mut lat = Latches::new(true);
        inject(&mut lat, Stage::Ex, producer(Opcode::Add, Stage::Ex, 9, 0, 100, 0));
        let cons = consumer(Opcode::Addi, 3, 0);
        let res = resolve_hazard(&cons, &lat, true);
        assert!(!res.stall);
        assert_eq!(res.forward_rs, None);
    }

    fn inject(lat: &mut Latches, stage: Stage, rec: InstructionRecord) {
        lat.test_inject(stage, rec);
    }

    #[test]
    fn forwards_from_ex_when_enabled() {
        let mut lat = Latches::new(true);
        inject(&mut lat, Stage::Ex, producer(Opcode::Add, Stage::Ex, 3, 0, 77, 0));
        let cons = consumer(Opcode::Addi, 3, 0);
        let res = resolve_hazard(&cons, &lat, true);
        assert!(!res.stall);
        assert_eq!(res.forward_rs, Some(77));
    }

    #[test]
    fn stalls_when_forwarding_disabled_even_with_producer_in_ex() {
        let mut lat = Latches::new(true);
        inject(&mut lat, Stage::Ex, producer(Opcode::Add, Stage::Ex, 3, 0, 77, 0));
        let cons = consumer(Opcode::Addi, 3, 0);
        let res = resolve_hazard(&cons, &lat, false);
        assert!(res.stall);
        assert_eq!(res.forward_rs, None);
    }

    #[test]
    fn no_forwarding_does_not_stall_for_a_producer_already_in_wb() {
        // §5: Wb completes before Ex reads the register file in the same
        // tick, so a producer that has reached Wb is already visible
        // architecturally by the time this consumer gets to Ex.
        let mut lat = Latches::new(true);
        inject(&mut lat, Stage::Wb, producer(Opcode::Add, Stage::Wb, 3, 0, 77, 0));
        let cons = consumer(Opcode::Addi, 3, 0);
        let res = resolve_hazard(&cons, &lat, false);
        assert!(!res.stall);
    }

    #[test]
    fn load_use_always_stalls_once_even_with_forwarding() {
        let mut lat = Latches::new(true);
        inject(&mut lat, Stage::Ex, producer(Opcode::Ldw, Stage::Ex, 0, 3, 0, 0));
        let cons = consumer(Opcode::Add, 3, 0);
        let res = resolve_hazard(&cons, &lat, true);
        assert!(res.stall);
    }

    #[test]
    fn load_forwards_from_mem_once_data_is_ready() {
        let mut lat = Latches::new(true);
        inject(&mut lat, Stage::Mem, producer(Opcode::Ldw, Stage::Mem, 0, 3, 0, 55));
        let cons = consumer(Opcode::Add, 3, 0);
        let res = resolve_hazard(&cons, &lat, true);
        assert!(!res.stall);
        assert_eq!(res.forward_rs, Some(55));
    }

    #[test]
    fn stw_forwards_both_operands_independently() {
        let mut lat = Latches::new(true);
        inject(&mut lat, Stage::Ex, producer(Opcode::Add, Stage::Ex, 1, 0, 10, 0));
        inject(&mut lat, Stage::Mem, producer(Opcode::Add, Stage::Mem, 2, 0, 20, 0));
        let cons = consumer(Opcode::Stw, 1, 2);
        let res = resolve_hazard(&cons, &lat, true);
        assert_eq!(res.forward_rs, Some(10));
        assert_eq!(res.forward_rt, Some(20));
    }

    #[test]
    fn closest_producer_wins() {
        let mut lat = Latches::new(true);
        inject(&mut lat, Stage::Ex, producer(Opcode::Add, Stage::Ex, 3, 0, 1, 0));
        inject(&mut lat, Stage::Wb, producer(Opcode::Add, Stage::Wb, 3, 0, 2, 0));
        let cons = consumer(Opcode::Addi, 3, 0);
        let res = resolve_hazard(&cons, &lat, true);
        assert_eq!(res.forward_rs, Some(1));
    }

    #[test]
    fn stw_itself_is_not_a_producer() {
        let mut lat = Latches::new(true);
        inject(&mut lat, Stage::Ex, producer(Opcode::Stw, Stage::Ex, 0, 3, 999, 0));
        let cons = consumer(Opcode::Addi, 3, 0);
        let res = resolve_hazard(&cons, &lat, true);
        assert!(!res.stall);
        assert_eq!(res.forward_rs, None);
    }
}
