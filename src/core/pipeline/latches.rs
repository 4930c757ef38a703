//! The five-slot latch array the instruction stream travels through.
//!
//! One slot per stage (§4.1): `[If, Id, Ex, Mem, Wb]`, each holding at
//! most one `InstructionRecord`. In non-pipelined mode every instruction
//! occupies only the `If` slot for its entire lifetime — `stage` still
//! cycles `If -> Id -> Ex -> Mem -> Wb` as a phase indicator, but the
//! occupant never physically moves to another slot.

use crate::core::record::{InstructionRecord, Stage};

const NUM_SLOTS: usize = 5;

pub struct Latches {
    slots: [Option<InstructionRecord>; NUM_SLOTS],
    is_pipelined: bool,
    stalled_this_tick: bool,
    total_stalls: u64,
}

impl Latches {
    pub fn new(is_pipelined: bool) -> Self {
        Latches {
            slots: [None, None, None, None, None],
            is_pipelined,
            stalled_this_tick: false,
            total_stalls: 0,
        }
    }

    pub fn is_pipelined(&self) -> bool {
        self.is_pipelined
    }

    pub fn total_stalls(&self) -> u64 {
        self.total_stalls
    }

    pub fn peek(&self, stage: Stage) -> Option<&InstructionRecord> {
        self.slots[stage.index()].as_ref()
    }

    pub fn peek_mut(&mut self, stage: Stage) -> Option<&mut InstructionRecord> {
        self.slots[stage.index()].as_mut()
    }

    /// Whether a stall was recorded during the current, not-yet-advanced
    /// tick. Exposed for trace output only.
    pub fn stalled(&self) -> bool {
        self.stalled_this_tick
    }

    /// The occupant whose `.stage` field is `target`, or `None` if that
    /// slot is empty, holds an instruction at a different stage, or
    /// holds a squashed instruction (§4.2: "Each stage function is a
    /// no-op when its slot is empty or when its occupant's stage field
    /// doesn't match").
    ///
    /// In pipelined mode the physical slot is `target` itself; in
    /// non-pipelined mode every live instruction stays physically in the
    /// `If` slot for its whole lifetime and `stage` tracks phase instead
    /// (§4.5), so the physical slot to inspect is always `If`.
    pub fn occupant(&self, is_pipelined: bool, target: Stage) -> Option<&InstructionRecord> {
        let slot = if is_pipelined { target } else { Stage::If };
        match self.slots[slot.index()].as_ref() {
            Some(occ) if occ.stage == target && !occ.squashed => Some(occ),
            _ => None,
        }
    }

    /// Mutable counterpart of [`Latches::occupant`].
    pub fn occupant_mut(&mut self, is_pipelined: bool, target: Stage) -> Option<&mut InstructionRecord> {
        let slot = if is_pipelined { target } else { Stage::If };
        match self.slots[slot.index()].as_mut() {
            Some(occ) if occ.stage == target && !occ.squashed => Some(occ),
            _ => None,
        }
    }

    /// Whether the `If` slot is free to receive a newly fetched
    /// instruction this tick.
    pub fn can_fetch(&self) -> bool {
        self.slots[Stage::If.index()].is_none()
    }

    /// Places a freshly fetched instruction into the `If` slot. Panics if
    /// the slot is already occupied — callers must check `can_fetch`
    /// first.
    pub fn fetch_in(&mut self, record: InstructionRecord) {
        assert!(self.can_fetch(), "If slot already occupied");
        self.slots[Stage::If.index()] = Some(record);
    }

    /// Records that decode-stage hazard detection held `If`/`Id` in place
    /// this tick, inserting a bubble ahead of `Ex`.
    pub fn stall(&mut self) {
        self.stalled_this_tick = true;
        self.total_stalls += 1;
    }

    /// Marks every occupant strictly upstream of `from_stage` as
    /// squashed, so the next `advance()` retires it without further
    /// stage logic running on it. Used for taken branches/jumps resolved
    /// at EX (§4.4).
    pub fn flush_before(&mut self, from_stage: Stage) {
        for slot in self.slots.iter_mut() {
            if let Some(occupant) = slot {
                if occupant.stage.index() < from_stage.index() {
                    occupant.squashed = true;
                }
            }
        }
    }

    /// Advances every occupant by one stage, retiring those that just
    /// completed `Wb` or were squashed, and holding `If`/`Id` in place if
    /// a hazard stall was recorded this tick. Must run after every stage
    /// function has executed for the current cycle.
    ///
    /// Iterates from `Wb` down to `If` so that, in pipelined mode, the
    /// destination slot for a move has always already been vacated by
    /// this same pass.
    pub fn advance(&mut self) {
        for i in (0..NUM_SLOTS).rev() {
            let Some(occupant) = self.slots[i].take() else {
                continue;
            };
            let stage = Stage::from_index(i);

            if stage == Stage::Wb || occupant.squashed {
                continue;
            }

            if self.stalled_this_tick && matches!(stage, Stage::If | Stage::Id) {
                self.slots[i] = Some(occupant);
                continue;
            }

            let mut advanced = occupant;
            advanced.stage = advanced.stage.next();
            let dest = if self.is_pipelined { i + 1 } else { 0 };
            self.slots[dest] = Some(advanced);
        }

        self.stalled_this_tick = false;
    }

    /// Whether every slot is empty (the pipeline has fully drained).
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Number of still-occupied slots upstream of (and including) `Ex`,
    /// used for the final PC correction (§4.4).
    pub fn occupants_before(&self, stage: Stage) -> usize {
        self.slots
            .iter()
            .filter_map(|s| s.as_ref())
            .filter(|occ| !occ.squashed && occ.stage.index() < stage.index())
            .count()
    }
}

#[cfg(test)]
impl Latches {
    /// Directly places `record` into `stage`'s slot, bypassing the
    /// normal fetch/advance flow. Used by other modules' hazard-unit
    /// tests to set up arbitrary pipeline snapshots.
    pub fn test_inject(&mut self, stage: Stage, record: InstructionRecord) {
        self.slots[stage.index()] = Some(record);
    }
}
