//! The quantified invariants from §8, checked across a handful of
//! synthetic programs and all three operating modes.

mod common;

use common::*;
use mips_lite::config::Mode;

fn counts_partition_exactly(m: &mips_lite::core::MachineState) {
    let c = &m.counts;
    assert_eq!(c.total, c.arithmetic + c.logical + c.memory + c.control);
}

#[test]
fn counts_total_equals_sum_of_class_counts() {
    let program = [
        i(ADDI, 0, 1, 1),
        r(ADD, 1, 1, 2),
        i(SUBI, 2, 3, 1),
        i(STW, 0, 1, 8),
        i(LDW, 0, 4, 8),
        i(BZ, 0, 0, 1),
        r(HALT, 0, 0, 0),
        r(ADD, 0, 0, 0),
    ];

    for mode in ALL_MODES {
        let m = run_program(&program, mode);
        counts_partition_exactly(&m);
    }
}

#[test]
fn advancing_an_empty_pipeline_stays_empty_and_done() {
    use mips_lite::core::Memory;
    let memory = Memory::new(16);
    let mut m = mips_lite::core::MachineState::new(Mode::PipelinedForward, memory, false);
    // No program loaded: the very first fetch attempt finds nothing in
    // range and immediately marks no_more_fetch, so the machine is done
    // before anything ever occupies a slot.
    assert!(m.pipeline.is_empty());
    m.tick().unwrap();
    assert!(m.pipeline.is_empty());
    assert!(m.is_done());
}

#[test]
fn no_forwarding_mode_never_needs_fewer_stalls_than_forwarding_mode() {
    let programs: &[&[u32]] = &[
        &[i(ADDI, 0, 1, 5), r(ADD, 1, 1, 2), r(HALT, 0, 0, 0)],
        &[
            i(ADDI, 0, 1, 1),
            i(ADDI, 0, 2, 2),
            i(ADDI, 0, 3, 3),
            r(ADD, 1, 2, 4),
            r(ADD, 4, 3, 5),
            r(HALT, 0, 0, 0),
        ],
        &[i(ADDI, 0, 1, 1), r(HALT, 0, 0, 0)],
    ];

    for program in programs {
        let no_fwd = run_program(program, Mode::PipelinedNoForward);
        let fwd = run_program(program, Mode::PipelinedForward);
        assert!(fwd.pipeline.total_stalls() <= no_fwd.pipeline.total_stalls());
    }
}

#[test]
fn at_most_one_occupant_per_slot_is_upheld_by_construction() {
    // The latch array's `Option<InstructionRecord>` representation makes
    // "more than one occupant per slot" a type error, not a runtime
    // state to check — this test instead confirms a long-running
    // program never panics (e.g. on a `fetch_in` double-occupancy
    // assertion) across all three modes.
    let program = [
        i(ADDI, 0, 1, 1),
        i(ADDI, 0, 2, 1),
        i(ADDI, 0, 3, 1),
        i(ADDI, 0, 4, 1),
        r(ADD, 1, 2, 5),
        r(ADD, 3, 4, 6),
        r(ADD, 5, 6, 7),
        i(STW, 0, 7, 20),
        i(LDW, 0, 8, 20),
        r(HALT, 0, 0, 0),
    ];

    for mode in ALL_MODES {
        let m = run_program(&program, mode);
        assert!(m.is_done());
    }
}
