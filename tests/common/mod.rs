//! Shared encoding helpers and a tiny end-to-end run harness for the
//! integration tests.

use mips_lite::config::Mode;
use mips_lite::core::{MachineState, Memory};

pub const ADD: u32 = 0x00;
pub const ADDI: u32 = 0x01;
pub const SUB: u32 = 0x02;
pub const SUBI: u32 = 0x03;
pub const LDW: u32 = 0x0C;
pub const STW: u32 = 0x0D;
pub const BZ: u32 = 0x0E;
pub const BEQ: u32 = 0x0F;
pub const JR: u32 = 0x10;
pub const HALT: u32 = 0x11;

/// Encodes an R-type word: opcode, rs, rt, rd.
pub fn r(opcode: u32, rs: u32, rt: u32, rd: u32) -> u32 {
    (opcode << 26) | (rs << 21) | (rt << 16) | (rd << 11)
}

/// Encodes a non-R-type word: opcode, rs, rt, 16-bit signed immediate.
pub fn i(opcode: u32, rs: u32, rt: u32, imm: i16) -> u32 {
    (opcode << 26) | (rs << 21) | (rt << 16) | (imm as u16 as u32)
}

/// Runs `program` (plus a separate `data` segment loaded after it, if
/// any) to completion under `mode` and returns the finished machine.
pub fn run_program(program: &[u32], mode: Mode) -> MachineState {
    run_with_data(program, &[], mode)
}

pub fn run_with_data(program: &[u32], data: &[u32], mode: Mode) -> MachineState {
    let mut words = program.to_vec();
    words.extend_from_slice(data);

    let mut memory = Memory::new(1024);
    memory.load(&words).unwrap();

    let mut machine = MachineState::new(mode, memory, false);
    while !machine.is_done() {
        machine.tick().expect("tick should not fail on a well-formed test program");
    }
    machine
}

pub const ALL_MODES: [Mode; 3] = [Mode::NonPipelined, Mode::PipelinedNoForward, Mode::PipelinedForward];
