//! Final report and statistics (§6).
//!
//! Collects everything the run loop needs to hand back once the machine
//! is done, and renders it to stdout in the teacher's banner-and-field
//! style, adapted to the fields this system actually has (no cache or
//! branch-predictor section — those concepts don't exist here).

use crate::config::Mode;
use crate::core::machine::Counts;
use crate::core::MachineState;

/// A snapshot of everything the final report (§6) needs, taken once the
/// machine has stopped.
pub struct Report {
    pub mode: Mode,
    pub cycles: u64,
    pub final_pc: u32,
    pub total_stalls: u64,
    pub counts: Counts,
    pub registers: Vec<(u8, u32)>,
    pub memory: Vec<(usize, u32)>,
    pub halted: bool,
}

impl Report {
    /// Builds a report from a machine that has reached `is_done()`.
    /// Non-pipelined runs report 0 stalls (§4.5: hazards cannot occur
    /// there, so there is nothing to stall on).
    pub fn capture(machine: &MachineState) -> Self {
        Report {
            mode: machine.mode,
            cycles: machine.clock,
            final_pc: machine.corrected_pc(),
            total_stalls: if machine.mode.is_pipelined() {
                machine.pipeline.total_stalls()
            } else {
                0
            },
            counts: machine.counts,
            registers: machine.regs.written_entries().collect(),
            memory: machine.memory.written_entries().collect(),
            halted: machine.halt,
        }
    }

    /// Renders the report to stdout.
    pub fn print(&self) {
        let cyc = self.cycles.max(1);
        let ipc = self.counts.total as f64 / cyc as f64;
        let cpi = cyc as f64 / self.counts.total.max(1) as f64;

        println!("==========================================================");
        println!("MIPS LITE SIMULATION REPORT");
        println!("==========================================================");
        println!(
            "mode                     {}",
            match self.mode {
                Mode::NonPipelined => "non-pipelined",
                Mode::PipelinedNoForward => "pipelined, no forwarding",
                Mode::PipelinedForward => "pipelined, forwarding",
            }
        );
        println!("sim_cycles               {}", self.cycles);
        println!("final_pc                 {:#010x}", self.final_pc);
        println!("halted                   {}", self.halted);
        if self.mode.is_pipelined() {
            println!("total_stalls             {}", self.total_stalls);
        }
        println!("sim_ipc                  {ipc:.4}");
        println!("sim_cpi                  {cpi:.4}");
        println!("----------------------------------------------------------");
        println!("INSTRUCTION COUNTS");
        println!("  total                  {}", self.counts.total);
        println!("  arithmetic             {}", self.counts.arithmetic);
        println!("  logical                {}", self.counts.logical);
        println!("  memory                 {}", self.counts.memory);
        println!("  control                {}", self.counts.control);
        println!("----------------------------------------------------------");
        println!("REGISTERS (ever written)");
        if self.registers.is_empty() {
            println!("  (none)");
        }
        for (idx, val) in &self.registers {
            println!("  R{idx:<3}                   {val:#010x} ({val})");
        }
        println!("----------------------------------------------------------");
        println!("MEMORY (ever written)");
        if self.memory.is_empty() {
            println!("  (none)");
        }
        for (idx, val) in &self.memory {
            println!("  [{idx:<4}]                 {val:#010x} ({val})");
        }
        println!("==========================================================");
    }
}
