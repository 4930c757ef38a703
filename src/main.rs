//! MIPS Lite pipeline simulator CLI.
//!
//! Parses the command line, loads a memory image, runs the machine to
//! completion, and prints the final report (§6). Any `SimError`
//! surfacing from configuration, loading, or the tick loop itself is
//! fatal: printed to stderr, non-zero exit (§7).

use std::process;

use mips_lite::common::error::SimError;
use mips_lite::config::{Config, Mode};
use mips_lite::core::{MachineState, Memory};
use mips_lite::sim::loader;
use mips_lite::stats::Report;

fn run() -> Result<(), SimError> {
    let config = Config::from_args()?;

    let words = loader::load_image(&config.image_path)?;
    let mut memory = Memory::new(config.memory_capacity);
    memory.load(&words).map_err(|_| {
        SimError::Config(format!(
            "memory image '{}' has {} words, exceeding capacity {}",
            config.image_path,
            words.len(),
            config.memory_capacity
        ))
    })?;

    println!("MIPS Lite Simulator");
    println!("-------------------");
    println!("image:     {}", config.image_path);
    println!(
        "mode:      {}",
        match config.mode {
            Mode::NonPipelined => "0 (non-pipelined)",
            Mode::PipelinedNoForward => "1 (pipelined, no forwarding)",
            Mode::PipelinedForward => "2 (pipelined, forwarding)",
        }
    );
    println!("loaded:    {} words", memory.size());
    println!("-------------------");

    let mut machine = MachineState::new(config.mode, memory, config.trace);

    while !machine.is_done() {
        machine.tick()?;
    }

    Report::capture(&machine).print();
    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
