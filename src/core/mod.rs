//! The architectural core: registers, memory, the instruction record, the
//! pipeline latch array, the hazard/forwarding unit, and the five stage
//! functions that operate on them.

pub mod machine;
pub mod memory;
pub mod pipeline;
pub mod record;
pub mod register_file;
pub mod stages;

pub use machine::MachineState;
pub use memory::Memory;
pub use record::{Forwarding, InstructionRecord, Stage};
pub use register_file::RegisterFile;
