//! The pipeline latch array and the hazard/forwarding unit that inspects it.

pub mod hazards;
pub mod latches;

pub use hazards::{resolve_hazard, Resolution};
pub use latches::Latches;
