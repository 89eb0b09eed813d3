//! Turn-by-turn instructions.
//!
//! - [`InstructionGenerator`]: node path → typed [`NavigationInstruction`]s and
//!   duration estimates
//! - [`InstructionFormatter`]: swappable text layer
//!
//! [`NavigationInstruction`]: crate::core::NavigationInstruction

mod formatter;
mod generator;

pub use formatter::{Hop, InstructionFormatter, PlainFormatter};
pub use generator::{InstructionGenerator, TimingConfig};
