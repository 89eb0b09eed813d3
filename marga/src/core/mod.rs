//! Core data model: locations, paths and routes.

mod location;
mod route;

pub use location::{Location, LocationType, Position};
pub use route::{Direction, GraphPath, InstructionKind, NavigationInstruction, Route};
