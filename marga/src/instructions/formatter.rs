//! Instruction text formatting.
//!
//! Instruction kinds are produced by the generator; the words shown to the
//! traveler come from an [`InstructionFormatter`], so a localized or
//! voice-oriented formatter can be swapped in without touching routing.

use crate::core::{Direction, InstructionKind};

/// Everything a formatter needs to describe one hop.
#[derive(Debug, Clone, Copy)]
pub struct Hop<'a> {
    pub kind: InstructionKind,
    /// Display name of the hop origin.
    pub from: &'a str,
    /// Display name of the hop target.
    pub to: &'a str,
    /// Hop length in meters.
    pub distance: f32,
    /// Number of hops in the whole route.
    pub total_hops: usize,
}

/// Turns a hop into human-readable text.
pub trait InstructionFormatter: Send + Sync {
    fn describe(&self, hop: &Hop<'_>) -> String;
}

/// Plain English formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl InstructionFormatter for PlainFormatter {
    fn describe(&self, hop: &Hop<'_>) -> String {
        match hop.kind {
            InstructionKind::Start => {
                format!("Start at {} and head to {}", hop.from, hop.to)
            }
            InstructionKind::Straight => {
                format!("Continue to {} ({:.0} m)", hop.to, hop.distance)
            }
            InstructionKind::Turn { direction } => match direction {
                Direction::Up => format!("Go up to {}", hop.to),
                Direction::Down => format!("Go down to {}", hop.to),
                Direction::Forward => format!("Continue to {}", hop.to),
            },
            InstructionKind::Destination if hop.total_hops == 1 => {
                format!("Go directly to {}", hop.to)
            }
            InstructionKind::Destination => format!("Arrive at {}", hop.to),
            InstructionKind::Reroute => {
                format!("Rerouting: head from {} to {}", hop.from, hop.to)
            }
        }
    }
}
