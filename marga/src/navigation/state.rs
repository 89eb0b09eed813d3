//! Navigation session state.
//!
//! [`NavigationSession`] is owned by a single controller and mutated only
//! through it. Consumers read a [`SessionSnapshot`] copy.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::deviation::DeviationSeverity;
use crate::core::{NavigationInstruction, Route};
use crate::error::{NavError, NavErrorKind};

/// Session lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NavState {
    /// No route being followed.
    #[default]
    Idle,

    /// Waiting for a destination, or for a position fix to route from.
    SelectingDestination,

    /// Computing a route.
    Calculating,

    /// Following a route; position updates trigger a merge.
    Navigating,

    /// Destination reached.
    Arrived,

    /// Last route computation failed; see the session error.
    Error,
}

impl NavState {
    /// Check if a route is being computed or followed.
    pub fn is_active(&self) -> bool {
        matches!(self, NavState::Calculating | NavState::Navigating)
    }

    /// Convert to string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            NavState::Idle => "IDLE",
            NavState::SelectingDestination => "SELECTING_DESTINATION",
            NavState::Calculating => "CALCULATING",
            NavState::Navigating => "NAVIGATING",
            NavState::Arrived => "ARRIVED",
            NavState::Error => "ERROR",
        }
    }
}

/// Error recorded in the session when entering [`NavState::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionError {
    pub kind: NavErrorKind,
    pub message: String,
}

impl From<&NavError> for SessionError {
    fn from(e: &NavError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

/// Mutable state of one traveler's navigation.
#[derive(Debug, Clone, Default)]
pub struct NavigationSession {
    pub current_location_id: Option<String>,

    pub destination_location_id: Option<String>,

    /// Where the current trip began. Set once when navigation starts.
    pub original_start_location_id: Option<String>,

    pub active_route: Option<Route>,

    pub state: NavState,

    /// Index into `active_route.path` of the current location.
    pub current_step_index: usize,

    /// Every distinct location reported, in order. Informational only.
    pub traversed_path: Vec<String>,

    pub navigation_start_time: Option<Instant>,

    pub error: Option<SessionError>,

    /// Severity of the last off-route update.
    pub deviation: DeviationSeverity,

    /// Instruction for the hop leaving the current location.
    pub current_instruction: Option<NavigationInstruction>,
}

impl NavigationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_navigating(&self) -> bool {
        self.state == NavState::Navigating
    }

    /// Distance left on the active route (meters).
    pub fn remaining_distance(&self) -> Option<f32> {
        self.active_route
            .as_ref()
            .map(|r| r.remaining_distance(self.current_step_index))
    }

    /// Fraction of the active route already covered.
    pub fn progress(&self) -> Option<f32> {
        self.active_route
            .as_ref()
            .map(|r| r.progress(self.current_step_index))
    }

    /// Consumer-facing copy of the session.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_location_id: self.current_location_id.clone(),
            destination_location_id: self.destination_location_id.clone(),
            state: self.state,
            active_route: self.active_route.clone(),
            current_step_index: self.current_step_index,
            current_instruction: self.current_instruction.clone(),
            deviation: self.deviation,
            error: self.error.clone(),
            remaining_distance: self.remaining_distance(),
            elapsed_s: self
                .navigation_start_time
                .map(|t| t.elapsed().as_secs_f32()),
        }
    }
}

/// Read-only view of a session, published after every command.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub current_location_id: Option<String>,
    pub destination_location_id: Option<String>,
    pub state: NavState,
    pub active_route: Option<Route>,
    pub current_step_index: usize,
    pub current_instruction: Option<NavigationInstruction>,
    pub deviation: DeviationSeverity,
    pub error: Option<SessionError>,
    pub remaining_distance: Option<f32>,
    /// Seconds since navigation started.
    pub elapsed_s: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nav_state() {
        assert_eq!(NavState::default(), NavState::Idle);
        assert!(NavState::Navigating.is_active());
        assert!(NavState::Calculating.is_active());
        assert!(!NavState::Arrived.is_active());
        assert!(!NavState::Error.is_active());
        assert_eq!(NavState::SelectingDestination.as_str(), "SELECTING_DESTINATION");
    }

    #[test]
    fn test_session_error_from_nav_error() {
        let err = NavError::Unreachable {
            from: "a".into(),
            to: "b".into(),
        };
        let recorded = SessionError::from(&err);

        assert_eq!(recorded.kind, NavErrorKind::Unreachable);
        assert_eq!(recorded.message, "No route from a to b");
    }

    #[test]
    fn test_empty_session_snapshot() {
        let session = NavigationSession::new();
        let snapshot = session.snapshot();

        assert_eq!(snapshot, SessionSnapshot::default());
        assert!(session.remaining_distance().is_none());
        assert!(!session.is_navigating());
    }
}
