//! Navigation state machine.
//!
//! The controller owns the session and is its only writer. Every operation
//! takes `&mut self`; concurrent producers go through
//! [`NavigationThread`](crate::threads::NavigationThread).
//!
//! ```text
//! Idle ──► SelectingDestination ──► Calculating ──► Idle (route ready)
//!  ▲                                     │
//!  │                                     └──► Error
//!  └── stop / clear ◄── Navigating ──► Arrived
//!                         │    ▲
//!                         └────┘ position update (merge)
//! ```

use std::time::Instant;

use super::deviation::DeviationSeverity;
use super::merger::{MergeInput, MergeOutcome, RouteMerger};
use super::state::{NavState, NavigationSession, SessionError, SessionSnapshot};
use super::tracker::{ManualTracker, PositionTracker};
use crate::config::MargaConfig;
use crate::core::{InstructionKind, Route};
use crate::error::NavError;
use crate::planning::{PathfindingEngine, SharedGraph};

/// Owns one navigation session and drives it through its states.
pub struct NavigationController {
    engine: PathfindingEngine,
    merger: RouteMerger,
    tracker: Box<dyn PositionTracker>,
    session: NavigationSession,
}

impl std::fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationController")
            .field("engine", &self.engine)
            .field("merger", &self.merger)
            .field("tracker", &"...")
            .field("session", &self.session)
            .finish()
    }
}

impl NavigationController {
    /// Controller with a manual tracker and default deviation thresholds.
    pub fn new(engine: PathfindingEngine) -> Self {
        Self {
            engine,
            merger: RouteMerger::default(),
            tracker: Box::new(ManualTracker::new()),
            session: NavigationSession::new(),
        }
    }

    /// Controller configured from a loaded config file.
    pub fn from_config(graph: SharedGraph, config: &MargaConfig) -> Result<Self, NavError> {
        let engine = PathfindingEngine::from_config(graph, config)?;
        Ok(Self::new(engine).with_merger(RouteMerger::new(config.deviation.clone())))
    }

    pub fn with_tracker(mut self, tracker: Box<dyn PositionTracker>) -> Self {
        self.tracker = tracker;
        self
    }

    pub fn with_merger(mut self, merger: RouteMerger) -> Self {
        self.merger = merger;
        self
    }

    pub fn engine(&self) -> &PathfindingEngine {
        &self.engine
    }

    pub fn session(&self) -> &NavigationSession {
        &self.session
    }

    pub fn state(&self) -> NavState {
        self.session.state
    }

    pub fn is_tracking(&self) -> bool {
        self.tracker.is_tracking()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.snapshot()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Enter destination selection.
    pub fn begin_destination_selection(&mut self) -> Result<(), NavError> {
        if self.session.state.is_active() {
            return Err(NavError::SessionState(format!(
                "cannot select a destination while {}",
                self.session.state.as_str()
            )));
        }

        self.session.error = None;
        self.transition(NavState::SelectingDestination);
        Ok(())
    }

    /// Record a position fix.
    ///
    /// While navigating this rebuilds the route through the merge. Otherwise,
    /// with a destination already chosen, a fresh route is calculated.
    pub fn set_current_location(&mut self, id: &str) -> Result<(), NavError> {
        self.require_location(id)?;

        self.session.current_location_id = Some(id.to_string());
        if self.session.traversed_path.last().map(String::as_str) != Some(id) {
            self.session.traversed_path.push(id.to_string());
        }

        match self.session.state {
            NavState::Navigating => self.reroute(),
            NavState::Idle | NavState::SelectingDestination | NavState::Error
                if self.session.destination_location_id.is_some() =>
            {
                self.calculate_route()
            }
            _ => Ok(()),
        }
    }

    /// Choose a destination.
    ///
    /// While navigating the route is merged toward the new destination and
    /// the original start is kept. Without a position fix the session waits
    /// in `SelectingDestination`.
    pub fn set_destination(&mut self, id: &str) -> Result<(), NavError> {
        self.require_location(id)?;

        log::info!("Destination set to {}", id);
        self.session.destination_location_id = Some(id.to_string());

        if self.session.is_navigating() {
            return self.reroute();
        }

        if self.session.current_location_id.is_some() {
            self.calculate_route()
        } else {
            self.session.active_route = None;
            self.session.current_instruction = None;
            self.transition(NavState::SelectingDestination);
            Ok(())
        }
    }

    /// Compute a route from the current location to the destination.
    pub fn calculate_route(&mut self) -> Result<(), NavError> {
        if self.session.is_navigating() {
            return Err(NavError::SessionState(
                "route is recomputed on every update while navigating".to_string(),
            ));
        }
        let (Some(from), Some(to)) = (
            self.session.current_location_id.clone(),
            self.session.destination_location_id.clone(),
        ) else {
            return Err(NavError::SessionState(
                "current location and destination are both required".to_string(),
            ));
        };

        self.transition(NavState::Calculating);

        match self.engine.route(&from, &to) {
            Ok(route) => {
                self.session.current_step_index = 0;
                self.session.current_instruction = route.instructions.first().cloned();
                self.session.active_route = Some(route);
                self.session.deviation = DeviationSeverity::None;
                self.session.error = None;
                self.transition(NavState::Idle);
                Ok(())
            }
            Err(e) => {
                self.session.active_route = None;
                self.session.current_instruction = None;
                Err(self.fail(e))
            }
        }
    }

    /// Begin following the active route.
    pub fn start_navigation(&mut self) -> Result<(), NavError> {
        if self.session.is_navigating() {
            return Err(NavError::SessionState(
                "navigation already in progress".to_string(),
            ));
        }
        let Some(current) = self.session.current_location_id.clone() else {
            return Err(NavError::SessionState("no current location".to_string()));
        };
        let Some(route) = self.session.active_route.as_ref() else {
            return Err(NavError::SessionState("no route calculated".to_string()));
        };

        // Route left over from an earlier trip
        if route.start_id != current {
            self.calculate_route()?;
        }

        self.session.original_start_location_id = Some(current.clone());
        self.session.current_step_index = 0;
        self.session.navigation_start_time = Some(Instant::now());
        self.session.deviation = DeviationSeverity::None;
        self.session.error = None;
        self.session.current_instruction = self
            .session
            .active_route
            .as_ref()
            .and_then(|r| r.instruction_at(0).cloned());

        self.tracker.start_tracking();
        self.transition(NavState::Navigating);

        if self.session.destination_location_id.as_deref() == Some(current.as_str()) {
            self.arrive(0);
        }
        Ok(())
    }

    /// Stop following the route; location and destination are kept.
    pub fn stop_navigation(&mut self) {
        self.tracker.stop_tracking();
        self.session.active_route = None;
        self.session.current_instruction = None;
        self.session.navigation_start_time = None;
        self.transition(NavState::Idle);
    }

    /// Drop the route and trip progress; location and destination are kept.
    pub fn clear_route(&mut self) {
        self.stop_navigation();
        self.session.current_step_index = 0;
        self.session.original_start_location_id = None;
        self.session.deviation = DeviationSeverity::None;
    }

    /// Reset to an empty session.
    pub fn clear_session(&mut self) {
        self.tracker.stop_tracking();
        self.session = NavigationSession::new();
        log::info!("Navigation session cleared");
    }

    /// Leave the `Error` state, keeping location and destination for a retry.
    pub fn clear_error(&mut self) {
        if self.session.state == NavState::Error {
            self.session.error = None;
            self.transition(NavState::Idle);
        }
    }

    /// Primary route plus up to `k` alternatives for the current trip.
    pub fn alternative_routes(&self, k: usize) -> Result<Vec<Route>, NavError> {
        let (Some(from), Some(to)) = (
            self.session.current_location_id.as_deref(),
            self.session.destination_location_id.as_deref(),
        ) else {
            return Err(NavError::SessionState(
                "current location and destination are both required".to_string(),
            ));
        };
        self.engine.alternative_routes(from, to, k)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn require_location(&self, id: &str) -> Result<(), NavError> {
        if self.engine.graph().exists(id) {
            Ok(())
        } else {
            Err(NavError::InvalidLocation(id.to_string()))
        }
    }

    fn transition(&mut self, state: NavState) {
        if self.session.state != state {
            log::info!(
                "Navigation state: {} -> {}",
                self.session.state.as_str(),
                state.as_str()
            );
            self.session.state = state;
        }
    }

    /// Record `err` and enter `Error`.
    fn fail(&mut self, err: NavError) -> NavError {
        log::warn!("Navigation failed: {}", err);
        self.session.error = Some(SessionError::from(&err));
        self.transition(NavState::Error);
        err
    }

    fn arrive(&mut self, step_index: usize) {
        self.session.current_step_index = step_index;
        self.session.current_instruction = None;
        self.session.deviation = DeviationSeverity::None;
        self.tracker.stop_tracking();
        self.transition(NavState::Arrived);

        if let Some(destination) = &self.session.destination_location_id {
            log::info!("Arrived at {}", destination);
        }
    }

    /// Run the merge for the current position.
    fn reroute(&mut self) -> Result<(), NavError> {
        let (Some(current), Some(destination)) = (
            self.session.current_location_id.clone(),
            self.session.destination_location_id.clone(),
        ) else {
            return Err(NavError::SessionState(
                "current location and destination are both required".to_string(),
            ));
        };
        let original_start = self
            .session
            .original_start_location_id
            .clone()
            .unwrap_or_else(|| current.clone());

        let outcome = self.merger.merge(
            &self.engine,
            &MergeInput {
                current: &current,
                destination: &destination,
                original_start: &original_start,
                previous: self.session.active_route.as_ref(),
                previous_step: self.session.current_step_index,
            },
        );

        match outcome {
            MergeOutcome::Arrived { route, step_index } => {
                self.session.active_route = Some(route);
                self.arrive(step_index);
                Ok(())
            }
            MergeOutcome::Unreachable => {
                self.session.active_route = None;
                self.session.current_instruction = None;
                Err(self.fail(NavError::Unreachable {
                    from: current,
                    to: destination,
                }))
            }
            MergeOutcome::Merged {
                route,
                step_index,
                deviated,
                severity,
            } => {
                let instruction = route.instruction_at(step_index).map(|i| {
                    if deviated {
                        self.engine.generator().rekind(
                            self.engine.graph(),
                            i,
                            InstructionKind::Reroute,
                            route.instructions.len(),
                        )
                    } else {
                        i.clone()
                    }
                });

                if deviated {
                    log::info!(
                        "Off route at {} ({}), rerouted to {}",
                        current,
                        severity.as_str(),
                        destination
                    );
                }

                self.session.active_route = Some(route);
                self.session.current_step_index = step_index;
                self.session.current_instruction = instruction;
                self.session.deviation = severity;
                Ok(())
            }
        }
    }
}
