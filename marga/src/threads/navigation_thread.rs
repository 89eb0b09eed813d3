//! Navigation thread: single writer for the navigation session.
//!
//! Position fixes and user commands may come from any number of producers
//! (tag reader, UI, replay). They all go through one mpsc queue into this
//! thread, which applies them to the [`NavigationController`] strictly in
//! arrival order. After each command the session snapshot is republished so
//! readers never need to talk to the thread.

use std::sync::Arc;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use parking_lot::RwLock;

use crate::core::Route;
use crate::error::{MargaError, NavError, Result};
use crate::navigation::{NavigationController, SessionSnapshot};

/// Commands accepted by the navigation thread.
#[derive(Debug, Clone, PartialEq)]
pub enum NavCommand {
    /// Position fix (tag scan or manual selection).
    SetCurrentLocation(String),

    SetDestination(String),

    BeginDestinationSelection,

    CalculateRoute,

    StartNavigation,

    StopNavigation,

    ClearRoute,

    ClearSession,

    ClearError,

    /// Primary route plus up to `k` alternatives.
    AlternativeRoutes { k: usize },

    /// Exit the thread after answering.
    Shutdown,
}

/// Response data from command execution.
#[derive(Debug, Clone, PartialEq)]
pub enum NavResponse {
    Done,
    Routes(Vec<Route>),
}

/// Result of a command execution.
pub type CommandResult = std::result::Result<NavResponse, NavError>;

/// Command with response channel for acknowledgment.
struct CommandWithResponse {
    command: NavCommand,
    response_tx: mpsc::Sender<CommandResult>,
}

/// Producer side of the navigation thread. Cheap to clone.
#[derive(Clone)]
pub struct NavigationHandle {
    tx: mpsc::Sender<CommandWithResponse>,
    snapshot: Arc<RwLock<SessionSnapshot>>,
    timeout: Duration,
}

impl std::fmt::Debug for NavigationHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationHandle")
            .field("tx", &"...")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl NavigationHandle {
    /// Send a command and wait for its result.
    pub fn send(&self, command: NavCommand) -> Result<NavResponse> {
        let (response_tx, response_rx) = mpsc::channel();

        self.tx
            .send(CommandWithResponse {
                command,
                response_tx,
            })
            .map_err(|_| MargaError::Channel("command channel closed".to_string()))?;

        let result = response_rx.recv_timeout(self.timeout).map_err(|e| match e {
            mpsc::RecvTimeoutError::Timeout => {
                MargaError::Channel("navigation command timeout".to_string())
            }
            mpsc::RecvTimeoutError::Disconnected => {
                MargaError::Channel("navigation thread disconnected".to_string())
            }
        })?;

        Ok(result?)
    }

    /// Latest published session state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.read().clone()
    }

    pub fn set_current_location(&self, id: &str) -> Result<()> {
        self.send(NavCommand::SetCurrentLocation(id.to_string()))
            .map(|_| ())
    }

    pub fn set_destination(&self, id: &str) -> Result<()> {
        self.send(NavCommand::SetDestination(id.to_string()))
            .map(|_| ())
    }

    pub fn start_navigation(&self) -> Result<()> {
        self.send(NavCommand::StartNavigation).map(|_| ())
    }

    pub fn stop_navigation(&self) -> Result<()> {
        self.send(NavCommand::StopNavigation).map(|_| ())
    }

    pub fn clear_error(&self) -> Result<()> {
        self.send(NavCommand::ClearError).map(|_| ())
    }

    pub fn clear_session(&self) -> Result<()> {
        self.send(NavCommand::ClearSession).map(|_| ())
    }

    pub fn alternative_routes(&self, k: usize) -> Result<Vec<Route>> {
        match self.send(NavCommand::AlternativeRoutes { k })? {
            NavResponse::Routes(routes) => Ok(routes),
            NavResponse::Done => Ok(Vec::new()),
        }
    }

    /// Ask the thread to exit.
    pub fn shutdown(&self) -> Result<()> {
        self.send(NavCommand::Shutdown).map(|_| ())
    }
}

/// Navigation thread handle.
pub struct NavigationThread {
    handle: JoinHandle<()>,
}

impl NavigationThread {
    /// Spawn the navigation thread around `controller`.
    ///
    /// Producers wait at most `timeout_ms` for each answer.
    pub fn spawn(
        controller: NavigationController,
        timeout_ms: u64,
    ) -> Result<(Self, NavigationHandle)> {
        let (tx, rx) = mpsc::channel();
        let snapshot = Arc::new(RwLock::new(controller.snapshot()));
        let published = Arc::clone(&snapshot);

        let handle = thread::Builder::new()
            .name("navigation".into())
            .spawn(move || run_navigation_loop(controller, rx, published))?;

        Ok((
            Self { handle },
            NavigationHandle {
                tx,
                snapshot,
                timeout: Duration::from_millis(timeout_ms),
            },
        ))
    }

    /// Wait for thread to finish.
    pub fn join(self) -> thread::Result<()> {
        self.handle.join()
    }
}

/// Main navigation loop. Ends on `Shutdown` or when every handle is dropped.
fn run_navigation_loop(
    mut controller: NavigationController,
    rx: mpsc::Receiver<CommandWithResponse>,
    snapshot: Arc<RwLock<SessionSnapshot>>,
) {
    log::info!("Navigation thread starting");

    while let Ok(CommandWithResponse {
        command,
        response_tx,
    }) = rx.recv()
    {
        if command == NavCommand::Shutdown {
            response_tx.send(Ok(NavResponse::Done)).ok();
            break;
        }

        log::debug!("Navigation command: {:?}", command);
        let result = apply_command(&mut controller, command);

        *snapshot.write() = controller.snapshot();
        // Producer may have timed out and gone away
        response_tx.send(result).ok();
    }

    controller.clear_session();
    log::info!("Navigation thread stopped");
}

fn apply_command(controller: &mut NavigationController, command: NavCommand) -> CommandResult {
    match command {
        NavCommand::SetCurrentLocation(id) => controller.set_current_location(&id)?,
        NavCommand::SetDestination(id) => controller.set_destination(&id)?,
        NavCommand::BeginDestinationSelection => controller.begin_destination_selection()?,
        NavCommand::CalculateRoute => controller.calculate_route()?,
        NavCommand::StartNavigation => controller.start_navigation()?,
        NavCommand::StopNavigation => controller.stop_navigation(),
        NavCommand::ClearRoute => controller.clear_route(),
        NavCommand::ClearSession => controller.clear_session(),
        NavCommand::ClearError => controller.clear_error(),
        NavCommand::AlternativeRoutes { k } => {
            return controller.alternative_routes(k).map(NavResponse::Routes);
        }
        NavCommand::Shutdown => {}
    }
    Ok(NavResponse::Done)
}
