//! Position source control.
//!
//! Position fixes come from tag scans or manual selection and are fed to the
//! controller as plain location ids. The controller only switches the
//! source on and off around a navigation.

/// Start/stop hook for whatever produces position fixes.
pub trait PositionTracker: Send {
    /// Begin delivering position fixes.
    fn start_tracking(&mut self);

    /// Stop delivering position fixes.
    fn stop_tracking(&mut self);

    /// Whether fixes are currently being delivered.
    fn is_tracking(&self) -> bool;
}

/// Tracker for manually selected positions; only remembers its on/off state.
#[derive(Debug, Default, Clone)]
pub struct ManualTracker {
    tracking: bool,
}

impl ManualTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PositionTracker for ManualTracker {
    fn start_tracking(&mut self) {
        if !self.tracking {
            log::debug!("Position tracking started");
        }
        self.tracking = true;
    }

    fn stop_tracking(&mut self) {
        if self.tracking {
            log::debug!("Position tracking stopped");
        }
        self.tracking = false;
    }

    fn is_tracking(&self) -> bool {
        self.tracking
    }
}
