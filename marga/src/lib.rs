//! # Marga
//!
//! Indoor routing and rerouting engine.
//!
//! ## Overview
//!
//! Marga computes walking routes over a small graph of named indoor
//! locations (rooms, hallways, stairs, elevators), turns them into
//! turn-by-turn instructions, and keeps the route current as position fixes
//! arrive, including when the traveler wanders off it.
//!
//! ```text
//! position event ─► NavigationController ─► PathfindingEngine ─► InstructionGenerator
//!                        │                        ▲
//!                        └──► RouteMerger ────────┘
//!                        ▼
//!                  SessionSnapshot
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use marga::{InMemoryGraph, NavigationController, PathfindingEngine};
//!
//! let graph = Arc::new(InMemoryGraph::new(locations)?);
//! let mut nav = NavigationController::new(PathfindingEngine::new(graph));
//!
//! nav.set_current_location("lobby")?;
//! nav.set_destination("room-204")?;
//! nav.start_navigation()?;
//!
//! // Every tag scan
//! nav.set_current_location("corridor-2")?;
//! println!("{:?}", nav.session().current_instruction);
//! ```
//!
//! ## Threads
//!
//! The controller needs `&mut self`. To feed it from several producers, wrap
//! it in a [`NavigationThread`] and share the cloneable [`NavigationHandle`].

// Locations, paths and routes
pub mod core;

// Configuration file loading
pub mod config;

pub mod error;

// Location graph trait and in-memory implementation
pub mod graph;

// Path to instructions
pub mod instructions;

// Dijkstra, waypoint overrides and alternatives
pub mod planning;

// Session state machine and route merge
pub mod navigation;

// Single-writer navigation thread
pub mod threads;

pub use crate::core::{
    Direction, GraphPath, InstructionKind, Location, LocationType, NavigationInstruction, Position,
    Route,
};

pub use config::MargaConfig;

pub use error::{GraphError, MargaError, NavError, NavErrorKind, Result};

pub use graph::{AsymmetricEdges, InMemoryGraph, LocationGraph, load_graph};

pub use instructions::{InstructionFormatter, InstructionGenerator, PlainFormatter, TimingConfig};

pub use planning::{
    AlternativesConfig, LocationMatcher, PathfindingEngine, RoutingPolicy, SharedGraph,
    WaypointOverride,
};

pub use navigation::{
    DeviationConfig, DeviationSeverity, NavState, NavigationController, NavigationSession,
    PositionTracker, RouteMerger, SessionSnapshot,
};

pub use threads::{NavCommand, NavigationHandle, NavigationThread};
