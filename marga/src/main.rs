//! Marga command line.
//!
//! ```bash
//! # Shortest route with instructions
//! marga --graph configs/building.toml route lobby lab-204
//!
//! # Primary route plus two alternatives
//! marga alternatives lobby lab-204 -k 2
//!
//! # Feed position fixes through the navigation thread
//! marga replay lab-204 lobby hall-1 stairs-1 hall-2 lab-204
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use marga::{
    MargaConfig, MargaError, NavigationController, NavigationThread, PathfindingEngine, Result,
    Route, SessionSnapshot, load_graph,
};

#[derive(Parser)]
#[command(name = "marga")]
#[command(about = "Indoor route planning and live rerouting")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = "configs/marga.toml")]
    config: PathBuf,

    /// Location graph file (overrides graph.path from the config)
    #[arg(short, long)]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the shortest route between two locations
    Route { from: String, to: String },

    /// Print the shortest route and up to K alternatives
    Alternatives {
        from: String,
        to: String,

        /// Number of alternatives
        #[arg(short, default_value = "2")]
        k: usize,
    },

    /// Navigate to DESTINATION, feeding each EVENT as a position fix
    Replay {
        destination: String,

        /// Location ids in the order they are visited; the first one is the start
        #[arg(required = true)]
        events: Vec<String>,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = MargaConfig::load_or_default(&args.config)?;

    let graph_path = args
        .graph
        .clone()
        .or_else(|| config.graph.path.clone())
        .ok_or_else(|| {
            MargaError::Config("no graph file given (use --graph or graph.path)".to_string())
        })?;
    let graph = Arc::new(load_graph(&graph_path, config.graph.asymmetric_edges)?);

    match &args.command {
        Command::Route { from, to } => {
            let engine = PathfindingEngine::from_config(graph, &config)?;
            print_route(&engine.route(from, to)?);
        }
        Command::Alternatives { from, to, k } => {
            let engine = PathfindingEngine::from_config(graph, &config)?;
            for (i, route) in engine.alternative_routes(from, to, *k)?.iter().enumerate() {
                if i == 0 {
                    println!("== Primary route");
                } else {
                    println!("\n== Alternative {}", i);
                }
                print_route(route);
            }
        }
        Command::Replay {
            destination,
            events,
        } => {
            let controller = NavigationController::from_config(graph, &config)?;
            let (thread, handle) =
                NavigationThread::spawn(controller, config.navigation.command_timeout_ms)?;

            let mut events = events.iter();
            if let Some(start) = events.next() {
                handle.set_current_location(start)?;
            }
            handle.set_destination(destination)?;
            handle.start_navigation()?;
            print_snapshot(&handle.snapshot());

            for event in events {
                if let Err(e) = handle.set_current_location(event) {
                    // Keep replaying; the snapshot shows the error state
                    log::warn!("Position {} rejected: {}", event, e);
                }
                print_snapshot(&handle.snapshot());
            }

            handle.shutdown()?;
            thread
                .join()
                .map_err(|_| MargaError::Channel("navigation thread panicked".to_string()))?;
        }
    }

    Ok(())
}

fn print_route(route: &Route) {
    println!(
        "{}: {} ({:.1} m, ~{:.0} s)",
        route.id,
        route.path.join(" -> "),
        route.distance,
        route.estimated_time_s
    );
    for (i, instruction) in route.instructions.iter().enumerate() {
        println!("  {:>2}. {}", i + 1, instruction.description);
    }
}

fn print_snapshot(snapshot: &SessionSnapshot) {
    let location = snapshot.current_location_id.as_deref().unwrap_or("-");
    print!("[{}] at {}", snapshot.state.as_str(), location);

    if let Some(route) = &snapshot.active_route {
        print!(
            " step {}/{} | {}",
            snapshot.current_step_index,
            route.len().saturating_sub(1),
            route.path.join(" -> ")
        );
    }
    if let Some(instruction) = &snapshot.current_instruction {
        print!(" | {}", instruction.description);
    }
    if let Some(error) = &snapshot.error {
        print!(" | error: {}", error.message);
    }
    println!();
}
