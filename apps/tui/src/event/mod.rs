// Event module for places-wheel
// Background task results and the terminal event loop

mod loop_handler;

pub use loop_handler::{run, run_headless};

use places_wheel::location::LocationError;
use places_wheel::places::SearchError;
use places_wheel::{Candidate, Coordinate};

/// Results delivered by background tasks to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    LocationResolved(Result<Coordinate, LocationError>),
    SearchFinished {
        generation: u64,
        outcome: Result<Vec<Candidate>, SearchError>,
    },
    SpinElapsed {
        spin_id: u64,
    },
}
