//! Shared fixtures for the app unit tests.

use std::collections::HashMap;
use tokio::sync::mpsc;

use places_wheel::config::AppConfig;
use places_wheel::{Candidate, Coordinate, Rating};

use crate::app::{App, AppActions};
use crate::event::AppEvent;

pub fn config() -> AppConfig {
    // Port 9 is discard: dispatched searches fail fast and are never awaited
    let vars: HashMap<&str, &str> = HashMap::from([
        ("GOOGLE_MAPS_API_KEY", "test-key"),
        ("PLACES_BASE_URL", "http://127.0.0.1:9"),
        ("SPIN_DURATION_MS", "60000"),
    ]);
    AppConfig::from_lookup(|key: &str| vars.get(key).map(|value| (*value).to_string()))
        .expect("valid config")
}

pub fn app() -> (App, mpsc::UnboundedReceiver<AppEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let config = config();
    let actions = AppActions::new(&config, tx).expect("actions");
    (App::new(&config, actions), rx)
}

pub fn candidate(name: &str, rating: Rating, address: Option<&str>) -> Candidate {
    Candidate {
        name: name.to_string(),
        rating,
        address: address.map(str::to_string),
        location: Coordinate::new(25.04, 121.56),
        place_id: format!("place-{name}"),
    }
}

pub fn locate(app: &mut App) {
    app.handle_event(AppEvent::LocationResolved(Ok(Coordinate::new(25.03, 121.56))));
}

/// Runs a search and applies `candidates` as its result.
pub fn load(app: &mut App, candidates: Vec<Candidate>) {
    let generation = app.run_search().expect("dispatched");
    app.handle_event(AppEvent::SearchFinished {
        generation,
        outcome: Ok(candidates),
    });
}
