use chrono::{DateTime, Utc};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use serde::Serialize;
use std::io::Stdout;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, warn};

use places_wheel::places::{self, SearchError};
use places_wheel::{Candidate, Coordinate};

use crate::app::{handle_input, App};
use crate::event::AppEvent;
use crate::ui;

/// Run the application in headless mode: locate, search once, spin and print the pick.
pub async fn run_headless(app: &mut App, json: bool) -> Result<()> {
    let pick = pick_headless(app).await?;

    if json {
        render_headless_json(&pick)?;
    } else {
        render_headless_text(&pick);
    }

    Ok(())
}

async fn pick_headless(app: &mut App) -> Result<HeadlessPick> {
    let outcome = app.actions.locator().acquire().await;
    app.location.resolve(&outcome);
    let origin = outcome.map_err(|e| {
        warn!(error = %e, "location unavailable");
        eyre!("{}", SearchError::LocationUnavailable)
    })?;
    app.candidates.set_origin(origin);

    let filter = app.filter()?;
    let candidates = places::search(app.actions.places(), Some(origin), &filter)
        .await
        .map_err(|e| eyre!("{e}"))?;
    let found = candidates.len();
    app.candidates.apply_results(origin, candidates);

    // No animation to wait for: reveal straight away.
    let ticket = app
        .wheel
        .spin(found, &mut rand::thread_rng(), Instant::now())?;
    let index = app.wheel.reveal(ticket.spin_id)?;
    let selected = app
        .candidates
        .highlight(index)
        .cloned()
        .ok_or_else(|| eyre!("Wheel landed outside the candidate set"))?;

    let maps_host = app.actions.maps_host();
    Ok(HeadlessPick {
        picked_at: Utc::now(),
        origin,
        keyword: filter.category().to_string(),
        radius_m: filter.radius_m(),
        min_rating: filter.min_rating(),
        candidates: found,
        review_url: places_wheel::links::review_url(maps_host, &selected.place_id),
        navigation_url: places_wheel::links::navigation_url(maps_host, &selected),
        selected,
    })
}

fn render_headless_text(pick: &HeadlessPick) {
    println!("\nPlaces Wheel");
    println!("============");
    println!("Origin: {}", pick.origin);
    let keyword = if pick.keyword.is_empty() {
        "(any)"
    } else {
        pick.keyword.as_str()
    };
    println!("Keyword: {keyword}");
    println!("Radius: {} m", pick.radius_m);
    if let Some(min_rating) = pick.min_rating {
        println!("Min rating: {min_rating:.1}");
    }
    println!("Candidates: {}", pick.candidates);

    println!("\nSelected:");
    println!("- {}", pick.selected.name);
    println!("- Rating: {}", pick.selected.rating);
    println!("- Address: {}", pick.selected.address_label());
    println!("- Reviews: {}", pick.review_url);
    println!("- Directions: {}", pick.navigation_url);
    println!("\nPicked at {}", pick.picked_at.to_rfc3339());
}

fn render_headless_json(pick: &HeadlessPick) -> Result<()> {
    let json = serde_json::to_string_pretty(pick)?;
    println!("{json}");
    Ok(())
}

#[derive(Serialize)]
struct HeadlessPick {
    picked_at: DateTime<Utc>,
    origin: Coordinate,
    keyword: String,
    radius_m: u32,
    min_rating: Option<f64>,
    candidates: usize,
    selected: Candidate,
    review_url: String,
    navigation_url: String,
}

/// Run the main application event loop
pub async fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    events: &mut UnboundedReceiver<AppEvent>,
) -> Result<()> {
    // Configure event poll timeout (ms)
    const EVENT_POLL_TIMEOUT: u64 = 50;

    while app.running {
        app.update();

        // Apply whatever the background tasks finished since the last frame
        while let Ok(app_event) = events.try_recv() {
            debug!(?app_event, "background event");
            app.handle_event(app_event);
        }

        if let Err(e) = terminal.draw(|f| ui::ui(app, f)) {
            return Err(eyre!("Terminal draw error: {e}"));
        }

        if matches!(
            event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT)),
            Ok(true)
        ) {
            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    handle_input(app, key.code);
                }
                Ok(Event::Resize(_, _)) => {
                    if terminal.draw(|f| ui::ui(app, f)).is_err() {
                        // Non-fatal redraw error
                    }
                }
                Ok(_) | Err(_) => {}
            }
        }

        // Yield so spawned lookups and timers make progress between frames
        tokio::task::yield_now().await;
    }

    Ok(())
}
