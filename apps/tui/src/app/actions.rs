use color_eyre::Result;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use places_wheel::config::AppConfig;
use places_wheel::links::{self, open_in_browser};
use places_wheel::location::Locator;
use places_wheel::places::{self, GooglePlacesClient, SearchGenerations};
use places_wheel::wheel::SpinTicket;
use places_wheel::{Candidate, Coordinate, SearchFilter};

use crate::event::AppEvent;

/// Owns the background work of a session: location lookup, searches and the
/// reveal timer. Results come back to the UI loop as [`AppEvent`]s.
pub struct AppActions {
    places: Arc<GooglePlacesClient>,
    locator: Locator,
    maps_host: String,
    events: UnboundedSender<AppEvent>,
    generations: SearchGenerations,
    search_task: Option<JoinHandle<()>>,
    reveal_task: Option<JoinHandle<()>>,
}

impl AppActions {
    pub fn new(config: &AppConfig, events: UnboundedSender<AppEvent>) -> Result<Self> {
        let places = GooglePlacesClient::with_base_url(
            &config.api_key,
            config.request_timeout,
            &config.places_base_url,
        )?;
        let locator = config.fixed_location.map_or_else(
            || Locator::ip_lookup(config.geolocation_url.clone()),
            Locator::Fixed,
        );

        Ok(Self {
            places: Arc::new(places),
            locator,
            maps_host: config.maps_host.clone(),
            events,
            generations: SearchGenerations::new(),
            search_task: None,
            reveal_task: None,
        })
    }

    pub fn places(&self) -> &GooglePlacesClient {
        &self.places
    }

    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    pub fn maps_host(&self) -> &str {
        &self.maps_host
    }

    /// Starts the one location lookup of the session.
    pub fn spawn_location(&self) {
        let locator = self.locator.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = locator.acquire().await;
            if events.send(AppEvent::LocationResolved(outcome)).is_err() {
                debug!("location resolved after shutdown");
            }
        });
    }

    /// Dispatches a search, superseding any search still in flight.
    pub fn dispatch_search(&mut self, origin: Coordinate, filter: SearchFilter) -> u64 {
        if let Some(task) = self.search_task.take() {
            task.abort();
        }

        let generation = self.generations.next();
        let places = Arc::clone(&self.places);
        let events = self.events.clone();
        debug!(generation, keyword = %filter.category(), radius_m = filter.radius_m(), "dispatching search");

        self.search_task = Some(tokio::spawn(async move {
            let outcome = places::search(places.as_ref(), Some(origin), &filter).await;
            if events
                .send(AppEvent::SearchFinished {
                    generation,
                    outcome,
                })
                .is_err()
            {
                debug!(generation, "search finished after shutdown");
            }
        }));

        generation
    }

    pub const fn is_current_search(&self, generation: u64) -> bool {
        self.generations.is_current(generation)
    }

    /// Arms the reveal timer for `ticket`. Any earlier timer is dropped.
    pub fn schedule_reveal(&mut self, ticket: SpinTicket) {
        self.cancel_reveal();
        let events = self.events.clone();
        self.reveal_task = Some(tokio::spawn(async move {
            tokio::time::sleep(ticket.duration).await;
            if events
                .send(AppEvent::SpinElapsed {
                    spin_id: ticket.spin_id,
                })
                .is_err()
            {
                debug!(spin_id = ticket.spin_id, "spin elapsed after shutdown");
            }
        }));
    }

    pub fn cancel_reveal(&mut self) {
        if let Some(task) = self.reveal_task.take() {
            task.abort();
        }
    }

    pub fn open_review(&self, candidate: &Candidate) -> std::io::Result<String> {
        let url = links::review_url(&self.maps_host, &candidate.place_id);
        open_in_browser(&url)?;
        Ok(url)
    }

    pub fn open_navigation(&self, candidate: &Candidate) -> std::io::Result<String> {
        let url = links::navigation_url(&self.maps_host, candidate);
        open_in_browser(&url)?;
        Ok(url)
    }

    /// Aborts every background task still running.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.search_task.take() {
            task.abort();
        }
        self.cancel_reveal();
        info!("session closed");
    }
}
