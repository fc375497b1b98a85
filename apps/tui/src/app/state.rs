use std::time::Instant;
use throbber_widgets_tui::ThrobberState;
use tracing::{debug, info, warn};

use places_wheel::candidates::CandidateSetManager;
use places_wheel::config::AppConfig;
use places_wheel::domain::{FilterError, MAX_RADIUS_KM, MIN_RADIUS_KM};
use places_wheel::location::CurrentLocation;
use places_wheel::places::SearchError;
use places_wheel::wheel::{SelectionWheel, WheelError};
use places_wheel::{links, Candidate, MinRating, SearchFilter};

use crate::app::actions::AppActions;
use crate::app::suggest::suggest_category;
use crate::event::AppEvent;

/// Which control receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Category,
    Distance,
    Rating,
    Wheel,
}

impl Focus {
    pub const ALL: [Self; 4] = [Self::Category, Self::Distance, Self::Rating, Self::Wheel];

    pub const fn index(self) -> usize {
        match self {
            Self::Category => 0,
            Self::Distance => 1,
            Self::Rating => 2,
            Self::Wheel => 3,
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Category),
            1 => Some(Self::Distance),
            2 => Some(Self::Rating),
            3 => Some(Self::Wheel),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Distance => "Distance",
            Self::Rating => "Min rating",
            Self::Wheel => "Wheel",
        }
    }
}

/// The revealed candidate and its outbound links.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub candidate: Candidate,
    pub review_url: String,
    pub navigation_url: String,
}

impl Selection {
    fn new(maps_host: &str, candidate: &Candidate) -> Self {
        Self {
            candidate: candidate.clone(),
            review_url: links::review_url(maps_host, &candidate.place_id),
            navigation_url: links::navigation_url(maps_host, candidate),
        }
    }
}

pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub focus: Focus,
    /// Category text box; searched on Enter or when focus leaves the box.
    pub category_input: String,
    committed_category: String,
    /// Slider readout; only committed on Enter or when focus leaves the slider.
    pub radius_km: u32,
    committed_radius_km: u32,
    pub min_rating: MinRating,
    pub status_message: String,
    pub searching: bool,
    pub location: CurrentLocation,
    pub candidates: CandidateSetManager,
    pub wheel: SelectionWheel,
    pub selection: Option<Selection>,
    pub animation_counter: f64,
    pub last_frame: Instant,
    pub throbber_state: ThrobberState,
    pub actions: AppActions,
}

impl App {
    pub fn new(config: &AppConfig, actions: AppActions) -> Self {
        let radius_km = config.radius_km.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM);
        Self {
            running: true,
            show_help: false,
            focus: Focus::Category,
            category_input: config.category.clone(),
            committed_category: config.category.trim().to_string(),
            radius_km,
            committed_radius_km: radius_km,
            min_rating: config.min_rating,
            status_message: "Locating you...".to_string(),
            searching: false,
            location: CurrentLocation::new(),
            candidates: CandidateSetManager::new(),
            wheel: SelectionWheel::new(config.spin_duration),
            selection: None,
            animation_counter: 0.0,
            last_frame: Instant::now(),
            throbber_state: ThrobberState::default(),
            actions,
        }
    }

    /// Kicks off the location lookup.
    pub fn start(&self) {
        self.actions.spawn_location();
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame);
        self.last_frame = now;

        self.animation_counter += delta.as_secs_f64() * 2.0;
        if self.animation_counter > 2.0 * std::f64::consts::PI {
            self.animation_counter -= 2.0 * std::f64::consts::PI;
        }

        if self.searching {
            self.throbber_state.calc_next();
        }
    }

    pub fn filter(&self) -> Result<SearchFilter, FilterError> {
        SearchFilter::from_controls(
            &self.committed_category,
            self.committed_radius_km,
            self.min_rating,
        )
    }

    pub fn committed_category(&self) -> &str {
        &self.committed_category
    }

    pub const fn committed_radius_km(&self) -> u32 {
        self.committed_radius_km
    }

    pub fn category_suggestion(&self) -> Option<&'static str> {
        suggest_category(&self.category_input)
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::LocationResolved(outcome) => {
                if !self.location.resolve(&outcome) {
                    return;
                }
                match outcome {
                    Ok(coordinate) => {
                        self.candidates.set_origin(coordinate);
                        self.status_message = format!("Located at {coordinate}");
                        if !self.committed_category.is_empty() {
                            self.run_search();
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "location unavailable");
                        self.status_message = SearchError::LocationUnavailable.to_string();
                    }
                }
            }
            AppEvent::SearchFinished {
                generation,
                outcome,
            } => self.apply_search_outcome(generation, outcome),
            AppEvent::SpinElapsed { spin_id } => self.reveal(spin_id),
        }
    }

    /// Searches with the committed controls. Returns the dispatched generation.
    pub fn run_search(&mut self) -> Option<u64> {
        let Some(origin) = self.location.coordinate() else {
            self.status_message = SearchError::LocationUnavailable.to_string();
            return None;
        };

        let filter = match self.filter() {
            Ok(filter) => filter,
            Err(e) => {
                warn!(error = %e, "refusing to search with invalid filters");
                self.status_message = format!("Invalid filters: {e}");
                return None;
            }
        };
        let generation = self.actions.dispatch_search(origin, filter);
        self.searching = true;
        self.status_message = "Searching nearby places...".to_string();
        Some(generation)
    }

    fn apply_search_outcome(
        &mut self,
        generation: u64,
        outcome: Result<Vec<Candidate>, SearchError>,
    ) {
        if !self.actions.is_current_search(generation) {
            debug!(generation, "discarding superseded search result");
            return;
        }
        self.searching = false;

        let candidates = match outcome {
            Ok(candidates) => candidates,
            Err(e) => {
                info!(error = %e, "search left the candidate set unchanged");
                self.status_message = e.to_string();
                return;
            }
        };
        let Some(origin) = self.location.coordinate() else {
            return;
        };

        if self.wheel.is_spinning() {
            self.actions.cancel_reveal();
            if let Err(e) = self.wheel.cancel() {
                warn!(error = %e, "failed to cancel spin");
            }
        }

        let count = candidates.len();
        self.candidates.apply_results(origin, candidates);
        self.wheel.reset_selection();
        self.selection = None;
        self.status_message = format!("Found {count} places. Spin the wheel!");
    }

    pub fn spin(&mut self) {
        let outcome = self.wheel.spin(
            self.candidates.len(),
            &mut rand::thread_rng(),
            Instant::now(),
        );
        match outcome {
            Ok(ticket) => {
                debug!(spin_id = ticket.spin_id, index = ticket.index, "spin started");
                self.actions.schedule_reveal(ticket);
                self.selection = None;
                self.status_message = "Spinning...".to_string();
            }
            Err(e) => {
                self.status_message = e.to_string();
            }
        }
    }

    fn reveal(&mut self, spin_id: u64) {
        let index = match self.wheel.reveal(spin_id) {
            Ok(index) => index,
            Err(WheelError::StaleSpin { got }) => {
                debug!(spin_id = got, "ignoring stale reveal");
                return;
            }
            Err(e) => {
                debug!(error = %e, "reveal rejected");
                return;
            }
        };

        let maps_host = self.actions.maps_host().to_string();
        if let Some(candidate) = self.candidates.highlight(index) {
            info!(name = %candidate.name, "wheel landed");
            self.status_message = format!("The wheel picked {}", candidate.name);
            self.selection = Some(Selection::new(&maps_host, candidate));
        }
    }

    /// Commits the typed category and searches with it.
    pub fn submit_category(&mut self) -> Option<u64> {
        self.committed_category = self.category_input.trim().to_string();
        self.run_search()
    }

    fn commit_category(&mut self) {
        if self.category_input.trim() == self.committed_category {
            return;
        }
        self.submit_category();
    }

    pub fn commit_distance(&mut self) {
        if self.radius_km == self.committed_radius_km {
            return;
        }
        self.committed_radius_km = self.radius_km;
        self.run_search();
    }

    pub fn adjust_distance(&mut self, increase: bool) {
        self.radius_km = if increase {
            (self.radius_km + 1).min(MAX_RADIUS_KM)
        } else {
            self.radius_km.saturating_sub(1).max(MIN_RADIUS_KM)
        };
    }

    pub fn set_min_rating(&mut self, min_rating: MinRating) {
        if self.min_rating == min_rating {
            return;
        }
        self.min_rating = min_rating;
        self.run_search();
    }

    pub fn accept_suggestion(&mut self) -> bool {
        let Some(suggestion) = self.category_suggestion() else {
            return false;
        };
        self.category_input = suggestion.to_string();
        true
    }

    /// Moves focus, committing a pending text or slider change when it loses focus.
    pub fn set_focus(&mut self, focus: Focus) {
        if self.focus != focus {
            match self.focus {
                Focus::Category => self.commit_category(),
                Focus::Distance => self.commit_distance(),
                Focus::Rating | Focus::Wheel => {}
            }
        }
        self.focus = focus;
    }

    pub fn open_review(&mut self) {
        let Some(selection) = &self.selection else {
            self.status_message = "Spin the wheel to pick a place first".to_string();
            return;
        };
        self.status_message = match self.actions.open_review(&selection.candidate) {
            Ok(_) => format!("Opened reviews for {}", selection.candidate.name),
            Err(e) => format!("Could not open browser: {e}"),
        };
    }

    pub fn open_navigation(&mut self) {
        let Some(selection) = &self.selection else {
            self.status_message = "Spin the wheel to pick a place first".to_string();
            return;
        };
        self.status_message = match self.actions.open_navigation(&selection.candidate) {
            Ok(_) => format!("Opened directions to {}", selection.candidate.name),
            Err(e) => format!("Could not open browser: {e}"),
        };
    }

    pub fn quit(&mut self) {
        self.actions.shutdown();
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::test_support::{app, candidate, locate};
    use places_wheel::location::LocationError;
    use places_wheel::{Coordinate, Rating};

    #[tokio::test]
    async fn search_before_location_is_refused() {
        let (mut app, _rx) = app();
        assert_eq!(app.run_search(), None);
        assert_eq!(app.status_message, "Unable to get your location");
        assert!(!app.searching);
    }

    #[tokio::test]
    async fn failed_location_is_reported_once() {
        let (mut app, _rx) = app();
        app.handle_event(AppEvent::LocationResolved(Err(LocationError::Denied(
            "private range".to_string(),
        ))));
        assert_eq!(app.status_message, "Unable to get your location");

        app.handle_event(AppEvent::LocationResolved(Ok(Coordinate::new(1.0, 1.0))));
        assert!(app.location.coordinate().is_none());
    }

    #[tokio::test]
    async fn superseded_search_results_are_discarded() {
        let (mut app, _rx) = app();
        locate(&mut app);

        let first = app.run_search().expect("dispatched");
        let second = app.run_search().expect("dispatched");

        app.handle_event(AppEvent::SearchFinished {
            generation: first,
            outcome: Ok(vec![candidate("Old", Rating::Rated(4.0), None)]),
        });
        assert!(app.candidates.is_empty());
        assert!(app.searching);

        app.handle_event(AppEvent::SearchFinished {
            generation: second,
            outcome: Ok(vec![candidate("New", Rating::Rated(4.0), None)]),
        });
        assert_eq!(app.candidates.len(), 1);
        assert_eq!(app.candidates.candidates()[0].name, "New");
        assert!(!app.searching);
    }

    #[tokio::test]
    async fn failed_search_keeps_previous_candidates() {
        let (mut app, _rx) = app();
        locate(&mut app);

        let generation = app.run_search().expect("dispatched");
        app.handle_event(AppEvent::SearchFinished {
            generation,
            outcome: Ok(vec![
                candidate("Kept", Rating::Unrated, None),
                candidate("Also kept", Rating::Rated(4.2), None),
            ]),
        });
        app.spin();
        app.handle_event(AppEvent::SpinElapsed { spin_id: 1 });
        let picked = app.selection.clone().expect("revealed");

        let failures = [
            SearchError::NoMatches,
            SearchError::ProviderStatus {
                status: "OVER_QUERY_LIMIT".to_string(),
                message: None,
            },
        ];
        for failure in failures {
            let notice = failure.to_string();
            let generation = app.run_search().expect("dispatched");
            app.handle_event(AppEvent::SearchFinished {
                generation,
                outcome: Err(failure),
            });

            assert_eq!(app.status_message, notice);
            assert!(!app.searching);
            assert_eq!(app.candidates.len(), 2);
            assert_eq!(app.candidates.markers().places().len(), 2);
            assert_eq!(
                app.candidates.markers().highlight().map(|marker| marker.title.as_str()),
                Some(picked.candidate.name.as_str())
            );
            assert_eq!(app.selection.as_ref(), Some(&picked));
        }
    }

    #[tokio::test]
    async fn spin_without_candidates_shows_notice() {
        let (mut app, _rx) = app();
        app.spin();
        assert_eq!(app.status_message, "Search for places before spinning");
        assert!(!app.wheel.is_spinning());
    }

    #[tokio::test]
    async fn reveal_selects_the_drawn_candidate_and_ignores_stale_timers() {
        let (mut app, _rx) = app();
        locate(&mut app);
        let generation = app.run_search().expect("dispatched");
        app.handle_event(AppEvent::SearchFinished {
            generation,
            outcome: Ok(vec![
                candidate("A", Rating::Rated(4.5), Some("1 Main St")),
                candidate("B", Rating::Rated(4.1), None),
            ]),
        });

        app.spin();
        assert!(app.wheel.is_spinning());
        app.spin();
        assert_eq!(app.status_message, "The wheel is already spinning");

        app.handle_event(AppEvent::SpinElapsed { spin_id: 99 });
        assert!(app.selection.is_none());

        app.handle_event(AppEvent::SpinElapsed { spin_id: 1 });
        let selection = app.selection.clone().expect("revealed");
        let expected = app.wheel.last_index().expect("index");
        assert_eq!(selection.candidate, app.candidates.candidates()[expected]);
        assert_eq!(
            app.candidates.markers().highlight().map(|marker| marker.title.as_str()),
            Some(selection.candidate.name.as_str())
        );
    }

    #[tokio::test]
    async fn new_results_during_a_spin_cancel_it() {
        let (mut app, _rx) = app();
        locate(&mut app);
        let generation = app.run_search().expect("dispatched");
        app.handle_event(AppEvent::SearchFinished {
            generation,
            outcome: Ok(vec![candidate("A", Rating::Rated(4.5), None)]),
        });
        app.spin();

        let generation = app.run_search().expect("dispatched");
        app.handle_event(AppEvent::SearchFinished {
            generation,
            outcome: Ok(vec![candidate("C", Rating::Rated(3.9), None)]),
        });
        assert!(!app.wheel.is_spinning());

        app.handle_event(AppEvent::SpinElapsed { spin_id: 1 });
        assert!(app.selection.is_none());
    }

    #[tokio::test]
    async fn distance_is_committed_on_blur_only_when_changed() {
        let (mut app, _rx) = app();
        locate(&mut app);
        app.set_focus(Focus::Distance);
        app.adjust_distance(true);
        app.adjust_distance(true);
        assert_eq!(app.committed_radius_km(), 1);

        app.set_focus(Focus::Rating);
        assert_eq!(app.committed_radius_km(), 3);
        assert_eq!(app.filter().expect("valid filter").radius_m(), 3000);
        assert!(app.searching);
    }

    #[tokio::test]
    async fn category_is_committed_on_blur_only_when_changed() {
        let (mut app, _rx) = app();
        locate(&mut app);
        assert!(!app.searching);

        app.set_focus(Focus::Category);
        app.category_input.push_str("ramen");
        assert_eq!(app.committed_category(), "");

        app.set_focus(Focus::Distance);
        assert_eq!(app.committed_category(), "ramen");
        assert_eq!(app.filter().expect("valid filter").category(), "ramen");
        assert!(app.searching);

        app.searching = false;
        app.set_focus(Focus::Category);
        app.category_input.push(' ');
        app.set_focus(Focus::Wheel);
        assert!(!app.searching);
    }

    #[tokio::test]
    async fn unsubmitted_category_text_is_not_searched() {
        let (mut app, _rx) = app();
        locate(&mut app);
        app.category_input.push_str("sushi");

        app.set_min_rating(MinRating::Four);
        assert!(app.searching);
        assert_eq!(app.filter().expect("valid filter").category(), "");

        assert!(app.submit_category().is_some());
        assert_eq!(app.filter().expect("valid filter").category(), "sushi");
    }

    #[test]
    fn focus_round_trips_through_index() {
        for focus in Focus::ALL {
            assert_eq!(Focus::from_index(focus.index()), Some(focus));
        }
        assert_eq!(Focus::from_index(4), None);
    }
}
