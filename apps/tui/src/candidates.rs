//! The working candidate set and the map annotations that mirror it.

use tracing::debug;

use crate::domain::{Candidate, Coordinate};

pub const DEFAULT_ZOOM: u8 = 15;
pub const MIN_ZOOM: u8 = 3;
pub const MAX_ZOOM: u8 = 19;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Origin,
    Place,
    Highlight,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: Coordinate,
    pub title: String,
    pub kind: MarkerKind,
}

impl Marker {
    fn new(position: Coordinate, title: impl Into<String>, kind: MarkerKind) -> Self {
        Self {
            position,
            title: title.into(),
            kind,
        }
    }
}

/// Map annotations: the user's position, one marker per candidate and at
/// most one highlight for the latest selection.
#[derive(Debug, Default)]
pub struct MarkerSet {
    origin: Option<Marker>,
    places: Vec<Marker>,
    highlight: Option<Marker>,
}

impl MarkerSet {
    pub fn origin(&self) -> Option<&Marker> {
        self.origin.as_ref()
    }

    pub fn places(&self) -> &[Marker] {
        &self.places
    }

    pub fn highlight(&self) -> Option<&Marker> {
        self.highlight.as_ref()
    }
}

/// Center and zoom of the map panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    center: Option<Coordinate>,
    zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: None,
            zoom: DEFAULT_ZOOM,
        }
    }
}

impl MapView {
    pub const fn center(&self) -> Option<Coordinate> {
        self.center
    }

    pub const fn zoom(&self) -> u8 {
        self.zoom
    }

    pub fn set_center(&mut self, center: Coordinate) {
        self.center = Some(center);
    }

    /// Moves the view to `target`. The terminal map has no smooth pan.
    pub fn pan_to(&mut self, target: Coordinate) {
        self.center = Some(target);
    }

    /// Latitude and longitude span covered at the current zoom.
    ///
    /// Follows the web-mercator tile pyramid: one 256px tile covers
    /// `360 / 2^zoom` degrees of longitude; the panel is treated as one tile wide.
    pub fn span_degrees(&self, aspect_ratio: f64) -> (f64, f64) {
        let lng_span = 360.0 / f64::from(1_u32 << self.zoom);
        let latitude = self.center.map_or(0.0, |center| center.lat);
        let lat_span = lng_span * latitude.to_radians().cos() / aspect_ratio.max(0.1);
        (lat_span, lng_span)
    }

    /// `[min, max]` longitude and latitude bounds around the center.
    pub fn bounds(&self, aspect_ratio: f64) -> Option<([f64; 2], [f64; 2])> {
        let center = self.center?;
        let (lat_span, lng_span) = self.span_degrees(aspect_ratio);
        Some((
            [center.lng - lng_span / 2.0, center.lng + lng_span / 2.0],
            [center.lat - lat_span / 2.0, center.lat + lat_span / 2.0],
        ))
    }
}

/// Owns the candidate set, its markers and the map view.
#[derive(Debug, Default)]
pub struct CandidateSetManager {
    candidates: Vec<Candidate>,
    markers: MarkerSet,
    view: MapView,
}

impl CandidateSetManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, index: usize) -> Option<&Candidate> {
        self.candidates.get(index)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub const fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    pub const fn view(&self) -> &MapView {
        &self.view
    }

    /// Marks the user's position and centers the map on it.
    pub fn set_origin(&mut self, origin: Coordinate) {
        self.markers.origin = Some(Marker::new(origin, "Your location", MarkerKind::Origin));
        self.view.set_center(origin);
    }

    /// Swaps in a new candidate set and redraws one marker per candidate.
    pub fn replace(&mut self, origin: Coordinate, candidates: Vec<Candidate>) {
        self.markers.places = candidates
            .iter()
            .map(|candidate| Marker::new(candidate.location, &candidate.name, MarkerKind::Place))
            .collect();
        self.candidates = candidates;
        self.view.set_center(origin);
        debug!(count = self.candidates.len(), "candidate set replaced");
    }

    /// Removes the place markers and the highlight; the set itself is kept.
    pub fn clear(&mut self) {
        self.markers.places.clear();
        self.markers.highlight = None;
    }

    /// Applies a successful search: no marker from the previous set survives.
    pub fn apply_results(&mut self, origin: Coordinate, candidates: Vec<Candidate>) {
        self.clear();
        self.replace(origin, candidates);
    }

    /// Moves the highlight marker to the candidate at `index` and pans to it.
    pub fn highlight(&mut self, index: usize) -> Option<&Candidate> {
        let candidate = self.candidates.get(index)?;
        self.markers.highlight = Some(Marker::new(
            candidate.location,
            &candidate.name,
            MarkerKind::Highlight,
        ));
        self.view.pan_to(candidate.location);
        Some(candidate)
    }

    pub fn zoom_in(&mut self) {
        self.view.zoom = (self.view.zoom + 1).min(MAX_ZOOM);
    }

    pub fn zoom_out(&mut self) {
        self.view.zoom = self.view.zoom.saturating_sub(1).max(MIN_ZOOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Rating;

    fn candidate(name: &str, lat: f64) -> Candidate {
        Candidate {
            name: name.to_string(),
            rating: Rating::Rated(4.0),
            address: None,
            location: Coordinate::new(lat, 121.5),
            place_id: format!("id-{name}"),
        }
    }

    fn titles(manager: &CandidateSetManager) -> Vec<&str> {
        manager
            .markers()
            .places()
            .iter()
            .map(|marker| marker.title.as_str())
            .collect()
    }

    #[test]
    fn consecutive_results_fully_replace_set_and_markers() {
        let origin = Coordinate::new(25.0, 121.5);
        let mut manager = CandidateSetManager::new();

        manager.apply_results(origin, vec![candidate("A", 25.01), candidate("B", 25.02)]);
        manager.highlight(1);
        manager.apply_results(origin, vec![candidate("C", 25.03)]);

        assert_eq!(manager.len(), 1);
        assert_eq!(titles(&manager), ["C"]);
        assert!(manager.markers().highlight().is_none());
        assert_eq!(manager.view().center(), Some(origin));
    }

    #[test]
    fn clear_keeps_candidates_and_origin() {
        let origin = Coordinate::new(25.0, 121.5);
        let mut manager = CandidateSetManager::new();
        manager.set_origin(origin);
        manager.replace(origin, vec![candidate("A", 25.01)]);
        manager.highlight(0);

        manager.clear();

        assert_eq!(manager.len(), 1);
        assert!(manager.markers().places().is_empty());
        assert!(manager.markers().highlight().is_none());
        assert!(manager.markers().origin().is_some());
    }

    #[test]
    fn highlight_is_replaced_and_view_pans() {
        let origin = Coordinate::new(25.0, 121.5);
        let mut manager = CandidateSetManager::new();
        manager.apply_results(origin, vec![candidate("A", 25.01), candidate("B", 25.02)]);

        manager.highlight(0);
        manager.highlight(1);

        let highlight = manager.markers().highlight().expect("highlighted");
        assert_eq!(highlight.kind, MarkerKind::Highlight);
        assert_eq!(highlight.title, "B");
        assert!(manager
            .markers()
            .places()
            .iter()
            .all(|marker| marker.kind == MarkerKind::Place));
        assert_eq!(manager.view().center(), Some(Coordinate::new(25.02, 121.5)));
        assert!(manager.highlight(7).is_none());
    }

    #[test]
    fn zoom_stays_in_range() {
        let mut manager = CandidateSetManager::new();
        for _ in 0..30 {
            manager.zoom_in();
        }
        assert_eq!(manager.view().zoom(), MAX_ZOOM);
        for _ in 0..30 {
            manager.zoom_out();
        }
        assert_eq!(manager.view().zoom(), MIN_ZOOM);
    }

    #[test]
    fn bounds_are_centered() {
        let mut view = MapView::default();
        assert!(view.bounds(1.0).is_none());

        view.set_center(Coordinate::new(0.0, 10.0));
        let (x, y) = view.bounds(1.0).expect("center set");
        assert!(((x[0] + x[1]) / 2.0 - 10.0).abs() < 1e-9);
        assert!(((y[0] + y[1]) / 2.0).abs() < 1e-9);
        assert!(x[1] > x[0] && y[1] > y[0]);
    }
}
