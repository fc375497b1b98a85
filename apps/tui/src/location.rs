//! Resolution of the user's current position.
//!
//! A session resolves its location once. The coordinate either comes from
//! configuration or from an IP geolocation lookup; there is no retry and no
//! timeout, so a lookup may stay pending for as long as the network does.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::Coordinate;

#[derive(Debug, Error)]
pub enum LocationError {
    #[error("location lookup failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("location denied: {0}")]
    Denied(String),

    #[error("location lookup returned an invalid coordinate")]
    InvalidCoordinate,
}

#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Where the session's coordinate comes from.
#[derive(Debug, Clone)]
pub enum Locator {
    Fixed(Coordinate),
    IpLookup { client: Client, url: String },
}

impl Locator {
    pub fn ip_lookup(url: impl Into<String>) -> Self {
        Self::IpLookup {
            client: Client::new(),
            url: url.into(),
        }
    }

    pub async fn acquire(&self) -> Result<Coordinate, LocationError> {
        match self {
            Self::Fixed(coordinate) => {
                info!(%coordinate, "using configured location");
                Ok(*coordinate)
            }
            Self::IpLookup { client, url } => {
                let response: IpLookupResponse = client
                    .get(url)
                    .send()
                    .await?
                    .error_for_status()?
                    .json()
                    .await?;

                if response.status != "success" {
                    let message = response
                        .message
                        .unwrap_or_else(|| response.status.clone());
                    warn!(%message, "geolocation denied");
                    return Err(LocationError::Denied(message));
                }

                let (Some(lat), Some(lng)) = (response.lat, response.lon) else {
                    return Err(LocationError::InvalidCoordinate);
                };
                let coordinate = Coordinate::new(lat, lng);
                if !coordinate.is_valid() {
                    return Err(LocationError::InvalidCoordinate);
                }

                info!(
                    %coordinate,
                    city = response.city.as_deref().unwrap_or("?"),
                    "geolocation resolved"
                );
                Ok(coordinate)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LocationState {
    #[default]
    Pending,
    Available(Coordinate),
    Unavailable,
}

/// The session's location, resolved at most once.
#[derive(Debug, Default)]
pub struct CurrentLocation {
    state: LocationState,
}

impl CurrentLocation {
    pub const fn new() -> Self {
        Self {
            state: LocationState::Pending,
        }
    }

    /// Applies the lookup outcome. Returns `false` if the location was already resolved.
    pub fn resolve(&mut self, outcome: &Result<Coordinate, LocationError>) -> bool {
        if self.state != LocationState::Pending {
            warn!("ignoring a second location outcome");
            return false;
        }

        self.state = match outcome {
            Ok(coordinate) => LocationState::Available(*coordinate),
            Err(_) => LocationState::Unavailable,
        };
        true
    }

    pub const fn state(&self) -> LocationState {
        self.state
    }

    pub const fn coordinate(&self) -> Option<Coordinate> {
        match self.state {
            LocationState::Available(coordinate) => Some(coordinate),
            LocationState::Pending | LocationState::Unavailable => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_and_unavailable_have_no_coordinate() {
        let mut location = CurrentLocation::new();
        assert_eq!(location.coordinate(), None);

        assert!(location.resolve(&Err(LocationError::Denied("nope".into()))));
        assert_eq!(location.state(), LocationState::Unavailable);
        assert_eq!(location.coordinate(), None);
    }

    #[test]
    fn location_resolves_only_once() {
        let mut location = CurrentLocation::new();
        let here = Coordinate::new(25.04, 121.56);

        assert!(location.resolve(&Ok(here)));
        assert!(!location.resolve(&Ok(Coordinate::new(0.0, 0.0))));
        assert_eq!(location.coordinate(), Some(here));
    }

    #[tokio::test]
    async fn fixed_locator_returns_its_coordinate() {
        let here = Coordinate::new(48.85, 2.35);
        let coordinate = Locator::Fixed(here).acquire().await.expect("fixed never fails");
        assert_eq!(coordinate, here);
    }
}
