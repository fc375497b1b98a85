//! Nearby place search and candidate filtering.

mod client;
mod error;
mod types;

pub use client::{GooglePlacesClient, PlacesProvider};
pub use error::SearchError;
pub use types::{Geometry, LatLng, NearbyRequest, NearbyResponse, RawPlace, STATUS_OK};

use tracing::{info, warn};

use crate::domain::{Candidate, Coordinate, SearchFilter};

/// Runs one search around `origin` and returns the filtered candidates.
///
/// Fails without contacting the provider when the origin is not known yet.
/// An `OK` answer that leaves nothing after filtering is reported as
/// [`SearchError::NoMatches`] so the caller keeps its previous set.
pub async fn search<P>(
    provider: &P,
    origin: Option<Coordinate>,
    filter: &SearchFilter,
) -> Result<Vec<Candidate>, SearchError>
where
    P: PlacesProvider,
{
    let Some(center) = origin else {
        warn!("search refused: location not available");
        return Err(SearchError::LocationUnavailable);
    };

    let request = NearbyRequest {
        center,
        radius_m: filter.radius_m(),
        keyword: filter.category().to_string(),
        open_now: true,
    };

    let response = provider.nearby_search(&request).await?;
    if response.status != STATUS_OK {
        warn!(status = %response.status, "provider rejected search");
        return Err(SearchError::ProviderStatus {
            status: response.status,
            message: response.error_message,
        });
    }

    let received = response.results.len();
    let candidates = filter_candidates(response.results, filter);
    info!(
        received,
        kept = candidates.len(),
        keyword = %filter.category(),
        "search finished"
    );

    if candidates.is_empty() {
        return Err(SearchError::NoMatches);
    }
    Ok(candidates)
}

/// Maps raw provider records to candidates, keeping provider order.
pub fn filter_candidates(places: Vec<RawPlace>, filter: &SearchFilter) -> Vec<Candidate> {
    places
        .into_iter()
        .map(Candidate::from)
        .filter(|candidate| filter.admits(candidate))
        .collect()
}

/// Hands out search generations so only the latest dispatch is applied.
#[derive(Debug, Default)]
pub struct SearchGenerations {
    latest: u64,
}

impl SearchGenerations {
    pub const fn new() -> Self {
        Self { latest: 0 }
    }

    /// Starts a new generation, superseding every earlier one.
    pub fn next(&mut self) -> u64 {
        self.latest += 1;
        self.latest
    }

    pub const fn is_current(&self, generation: u64) -> bool {
        generation == self.latest
    }
}
