//! HTTP client for the Google Places Nearby Search web service.

use std::future::Future;
use std::time::Duration;

use reqwest::{Client, Url};
use tracing::debug;

use super::error::SearchError;
use super::types::{NearbyRequest, NearbyResponse};

const NEARBY_SEARCH_PATH: &str = "maps/api/place/nearbysearch/json";

/// Anything that can answer a nearby-places query.
pub trait PlacesProvider {
    fn nearby_search(
        &self,
        request: &NearbyRequest,
    ) -> impl Future<Output = Result<NearbyResponse, SearchError>> + Send;
}

/// Client for the Nearby Search endpoint.
///
/// The base URL comes from config so tests can point it at a mock server.
#[derive(Debug, Clone)]
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    endpoint: Url,
}

impl GooglePlacesClient {
    pub fn with_base_url(
        api_key: &str,
        timeout: Option<Duration>,
        base_url: &str,
    ) -> Result<Self, SearchError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        // Exactly one slash before the path so the join keeps any base path.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&normalised)
            .and_then(|base| base.join(NEARBY_SEARCH_PATH))
            .map_err(|e| SearchError::InvalidEndpoint(format!("{base_url}: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            endpoint,
        })
    }

    fn build_url(&self, request: &NearbyRequest) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(
                "location",
                &format!("{},{}", request.center.lat, request.center.lng),
            );
            pairs.append_pair("radius", &request.radius_m.to_string());
            if !request.keyword.is_empty() {
                pairs.append_pair("keyword", &request.keyword);
            }
            if request.open_now {
                pairs.append_pair("opennow", "true");
            }
            pairs.append_pair("key", &self.api_key);
        }
        url
    }
}

impl PlacesProvider for GooglePlacesClient {
    async fn nearby_search(&self, request: &NearbyRequest) -> Result<NearbyResponse, SearchError> {
        let url = self.build_url(request);
        debug!(
            keyword = %request.keyword,
            radius_m = request.radius_m,
            center = %request.center,
            "nearby search"
        );

        let response = self
            .client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json::<NearbyResponse>()
            .await?;

        debug!(
            status = %response.status,
            results = response.results.len(),
            "nearby search answered"
        );
        Ok(response)
    }
}
