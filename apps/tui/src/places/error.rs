use thiserror::Error;

/// Why a search did not replace the candidate set.
///
/// The `Display` text of each variant is the notice shown to the user.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Unable to get your location")]
    LocationUnavailable,

    /// Network or TLS failure from the underlying HTTP client.
    #[error("Search failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with anything other than `OK`.
    #[error("Search failed ({status}){}", detail(.message))]
    ProviderStatus {
        status: String,
        message: Option<String>,
    },

    #[error("No places match the current filters")]
    NoMatches,

    #[error("Invalid places endpoint '{0}'")]
    InvalidEndpoint(String),
}

fn detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|message| format!(": {message}"))
        .unwrap_or_default()
}
