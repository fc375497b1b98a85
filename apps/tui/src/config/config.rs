use crate::domain::{Coordinate, MinRating, MAX_RADIUS_KM, MIN_RADIUS_KM};
use color_eyre::eyre::{eyre, Result};
use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PLACES_BASE_URL: &str = "https://maps.googleapis.com";
pub const DEFAULT_GEOLOCATION_URL: &str = "http://ip-api.com/json";
pub const DEFAULT_MAPS_HOST: &str = "www.google.com";
pub const DEFAULT_SPIN_DURATION_MS: u64 = 5200;
pub const DEFAULT_RADIUS_KM: u32 = 1;

/// Runtime settings, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub places_base_url: String,
    pub geolocation_url: String,
    pub maps_host: String,
    /// Skips geolocation when set.
    pub fixed_location: Option<Coordinate>,
    pub category: String,
    pub radius_km: u32,
    pub min_rating: MinRating,
    pub spin_duration: Duration,
    pub request_timeout: Option<Duration>,
    pub debug: bool,
}

/// Loads `.env` and builds the configuration from the process environment.
pub fn init_app_config() -> Result<AppConfig> {
    // Load environment variables from .env file
    dotenv().ok();

    AppConfig::from_lookup(|key| env::var(key).ok())
}

impl AppConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GOOGLE_MAPS_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| eyre!("GOOGLE_MAPS_API_KEY is not set"))?;

        let fixed_location = match (lookup("PLACES_WHEEL_LAT"), lookup("PLACES_WHEEL_LNG")) {
            (Some(lat), Some(lng)) => {
                let coordinate = Coordinate::new(
                    lat.trim()
                        .parse()
                        .map_err(|e| eyre!("Invalid PLACES_WHEEL_LAT '{lat}': {e}"))?,
                    lng.trim()
                        .parse()
                        .map_err(|e| eyre!("Invalid PLACES_WHEEL_LNG '{lng}': {e}"))?,
                );
                if !coordinate.is_valid() {
                    return Err(eyre!("Fixed location {coordinate} is out of range"));
                }
                Some(coordinate)
            }
            (None, None) => None,
            _ => return Err(eyre!("PLACES_WHEEL_LAT and PLACES_WHEEL_LNG must be set together")),
        };

        let radius_km = match lookup("PLACES_WHEEL_RADIUS_KM") {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|e| eyre!("Invalid PLACES_WHEEL_RADIUS_KM '{value}': {e}"))?,
            None => DEFAULT_RADIUS_KM,
        };
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
            return Err(eyre!(
                "PLACES_WHEEL_RADIUS_KM must be between {MIN_RADIUS_KM} and {MAX_RADIUS_KM}"
            ));
        }

        let min_rating = match lookup("PLACES_WHEEL_MIN_RATING") {
            Some(value) => MinRating::parse(&value)
                .ok_or_else(|| eyre!("Invalid PLACES_WHEEL_MIN_RATING '{value}'"))?,
            None => MinRating::Any,
        };

        let spin_duration_ms = match lookup("SPIN_DURATION_MS") {
            Some(value) => value
                .trim()
                .parse::<u64>()
                .map_err(|e| eyre!("Invalid SPIN_DURATION_MS '{value}': {e}"))?,
            None => DEFAULT_SPIN_DURATION_MS,
        };

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(value) => Some(Duration::from_secs(
                value
                    .trim()
                    .parse::<u64>()
                    .map_err(|e| eyre!("Invalid REQUEST_TIMEOUT_SECS '{value}': {e}"))?,
            )),
            None => None,
        };

        Ok(Self {
            api_key,
            places_base_url: lookup("PLACES_BASE_URL")
                .unwrap_or_else(|| DEFAULT_PLACES_BASE_URL.to_string()),
            geolocation_url: lookup("GEOLOCATION_URL")
                .unwrap_or_else(|| DEFAULT_GEOLOCATION_URL.to_string()),
            maps_host: lookup("MAPS_HOST").unwrap_or_else(|| DEFAULT_MAPS_HOST.to_string()),
            fixed_location,
            category: lookup("PLACES_WHEEL_CATEGORY").unwrap_or_default(),
            radius_km,
            min_rating,
            spin_duration: Duration::from_millis(spin_duration_ms),
            request_timeout,
            debug: lookup("DEBUG").is_some_and(|value| is_truthy(&value)),
        })
    }
}

/// Gets the path of the log file written while the TUI owns the terminal
fn is_truthy(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true")
}

pub fn log_file_path() -> PathBuf {
    env::var("PLACES_WHEEL_LOG").map_or_else(|_| PathBuf::from("./places-wheel.log"), PathBuf::from)
}
