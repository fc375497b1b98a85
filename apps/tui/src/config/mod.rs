#[allow(clippy::module_inception)]
mod config;

pub use config::{
    init_app_config, log_file_path, AppConfig, DEFAULT_GEOLOCATION_URL, DEFAULT_MAPS_HOST,
    DEFAULT_PLACES_BASE_URL,
};
