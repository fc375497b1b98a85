use clap::Parser;

#[derive(Debug, Parser)]
#[command(
    name = "places-wheel",
    version,
    about = "Search nearby places and let a wheel pick one"
)]
pub struct CliArgs {
    /// Search once, spin and print the pick instead of opening the TUI
    #[arg(long)]
    pub headless: bool,

    /// Print the headless pick as JSON
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Search keyword, e.g. "ramen"
    #[arg(long, value_name = "KEYWORD")]
    pub category: Option<String>,

    /// Search radius in kilometres (1-50)
    #[arg(long = "radius-km", value_name = "KM")]
    pub radius_km: Option<u32>,

    /// Minimum rating: any, 3.0, 3.5, 4.0 or 4.5
    #[arg(long = "min-rating", value_name = "RATING")]
    pub min_rating: Option<String>,

    /// Use this latitude instead of an IP lookup (requires --lng)
    #[arg(long, value_name = "DEG", allow_hyphen_values = true, requires = "lng")]
    pub lat: Option<f64>,

    /// Use this longitude instead of an IP lookup (requires --lat)
    #[arg(long, value_name = "DEG", allow_hyphen_values = true, requires = "lat")]
    pub lng: Option<f64>,

    /// Spin animation length in milliseconds
    #[arg(long = "spin-ms", value_name = "MS")]
    pub spin_ms: Option<u64>,
}

impl CliArgs {
    /// Flags win over the environment and `.env`; config reads them back from there.
    pub fn apply_env_overrides(&self) {
        if let Some(category) = &self.category {
            std::env::set_var("PLACES_WHEEL_CATEGORY", category);
        }
        if let Some(radius_km) = self.radius_km {
            std::env::set_var("PLACES_WHEEL_RADIUS_KM", radius_km.to_string());
        }
        if let Some(min_rating) = &self.min_rating {
            std::env::set_var("PLACES_WHEEL_MIN_RATING", min_rating);
        }
        if let (Some(lat), Some(lng)) = (self.lat, self.lng) {
            std::env::set_var("PLACES_WHEEL_LAT", lat.to_string());
            std::env::set_var("PLACES_WHEEL_LNG", lng.to_string());
        }
        if let Some(spin_ms) = self.spin_ms {
            std::env::set_var("SPIN_DURATION_MS", spin_ms.to_string());
        }
        if self.debug {
            std::env::set_var("DEBUG", "1");
        }
    }
}
