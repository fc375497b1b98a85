use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Smallest and largest values of the distance slider, in kilometres.
pub const MIN_RADIUS_KM: u32 = 1;
pub const MAX_RADIUS_KM: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lng)
    }
}

/// A provider rating, or the "unrated" sentinel when the provider sent none.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Rating {
    Rated(f64),
    Unrated,
}

impl Rating {
    pub fn from_option(value: Option<f64>) -> Self {
        value.map_or(Self::Unrated, Self::Rated)
    }

    /// An unrated place never passes a threshold.
    pub fn meets(self, min_rating: Option<f64>) -> bool {
        match (self, min_rating) {
            (_, None) => true,
            (Self::Rated(rating), Some(min)) => rating >= min,
            (Self::Unrated, Some(_)) => false,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rated(rating) => write!(f, "{rating:.1}"),
            Self::Unrated => write!(f, "unrated"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub name: String,
    pub rating: Rating,
    /// `None` is the "unknown address" sentinel.
    pub address: Option<String>,
    pub location: Coordinate,
    pub place_id: String,
}

impl Candidate {
    pub fn address_label(&self) -> &str {
        self.address.as_deref().unwrap_or("address unknown")
    }
}

/// Steps offered by the minimum-rating selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MinRating {
    #[default]
    Any,
    Three,
    ThreeHalf,
    Four,
    FourHalf,
}

impl MinRating {
    pub const ALL: [Self; 5] = [
        Self::Any,
        Self::Three,
        Self::ThreeHalf,
        Self::Four,
        Self::FourHalf,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Any => "any",
            Self::Three => "3.0",
            Self::ThreeHalf => "3.5",
            Self::Four => "4.0",
            Self::FourHalf => "4.5",
        }
    }

    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Any),
            1 => Some(Self::Three),
            2 => Some(Self::ThreeHalf),
            3 => Some(Self::Four),
            4 => Some(Self::FourHalf),
            _ => None,
        }
    }

    pub const fn index(self) -> usize {
        match self {
            Self::Any => 0,
            Self::Three => 1,
            Self::ThreeHalf => 2,
            Self::Four => 3,
            Self::FourHalf => 4,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "any" | "0" => Some(Self::Any),
            "3" | "3.0" => Some(Self::Three),
            "3.5" => Some(Self::ThreeHalf),
            "4" | "4.0" => Some(Self::Four),
            "4.5" => Some(Self::FourHalf),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Any => "Any rating",
            Self::Three => "3.0+",
            Self::ThreeHalf => "3.5+",
            Self::Four => "4.0+",
            Self::FourHalf => "4.5+",
        }
    }

    pub const fn value(self) -> Option<f64> {
        match self {
            Self::Any => None,
            Self::Three => Some(3.0),
            Self::ThreeHalf => Some(3.5),
            Self::Four => Some(4.0),
            Self::FourHalf => Some(4.5),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("search radius must be positive")]
    ZeroRadius,

    #[error("minimum rating {0} is outside 0..=5")]
    RatingOutOfRange(f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    category: String,
    radius_m: u32,
    min_rating: Option<f64>,
}

impl SearchFilter {
    pub fn new(
        category: impl Into<String>,
        radius_m: u32,
        min_rating: Option<f64>,
    ) -> Result<Self, FilterError> {
        if radius_m == 0 {
            return Err(FilterError::ZeroRadius);
        }
        if let Some(min) = min_rating {
            if !(0.0..=5.0).contains(&min) {
                return Err(FilterError::RatingOutOfRange(min));
            }
        }

        Ok(Self {
            category: category.into().trim().to_string(),
            radius_m,
            min_rating,
        })
    }

    /// Builds a filter from the on-screen controls (slider in km, stepped rating).
    pub fn from_controls(
        category: &str,
        radius_km: u32,
        min_rating: MinRating,
    ) -> Result<Self, FilterError> {
        let radius_km = radius_km.clamp(MIN_RADIUS_KM, MAX_RADIUS_KM);
        Self::new(category.trim(), radius_km * 1000, min_rating.value())
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub const fn radius_m(&self) -> u32 {
        self.radius_m
    }

    pub const fn min_rating(&self) -> Option<f64> {
        self.min_rating
    }

    pub fn admits(&self, candidate: &Candidate) -> bool {
        candidate.rating.meets(self.min_rating)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unrated_never_passes_a_threshold() {
        assert!(Rating::Unrated.meets(None));
        assert!(!Rating::Unrated.meets(Some(0.0)));
        assert!(Rating::Rated(4.0).meets(Some(4.0)));
        assert!(!Rating::Rated(3.9).meets(Some(4.0)));
    }

    #[test]
    fn controls_convert_kilometres_to_metres() {
        let filter = SearchFilter::from_controls(" ramen ", 3, MinRating::Four).expect("valid");
        assert_eq!(filter.category(), "ramen");
        assert_eq!(filter.radius_m(), 3000);
        assert_eq!(filter.min_rating(), Some(4.0));

        let clamped = SearchFilter::from_controls("cafe", 0, MinRating::Any).expect("valid");
        assert_eq!(clamped.radius_m(), 1000);
        assert_eq!(clamped.min_rating(), None);
    }

    #[test]
    fn filter_validation_rejects_bad_input() {
        assert_eq!(
            SearchFilter::new("bar", 0, None),
            Err(FilterError::ZeroRadius)
        );
        assert_eq!(
            SearchFilter::new("bar", 500, Some(5.5)),
            Err(FilterError::RatingOutOfRange(5.5))
        );
        assert!(SearchFilter::new("bar", 500, Some(5.0)).is_ok());
    }

    #[test]
    fn controls_are_validated_like_raw_filters() {
        assert_eq!(
            SearchFilter::from_controls("bar", 2, MinRating::ThreeHalf),
            SearchFilter::new("bar", 2000, Some(3.5))
        );
    }

    #[test]
    fn min_rating_parse_and_index_agree() {
        for option in MinRating::ALL {
            assert_eq!(MinRating::parse(option.as_str()), Some(option));
            assert_eq!(MinRating::from_index(option.index()), Some(option));
        }
        assert_eq!(MinRating::parse("2.5"), None);
    }
}
