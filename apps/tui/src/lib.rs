// Export our modules for use in the binary and the integration tests
pub mod candidates;
pub mod config;
pub mod domain;
pub mod links;
pub mod location;
pub mod logging;
pub mod places;
pub mod wheel;

pub use domain::{Candidate, Coordinate, MinRating, Rating, SearchFilter};
