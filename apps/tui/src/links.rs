use crate::domain::Candidate;

/// Page listing the reviews of a place.
pub fn review_url(maps_host: &str, place_id: &str) -> String {
    format!(
        "https://{maps_host}/maps/place/?q=place_id:{}",
        urlencoding::encode(place_id)
    )
}

/// Turn-by-turn directions to a place.
///
/// Falls back to the coordinate when the provider gave no address.
pub fn navigation_url(maps_host: &str, candidate: &Candidate) -> String {
    let destination = candidate.address.as_deref().map_or_else(
        || format!("{},{}", candidate.location.lat, candidate.location.lng),
        str::to_string,
    );
    format!(
        "https://{maps_host}/maps/dir/?api=1&destination={}",
        urlencoding::encode(&destination)
    )
}

/// Opens `url` in the system browser.
pub fn open_in_browser(url: &str) -> std::io::Result<()> {
    tracing::info!(%url, "opening link");
    webbrowser::open(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Rating};

    fn candidate(address: Option<&str>) -> Candidate {
        Candidate {
            name: "Noodle Bar".to_string(),
            rating: Rating::Rated(4.4),
            address: address.map(str::to_string),
            location: Coordinate::new(25.5, 121.25),
            place_id: "ChIJ123".to_string(),
        }
    }

    #[test]
    fn review_url_uses_place_id() {
        assert_eq!(
            review_url("www.google.com", "ChIJ123"),
            "https://www.google.com/maps/place/?q=place_id:ChIJ123"
        );
    }

    #[test]
    fn navigation_url_encodes_the_address() {
        assert_eq!(
            navigation_url("www.google.com", &candidate(Some("12 Main St, Taipei"))),
            "https://www.google.com/maps/dir/?api=1&destination=12%20Main%20St%2C%20Taipei"
        );
    }

    #[test]
    fn navigation_url_falls_back_to_coordinates() {
        assert_eq!(
            navigation_url("maps.example", &candidate(None)),
            "https://maps.example/maps/dir/?api=1&destination=25.5%2C121.25"
        );
    }
}
