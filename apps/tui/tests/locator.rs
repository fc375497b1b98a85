//! Integration tests for the IP geolocation lookup.

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use places_wheel::location::{CurrentLocation, LocationError, LocationState, Locator};
use places_wheel::Coordinate;

async fn lookup_against(body: serde_json::Value) -> Result<Coordinate, LocationError> {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(&server)
        .await;

    Locator::ip_lookup(format!("{}/json", server.uri()))
        .acquire()
        .await
}

#[tokio::test]
async fn successful_lookup_resolves_the_location() {
    let outcome = lookup_against(json!({
        "status": "success",
        "lat": 25.0478,
        "lon": 121.5319,
        "city": "Taipei"
    }))
    .await;

    let mut location = CurrentLocation::new();
    assert!(location.resolve(&outcome));
    assert_eq!(
        location.state(),
        LocationState::Available(Coordinate::new(25.0478, 121.5319))
    );
}

#[tokio::test]
async fn failed_lookup_leaves_location_unavailable() {
    let outcome = lookup_against(json!({
        "status": "fail",
        "message": "private range"
    }))
    .await;

    assert!(matches!(outcome, Err(LocationError::Denied(ref message)) if message == "private range"));

    let mut location = CurrentLocation::new();
    location.resolve(&outcome);
    assert_eq!(location.state(), LocationState::Unavailable);
    assert!(location.coordinate().is_none());
}

#[tokio::test]
async fn out_of_range_coordinates_are_rejected() {
    let outcome = lookup_against(json!({
        "status": "success",
        "lat": 123.0,
        "lon": 10.0
    }))
    .await;

    assert!(matches!(outcome, Err(LocationError::InvalidCoordinate)));
}

#[tokio::test]
async fn fixed_locator_needs_no_network() {
    let coordinate = Coordinate::new(-33.8688, 151.2093);
    let outcome = Locator::Fixed(coordinate).acquire().await;
    assert_eq!(outcome.expect("fixed location"), coordinate);
}
