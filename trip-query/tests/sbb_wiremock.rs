//! Integration tests for the transport.opendata.ch provider (wiremock-based)

use chrono::NaiveDateTime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use trip_query::domain::{Location, QueryTime, parse_datetime};
use trip_query::provider::{
    Provider, ProviderError, ProviderManager, ProviderSettings, SbbConfig, SbbProvider,
    TripOptions, WALK_LINE,
};
use trip_query::query::{QueryConfig, QueryContext, QueryOrchestrator, QueryState};

fn provider_for_mock(base_url: &str) -> SbbProvider {
    let config = SbbConfig::default()
        .with_base_url(base_url)
        .with_timeout(1)
        .with_max_results(3);
    SbbProvider::new(config).unwrap()
}

fn when() -> NaiveDateTime {
    parse_datetime("2024-03-01T08:00").unwrap()
}

fn bern() -> Location {
    Location::new("Bern").with_id("8507000")
}

fn zurich() -> Location {
    Location::new("Zürich HB").with_id("8503000")
}

const fn bern_locations_json() -> &'static str {
    r#"{
        "stations": [
            {
                "id": "8507000",
                "name": "Bern",
                "score": null,
                "coordinate": { "type": "WGS84", "x": 46.948832, "y": 7.439136 },
                "distance": null
            },
            {
                "id": "8507100",
                "name": "Bern Wankdorf",
                "score": null,
                "coordinate": { "type": "WGS84", "x": 46.96781, "y": 7.465261 },
                "distance": null
            }
        ]
    }"#
}

const fn zurich_locations_json() -> &'static str {
    r#"{ "stations": [{ "id": "8503000", "name": "Zürich HB" }] }"#
}

/// Bern -> Zürich HB on the IC 1, three minutes late out of Bern, then a
/// short walk to the tram stop.
const fn sample_connections_json() -> &'static str {
    r#"{
        "connections": [{
            "from": { "station": { "id": "8507000", "name": "Bern" } },
            "to": { "station": { "id": "8591059", "name": "Zürich, Bahnhofquai/HB" } },
            "duration": "00d01:05:00",
            "transfers": 0,
            "sections": [
                {
                    "journey": {
                        "name": "IC 1 711",
                        "category": "IC",
                        "number": "1",
                        "operator": "SBB",
                        "passList": [
                            {
                                "station": { "id": "8507000", "name": "Bern" },
                                "arrival": null,
                                "departure": "2024-03-01T08:02:00+0100",
                                "delay": 3,
                                "platform": "7"
                            },
                            {
                                "station": { "id": "8500218", "name": "Olten" },
                                "arrival": "2024-03-01T08:28:00+0100",
                                "departure": "2024-03-01T08:30:00+0100",
                                "delay": null,
                                "platform": "12"
                            },
                            {
                                "station": { "id": "8503000", "name": "Zürich HB" },
                                "arrival": "2024-03-01T08:58:00+0100",
                                "departure": null,
                                "delay": null,
                                "platform": "31"
                            }
                        ]
                    },
                    "walk": null,
                    "departure": {
                        "station": { "id": "8507000", "name": "Bern" },
                        "arrival": null,
                        "departure": "2024-03-01T08:02:00+0100",
                        "delay": 3,
                        "platform": "7",
                        "prognosis": { "platform": null, "arrival": null, "departure": null }
                    },
                    "arrival": {
                        "station": { "id": "8503000", "name": "Zürich HB" },
                        "arrival": "2024-03-01T08:58:00+0100",
                        "departure": null,
                        "delay": null,
                        "platform": "31",
                        "prognosis": { "platform": null, "arrival": null, "departure": null }
                    }
                },
                {
                    "journey": null,
                    "walk": { "duration": "00:05:00" },
                    "departure": {
                        "station": { "id": "8503000", "name": "Zürich HB" },
                        "departure": "2024-03-01T09:02:00+0100"
                    },
                    "arrival": {
                        "station": { "id": "8591059", "name": "Zürich, Bahnhofquai/HB" },
                        "arrival": "2024-03-01T09:07:00+0100"
                    }
                }
            ]
        }]
    }"#
}

#[tokio::test]
async fn test_search_locations_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .and(query_param("query", "Bern"))
        .and(query_param("type", "station"))
        .respond_with(ResponseTemplate::new(200).set_body_string(bern_locations_json()))
        .mount(&server)
        .await;

    let provider = provider_for_mock(&server.uri());
    let locations = provider.search_locations("Bern").await.unwrap();

    assert_eq!(locations.len(), 2);
    assert_eq!(locations[0].name, "Bern");
    assert_eq!(locations[0].id.as_deref(), Some("8507000"));
    assert_eq!(locations[0].coordinates(), Some((46.948832, 7.439136)));
    assert_eq!(locations[1].name, "Bern Wankdorf");
}

#[tokio::test]
async fn test_search_trips_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connections"))
        .and(query_param("from", "8507000"))
        .and(query_param("to", "8503000"))
        .and(query_param("date", "2024-03-01"))
        .and(query_param("time", "08:00"))
        .and(query_param("isArrivalTime", "0"))
        .and(query_param("limit", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_connections_json()))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for_mock(&server.uri());
    let trips = provider
        .search_trips(&bern(), &zurich(), when(), &TripOptions::default())
        .await
        .unwrap();

    assert_eq!(trips.len(), 1);
    let trip = &trips[0];
    assert!(!trip.is_canceled());
    assert_eq!(trip.switches(), 1);
    assert_eq!(trip.start().name(), "Bern");
    assert_eq!(trip.end().name(), "Zürich, Bahnhofquai/HB");
    assert_eq!(trip.departure_delay(), Some(3));
    assert_eq!(trip.arrival_delay(), None);
    assert_eq!(trip.duration().num_minutes(), 65);

    let first = trip.first_part();
    assert_eq!(first.line(), "IC 1");
    assert_eq!(first.start().departure_platform.as_deref(), Some("7"));
    let stops: Vec<&str> = first.stops().iter().map(|s| s.name()).collect();
    assert_eq!(stops, vec!["Olten"]);
    assert_eq!(trip.last_part().line(), WALK_LINE);
}

#[tokio::test]
async fn test_search_trips_by_arrival_with_names() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connections"))
        .and(query_param("from", "Thun"))
        .and(query_param("isArrivalTime", "1"))
        .and(query_param("limit", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"connections": []}"#))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for_mock(&server.uri());
    let options = TripOptions::default().by_arrival(true).with_max_results(2);
    let trips = provider
        .search_trips(&Location::new("Thun"), &zurich(), when(), &options)
        .await
        .unwrap();
    assert!(trips.is_empty());
}

#[tokio::test]
async fn test_unparseable_times_rejected() {
    let server = MockServer::start().await;
    let body = sample_connections_json().replace("2024-03-01T09:07:00+0100", "09:07");

    Mock::given(method("GET"))
        .and(path("/connections"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(&server)
        .await;

    let provider = provider_for_mock(&server.uri());
    let err = provider
        .search_trips(&bern(), &zurich(), when(), &TripOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let provider = provider_for_mock(&server.uri());
    let err = provider.search_locations("Bern").await.unwrap_err();
    assert_eq!(err.to_string(), "API error 503: Service Unavailable");
}

#[tokio::test]
async fn test_query_through_manager() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .and(query_param("query", "Bern"))
        .respond_with(ResponseTemplate::new(200).set_body_string(bern_locations_json()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/locations"))
        .and(query_param("query", "Zürich"))
        .respond_with(ResponseTemplate::new(200).set_body_string(zurich_locations_json()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/connections"))
        .and(query_param("from", "8507000"))
        .and(query_param("to", "8503000"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_connections_json()))
        .expect(1)
        .mount(&server)
        .await;

    let manager = ProviderManager::new(ProviderSettings::default().with_base_url(server.uri()));
    let provider = manager.activate("ch-sbb").unwrap();
    assert_eq!(provider.name(), "ch-sbb");

    let config = QueryConfig::default();
    let context = QueryContext::new("Bern", "Zürich", QueryTime::At(when()));
    let mut query = QueryOrchestrator::new(&provider, &config, context);
    let trips = query.run().await.unwrap();

    assert_eq!(query.state(), QueryState::Done);
    assert_eq!(trips.len(), 1);
    assert_eq!(query.context().start.as_ref().unwrap().name, "Bern");
}
