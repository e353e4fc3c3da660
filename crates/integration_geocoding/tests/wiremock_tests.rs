//! Integration tests for the provider clients (wiremock-based)

use std::time::Duration;

use domain::{GeoPoint, GeocodeProvider};
use wiremock::matchers::{method, path, query_param, query_param_contains};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_geocoding::{
    GeocodingConfig, GeocodingError, GeocodingProvider, NominatimClient, OverpassClient,
    PoiProvider, SwisstopoClient,
};

fn config_for_mock(base_url: &str) -> GeocodingConfig {
    GeocodingConfig::for_testing().with_base_url(base_url)
}

const fn swisstopo_search_json() -> &'static str {
    r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {
                    "origin": "address",
                    "label": "Rue de Lausanne 12 <b>1950 Sion</b>",
                    "lat": 46.2319,
                    "lon": 7.3569,
                    "weight": 10,
                    "rank": 7
                }
            },
            {
                "type": "Feature",
                "properties": {
                    "origin": "address",
                    "label": "Rue de Lausanne 12 <b>1110 Morges</b>",
                    "lat": 46.5107,
                    "lon": 6.4986,
                    "weight": 5,
                    "rank": 7
                }
            }
        ]
    }"#
}

const fn swisstopo_identify_json() -> &'static str {
    r#"{
        "results": [{
            "layerBodId": "ch.bfs.gebaeude_wohnungs_register",
            "geometry": {"type": "Point", "coordinates": [7.44744, 46.94798]},
            "properties": {
                "strname_deinr": "Bundesplatz 3",
                "dplz4": 3011,
                "dplzname": "Bern",
                "label": "Bundesplatz 3"
            }
        }]
    }"#
}

#[tokio::test]
async fn test_swisstopo_geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/SearchServer"))
        .and(query_param("searchText", "Rue de Lausanne 12"))
        .and(query_param("origins", "address"))
        .and(query_param("sr", "4326"))
        .respond_with(ResponseTemplate::new(200).set_body_string(swisstopo_search_json()))
        .mount(&server)
        .await;

    let client = SwisstopoClient::new(&config_for_mock(&server.uri())).unwrap();
    let results = client.geocode("Rue de Lausanne 12").await.unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].label, "Rue de Lausanne 12 1950 Sion");
    assert_eq!(results[0].source_provider, GeocodeProvider::Swiss);
    assert!((results[0].confidence - 1.0).abs() < 1e-9);
    assert!((results[1].confidence - 0.5).abs() < 1e-9);
}

#[tokio::test]
async fn test_swisstopo_reverse_geocode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/MapServer/identify"))
        .and(query_param("geometryType", "esriGeometryPoint"))
        .and(query_param_contains("layers", "gebaeude_wohnungs_register"))
        .respond_with(ResponseTemplate::new(200).set_body_string(swisstopo_identify_json()))
        .mount(&server)
        .await;

    let client = SwisstopoClient::new(&config_for_mock(&server.uri())).unwrap();
    let results = client.reverse_geocode(&GeoPoint::bern()).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].label, "Bundesplatz 3, 3011 Bern");
}

#[tokio::test]
async fn test_swisstopo_server_error_is_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/SearchServer"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = SwisstopoClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Bern").await.unwrap_err();

    assert!(matches!(err, GeocodingError::ServiceUnavailable(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_swisstopo_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/SearchServer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = SwisstopoClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Bern").await.unwrap_err();
    assert!(matches!(err, GeocodingError::ParseError(_)));
}

#[tokio::test]
async fn test_swisstopo_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/SearchServer"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(swisstopo_search_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = GeocodingConfig {
        timeout_secs: 1,
        ..config_for_mock(&server.uri())
    };
    let client = SwisstopoClient::new(&config).unwrap();
    let err = client.geocode("Bern").await.unwrap_err();

    assert!(matches!(err, GeocodingError::Timeout { timeout_secs: 1 }));
}

#[tokio::test]
async fn test_nominatim_geocode_with_country_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Gastlosen"))
        .and(query_param("countrycodes", "ch"))
        .and(query_param("format", "jsonv2"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[
                {"lat": "46.5834", "lon": "7.2812", "display_name": "Gastlosen, Jaun, Fribourg", "importance": 0.41},
                {"lat": "not-a-number", "lon": "7.0", "display_name": "Broken"}
            ]"#,
        ))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&config_for_mock(&server.uri())).unwrap();
    let results = client.geocode("Gastlosen").await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].label, "Gastlosen, Jaun, Fribourg");
    assert_eq!(results[0].source_provider, GeocodeProvider::Generic);
}

#[tokio::test]
async fn test_nominatim_reverse_geocode() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/reverse"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{"lat": "46.2331", "lon": "7.3606", "display_name": "Place de la Planta, Sion"}"#,
        ))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&config_for_mock(&server.uri())).unwrap();
    let results = client.reverse_geocode(&GeoPoint::sion()).await.unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].label, "Place de la Planta, Sion");
}

#[tokio::test]
async fn test_nominatim_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Sion").await.unwrap_err();

    assert!(matches!(
        err,
        GeocodingError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_nominatim_client_error_not_retryable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = NominatimClient::new(&config_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Sion").await.unwrap_err();

    assert!(matches!(err, GeocodingError::RequestFailed(_)));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_overpass_pois() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/interpreter"))
        .and(query_param_contains("data", "around:500,46.2331,7.3606"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "version": 0.6,
                "elements": [
                    {"type": "node", "id": 10, "lat": 46.2340, "lon": 7.3606, "tags": {"name": "Sion, Planta", "public_transport": "platform"}},
                    {"type": "node", "id": 11, "lat": 46.2332, "lon": 7.3607, "tags": {"name": "Café du Grand-Pont", "amenity": "cafe"}}
                ]
            }"#,
        ))
        .mount(&server)
        .await;

    let client = OverpassClient::new(&config_for_mock(&server.uri())).unwrap();
    let pois = client.find_pois(&GeoPoint::sion(), 500).await.unwrap();

    assert_eq!(pois.len(), 2);
    assert_eq!(pois[0].name, "Café du Grand-Pont");
    assert_eq!(pois[0].category, "cafe");
    assert_eq!(pois[1].category, "platform");
    assert!(pois[1].distance_m > 90.0 && pois[1].distance_m < 110.0);
}

#[tokio::test]
async fn test_health_probes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/SearchServer"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"features": []}"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/status"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = config_for_mock(&server.uri());
    assert!(SwisstopoClient::new(&config).unwrap().is_healthy().await);
    assert!(!NominatimClient::new(&config).unwrap().is_healthy().await);
    assert!(!PoiProvider::is_healthy(&OverpassClient::new(&config).unwrap()).await);
}
