//! Integration tests for the HTTP API.
//!
//! The Google Geocoding and Routes APIs are replaced by an `httpmock` server.

use std::sync::Arc;
use std::time::Duration;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use driveroute::{Config, RouteService};
use driveroute_service::{build_router, AppState};
use httpmock::prelude::*;
use serde_json::{json, Value};

const GEOCODE_PATH: &str = "/maps/api/geocode/json";
const ROUTES_PATH: &str = "/directions/v2:computeRoutes";
const FRONTEND: &str = "http://localhost:3000";

fn test_config(upstream: &MockServer, api_key: Option<&str>) -> Config {
    Config {
        api_key: api_key.map(str::to_string),
        geocoding_url: upstream.url(GEOCODE_PATH),
        routes_url: upstream.url(ROUTES_PATH),
        frontend_origin: FRONTEND.to_string(),
        ..Config::default()
    }
}

fn create_test_server(config: Config) -> TestServer {
    let route_service = RouteService::new(config).unwrap();
    let state = Arc::new(AppState { route_service });
    TestServer::new(build_router(state).unwrap()).unwrap()
}

fn geocode_ok(address: &str, lat: f64, lng: f64) -> Value {
    json!({
        "status": "OK",
        "results": [{
            "formatted_address": address,
            "geometry": { "location": { "lat": lat, "lng": lng } }
        }]
    })
}

/// Register geocode mocks for "Tokyo" and "Osaka".
async fn mock_geocoder(upstream: &MockServer) {
    upstream
        .mock_async(|when, then| {
            when.method(GET)
                .path(GEOCODE_PATH)
                .query_param("address", "Tokyo");
            then.status(200)
                .json_body(geocode_ok("日本、東京都千代田区丸の内１丁目 東京駅", 35.681236, 139.767125));
        })
        .await;
    upstream
        .mock_async(|when, then| {
            when.method(GET)
                .path(GEOCODE_PATH)
                .query_param("address", "Osaka");
            then.status(200)
                .json_body(geocode_ok("日本、大阪府大阪市北区梅田３丁目１ 大阪駅", 34.702485, 135.495951));
        })
        .await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, None));

    let response = server.get("/").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["status"], "ok");
    assert!(json["message"].as_str().is_some());

    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_config_endpoint_exposes_key() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, Some("server-key")));

    let response = server.get("/api/config").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert_eq!(json["mapsApiKey"], "server-key");
}

#[tokio::test]
async fn test_config_endpoint_prefers_browser_key() {
    let upstream = MockServer::start_async().await;
    let mut config = test_config(&upstream, Some("server-key"));
    config.maps_browser_key = Some("browser-key".to_string());
    let server = create_test_server(config);

    let json: Value = server.get("/api/config").await.json();
    assert_eq!(json["mapsApiKey"], "browser-key");
}

#[tokio::test]
async fn test_config_endpoint_without_key() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, None));

    let response = server.get("/api/config").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["mapsApiKey"].is_null());
}

#[tokio::test]
async fn test_config_endpoint_exposure_disabled() {
    let upstream = MockServer::start_async().await;
    let mut config = test_config(&upstream, Some("server-key"));
    config.expose_maps_key = false;
    let server = create_test_server(config);

    let json: Value = server.get("/api/config").await.json();
    assert!(json["mapsApiKey"].is_null());
}

#[tokio::test]
async fn test_geocode_endpoint_success() {
    let upstream = MockServer::start_async().await;
    mock_geocoder(&upstream).await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server.get("/api/geocode?address=Tokyo").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(!json["address"].as_str().unwrap().is_empty());
    let lat = json["latitude"].as_f64().unwrap();
    let lng = json["longitude"].as_f64().unwrap();
    assert!((-90.0..=90.0).contains(&lat));
    assert!((-180.0..=180.0).contains(&lng));
    assert_eq!(lat, 35.681236);
}

#[tokio::test]
async fn test_geocode_endpoint_missing_key() {
    let upstream = MockServer::start_async().await;
    let geocoder = upstream
        .mock_async(|when, then| {
            when.method(GET).path(GEOCODE_PATH);
            then.status(200).json_body(geocode_ok("x", 0.0, 0.0));
        })
        .await;
    let server = create_test_server(test_config(&upstream, None));

    let response = server.get("/api/geocode?address=Tokyo").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json();
    assert_eq!(json["detail"], "GCP_API_KEY is not configured");
    geocoder.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_geocode_endpoint_zero_results() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path(GEOCODE_PATH);
            then.status(200)
                .json_body(json!({ "status": "ZERO_RESULTS", "results": [] }));
        })
        .await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server.get("/api/geocode?address=Nowhere").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["detail"].as_str().unwrap().contains("ZERO_RESULTS"));
}

#[tokio::test]
async fn test_geocode_endpoint_upstream_status_propagated() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path(GEOCODE_PATH);
            then.status(429).body("quota exceeded");
        })
        .await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server.get("/api/geocode?address=Tokyo").await;

    response.assert_status(StatusCode::TOO_MANY_REQUESTS);
    let json: Value = response.json();
    assert_eq!(json["detail"], "Geocoding API error: quota exceeded");
}

#[tokio::test]
async fn test_geocode_endpoint_missing_address() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server.get("/api/geocode").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["detail"].as_str().is_some());
}

#[tokio::test]
async fn test_route_endpoint_success() {
    let upstream = MockServer::start_async().await;
    mock_geocoder(&upstream).await;
    let routes = upstream
        .mock_async(|when, then| {
            when.method(POST)
                .path(ROUTES_PATH)
                .header("x-goog-api-key", "test-key")
                .header(
                    "x-goog-fieldmask",
                    "routes.duration,routes.distanceMeters,routes.polyline.encodedPolyline",
                );
            then.status(200).json_body(json!({
                "routes": [{
                    "distanceMeters": 503_214,
                    "duration": "21661s",
                    "polyline": { "encodedPolyline": "u{~vFvyys@fS]" }
                }]
            }));
        })
        .await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .post("/api/route")
        .json(&json!({ "origin": "Tokyo", "destination": "Osaka" }))
        .await;

    response.assert_status_ok();
    routes.assert_async().await;
    let json: Value = response.json();
    assert_eq!(json["distance"], "503.2 km");
    assert_eq!(json["duration"], "6時間1分");
    assert_eq!(json["polyline"], "u{~vFvyys@fS]");
    assert_eq!(json["origin_coords"]["latitude"], 35.681236);
    assert_eq!(json["origin_coords"]["longitude"], 139.767125);
    assert_eq!(json["destination_coords"]["latitude"], 34.702485);
    assert_eq!(json["destination_coords"]["longitude"], 135.495951);
}

#[tokio::test]
async fn test_route_endpoint_same_shape_twice() {
    let upstream = MockServer::start_async().await;
    mock_geocoder(&upstream).await;
    upstream
        .mock_async(|when, then| {
            when.method(POST).path(ROUTES_PATH);
            then.status(200).json_body(json!({
                "routes": [{ "distanceMeters": 800, "duration": "125s" }]
            }));
        })
        .await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));
    let body = json!({ "origin": "Tokyo", "destination": "Osaka" });

    let first: Value = server.post("/api/route").json(&body).await.json();
    let second: Value = server.post("/api/route").json(&body).await.json();

    let keys = |v: &Value| -> Vec<String> {
        let mut keys: Vec<String> = v.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    };
    assert_eq!(keys(&first), keys(&second));
    assert_eq!(
        keys(&first),
        vec![
            "destination_coords",
            "distance",
            "duration",
            "origin_coords",
            "polyline"
        ]
    );
    assert_eq!(first["distance"], "800 m");
    assert_eq!(first["duration"], "2分");
    assert_eq!(first["polyline"], "");
}

#[tokio::test]
async fn test_route_endpoint_missing_key() {
    let upstream = MockServer::start_async().await;
    let geocoder = upstream
        .mock_async(|when, then| {
            when.method(GET).path(GEOCODE_PATH);
            then.status(200).json_body(geocode_ok("x", 0.0, 0.0));
        })
        .await;
    let server = create_test_server(test_config(&upstream, None));

    let response = server
        .post("/api/route")
        .json(&json!({ "origin": "Tokyo", "destination": "Osaka" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    geocoder.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_route_endpoint_unresolvable_origin() {
    let upstream = MockServer::start_async().await;
    mock_geocoder(&upstream).await;
    upstream
        .mock_async(|when, then| {
            when.method(GET)
                .path(GEOCODE_PATH)
                .query_param("address", "Atlantis");
            then.status(200)
                .json_body(json!({ "status": "ZERO_RESULTS", "results": [] }));
        })
        .await;
    let routes = upstream
        .mock_async(|when, then| {
            when.method(POST).path(ROUTES_PATH);
            then.status(200).json_body(json!({ "routes": [] }));
        })
        .await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .post("/api/route")
        .json(&json!({ "origin": "Atlantis", "destination": "Osaka" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert_eq!(json["detail"], "Geocoding failed: ZERO_RESULTS - Unknown error");
    routes.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_route_endpoint_no_routes() {
    let upstream = MockServer::start_async().await;
    mock_geocoder(&upstream).await;
    upstream
        .mock_async(|when, then| {
            when.method(POST).path(ROUTES_PATH);
            then.status(200).json_body(json!({}));
        })
        .await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .post("/api/route")
        .json(&json!({ "origin": "Tokyo", "destination": "Osaka" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json: Value = response.json();
    assert_eq!(
        json["detail"],
        "No route found between the specified locations"
    );
}

#[tokio::test]
async fn test_route_endpoint_routes_upstream_error() {
    let upstream = MockServer::start_async().await;
    mock_geocoder(&upstream).await;
    upstream
        .mock_async(|when, then| {
            when.method(POST).path(ROUTES_PATH);
            then.status(403)
                .body(r#"{"error":{"code":403,"status":"PERMISSION_DENIED"}}"#);
        })
        .await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .post("/api/route")
        .json(&json!({ "origin": "Tokyo", "destination": "Osaka" }))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    let json: Value = response.json();
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .starts_with("Routes API error:"));
}

#[tokio::test]
async fn test_route_endpoint_malformed_body() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .post("/api/route")
        .json(&json!({ "origin": "Tokyo" }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = response.json();
    assert!(json["detail"].as_str().unwrap().contains("destination"));
}

#[tokio::test]
async fn test_route_endpoint_invalid_json_syntax() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .post("/api/route")
        .text(r#"{"origin": "Tokyo","#)
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = response.json();
    assert!(!json["detail"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_route_endpoint_missing_content_type() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .post("/api/route")
        .text(r#"{"origin": "Tokyo", "destination": "Osaka"}"#)
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let json: Value = response.json();
    assert!(json["detail"].as_str().is_some());
}

#[tokio::test]
async fn test_route_endpoint_unresolvable_destination() {
    let upstream = MockServer::start_async().await;
    mock_geocoder(&upstream).await;
    upstream
        .mock_async(|when, then| {
            when.method(GET)
                .path(GEOCODE_PATH)
                .query_param("address", "Atlantis");
            then.status(200)
                .json_body(json!({ "status": "ZERO_RESULTS", "results": [] }));
        })
        .await;
    let routes = upstream
        .mock_async(|when, then| {
            when.method(POST).path(ROUTES_PATH);
            then.status(200).json_body(json!({ "routes": [] }));
        })
        .await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .post("/api/route")
        .json(&json!({ "origin": "Tokyo", "destination": "Atlantis" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json: Value = response.json();
    assert!(json["detail"].as_str().unwrap().contains("ZERO_RESULTS"));
    routes.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_route_endpoint_geocoder_upstream_status_propagated() {
    let upstream = MockServer::start_async().await;
    mock_geocoder(&upstream).await;
    upstream
        .mock_async(|when, then| {
            when.method(GET)
                .path(GEOCODE_PATH)
                .query_param("address", "Kyoto");
            then.status(503).body("down");
        })
        .await;
    let routes = upstream
        .mock_async(|when, then| {
            when.method(POST).path(ROUTES_PATH);
            then.status(200).json_body(json!({ "routes": [] }));
        })
        .await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .post("/api/route")
        .json(&json!({ "origin": "Tokyo", "destination": "Kyoto" }))
        .await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let json: Value = response.json();
    assert_eq!(json["detail"], "Geocoding API error: down");
    routes.assert_calls_async(0).await;
}

#[tokio::test]
async fn test_geocode_endpoint_upstream_timeout() {
    let upstream = MockServer::start_async().await;
    upstream
        .mock_async(|when, then| {
            when.method(GET).path(GEOCODE_PATH);
            then.status(200)
                .delay(Duration::from_millis(500))
                .json_body(geocode_ok("slow", 35.0, 139.0));
        })
        .await;
    let mut config = test_config(&upstream, Some("test-key"));
    config.timeout = Duration::from_millis(50);
    let server = create_test_server(config);

    let response = server.get("/api/geocode?address=Tokyo").await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    let json: Value = response.json();
    assert!(json["detail"].as_str().is_some());
}

#[tokio::test]
async fn test_route_endpoint_upstream_unreachable() {
    let upstream = MockServer::start_async().await;
    let mut config = test_config(&upstream, Some("test-key"));
    // Nothing listens on port 1.
    config.geocoding_url = "http://127.0.0.1:1/maps/api/geocode/json".to_string();
    let server = create_test_server(config);

    let response = server
        .post("/api/route")
        .json(&json!({ "origin": "Tokyo", "destination": "Osaka" }))
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let json: Value = response.json();
    assert!(json["detail"]
        .as_str()
        .unwrap()
        .starts_with("Upstream request failed"));
}

#[tokio::test]
async fn test_cors_preflight_allows_frontend_origin() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .method(Method::OPTIONS, "/api/route")
        .add_header(header::ORIGIN, HeaderValue::from_static(FRONTEND))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .add_header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            HeaderValue::from_static("content-type"),
        )
        .await;

    let headers = response.headers();
    assert_eq!(
        headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        FRONTEND
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .unwrap(),
        "true"
    );
}

#[tokio::test]
async fn test_cors_rejects_other_origin() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, Some("test-key")));

    let response = server
        .get("/")
        .add_header(
            header::ORIGIN,
            HeaderValue::from_static("https://evil.example.com"),
        )
        .await;

    response.assert_status_ok();
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn test_openapi_document() {
    let upstream = MockServer::start_async().await;
    let server = create_test_server(test_config(&upstream, None));

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let json: Value = response.json();
    assert!(json["paths"]["/api/route"]["post"].is_object());
    assert!(json["paths"]["/api/geocode"]["get"].is_object());
}
