use httpmock::prelude::*;
use quake_map::{CliConfig, LocalStorage, MapEngine, QuakeMapError, QuakePipeline};
use tempfile::TempDir;

fn feature(place: &str, mag: f64, lon: f64, lat: f64) -> serde_json::Value {
    serde_json::json!({
        "type": "Feature",
        "properties": {"place": place, "mag": mag, "time": 1_600_000_000_000i64},
        "geometry": {"type": "Point", "coordinates": [lon, lat, 5.0]}
    })
}

fn cli_config(feed_url: String, output_path: &str, formats: &[&str]) -> CliConfig {
    CliConfig {
        feed_url,
        output_path: output_path.to_string(),
        formats: formats.iter().map(|f| f.to_string()).collect(),
        access_token: "pk.integration".to_string(),
        timeout_seconds: 5,
        verbose: false,
        monitor: false,
        log_json: false,
    }
}

#[tokio::test]
async fn test_end_to_end_map_with_real_http() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let feed = serde_json::json!({
        "type": "FeatureCollection",
        "metadata": {"title": "USGS All Earthquakes, Past Day", "count": 3},
        "features": [
            feature("12km NNE of Anza, CA", 0.5, -116.6, 33.6),
            feature("Central Alaska", 3.5, -150.1, 63.2),
            feature("Kermadec Islands region", 6.0, -177.9, -29.5)
        ]
    });

    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/all_day.geojson");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(feed);
    });

    let config = cli_config(
        server.url("/all_day.geojson"),
        &output_path,
        &["html", "json", "csv"],
    );
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = QuakePipeline::new(storage, config);
    let engine = MapEngine::new(pipeline);

    let summary = engine.run().await.unwrap();

    api_mock.assert_hits(1);
    assert_eq!(summary.marker_count, 3);
    assert_eq!(summary.skipped_features, 0);
    assert_eq!(summary.output_paths.len(), 3);

    let json: serde_json::Value = serde_json::from_slice(
        &std::fs::read(temp_dir.path().join("markers.json")).unwrap(),
    )
    .unwrap();
    let buckets: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["bucket"].as_str().unwrap().to_string())
        .collect();
    let radii: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["radius"].as_f64().unwrap())
        .collect();
    assert_eq!(buckets, vec!["lightest", "orange", "darkest"]);
    assert_eq!(radii, vec![12_500.0, 87_500.0, 150_000.0]);

    // 座標由 [lon, lat] 轉為 (lat, lon)
    assert_eq!(json[1]["latitude"], 63.2);
    assert_eq!(json[1]["longitude"], -150.1);

    let html = std::fs::read_to_string(temp_dir.path().join("index.html")).unwrap();
    assert!(html.contains("Central Alaska"));
    assert!(html.contains("satellite-v9"));
    assert!(html.contains("access_token=pk.integration"));

    let csv = std::fs::read_to_string(temp_dir.path().join("markers.csv")).unwrap();
    assert_eq!(csv.lines().count(), 4);
}

#[tokio::test]
async fn test_empty_body_is_reported_as_malformed() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/empty");
        then.status(200).body("");
    });

    let config = cli_config(server.url("/empty"), &output_path, &["html", "json"]);
    let pipeline = QuakePipeline::new(LocalStorage::new(output_path.clone()), config);
    let engine = MapEngine::new(pipeline);

    let result = engine.run().await;

    api_mock.assert();
    assert!(matches!(result, Err(QuakeMapError::FeedMalformed { .. })));
    // 不輸出部分地圖
    assert!(!temp_dir.path().join("index.html").exists());
    assert!(!temp_dir.path().join("markers.json").exists());
}

#[tokio::test]
async fn test_server_error_is_reported_as_unavailable() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/failed");
        then.status(503);
    });

    let config = cli_config(server.url("/failed"), &output_path, &["html"]);
    let pipeline = QuakePipeline::new(LocalStorage::new(output_path.clone()), config);
    let engine = MapEngine::new(pipeline);

    let result = engine.run().await;

    api_mock.assert_hits(1);
    match result {
        Err(QuakeMapError::FeedUnavailable { reason, .. }) => assert!(reason.contains("503")),
        other => panic!("expected FeedUnavailable, got {:?}", other),
    }
    assert!(!temp_dir.path().join("index.html").exists());
}

#[tokio::test]
async fn test_invalid_records_are_skipped_not_fatal() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let feed = serde_json::json!({
        "type": "FeatureCollection",
        "features": [
            feature("good one", 2.5, 10.0, 20.0),
            {"type": "Feature", "properties": {"place": "no magnitude", "mag": null, "time": 1}, "geometry": {"coordinates": [1.0, 2.0]}},
            feature("good two", 4.5, 30.0, 40.0)
        ]
    });
    server.mock(|when, then| {
        when.method(GET).path("/mixed");
        then.status(200).json_body(feed);
    });

    let config = cli_config(server.url("/mixed"), &output_path, &["json"]);
    let pipeline = QuakePipeline::new(LocalStorage::new(output_path.clone()), config);
    let engine = MapEngine::new_with_monitoring(pipeline, true);

    let summary = engine.run().await.unwrap();

    assert_eq!(summary.marker_count, 2);
    assert_eq!(summary.skipped_features, 1);
}

#[tokio::test]
async fn test_feed_without_features_renders_empty_overlay() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/quiet");
        then.status(200)
            .json_body(serde_json::json!({"type": "FeatureCollection", "features": []}));
    });

    let config = cli_config(server.url("/quiet"), &output_path, &["html"]);
    let pipeline = QuakePipeline::new(LocalStorage::new(output_path.clone()), config);
    let summary = MapEngine::new(pipeline).run().await.unwrap();

    assert_eq!(summary.marker_count, 0);
    let html = std::fs::read_to_string(temp_dir.path().join("index.html")).unwrap();
    assert!(html.contains(r#""markers":[]"#));
}
