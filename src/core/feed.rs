//! Earthquake feed client.
//!
//! One GET per fetch, bounded by a timeout. Records that fail to decode are
//! logged and skipped; a body that is not a feature collection fails the
//! whole fetch.

use crate::core::ConfigProvider;
use crate::domain::model::{EarthquakeFeature, FeedBatch, LatLng};
use crate::utils::error::{QuakeMapError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tokio::task::{AbortHandle, JoinHandle};

pub const USGS_ALL_DAY_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_day.geojson";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Popup label for records the feed publishes without a place.
pub const UNKNOWN_PLACE: &str = "Unknown location";

#[derive(Debug, Deserialize)]
struct FeedDocument {
    metadata: Option<FeedMetadata>,
    features: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct FeedMetadata {
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    properties: RawProperties,
    geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    place: Option<String>,
    mag: Option<f64>,
    time: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    coordinates: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    url: String,
    timeout: Duration,
}

impl FeedClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(
            config.feed_url(),
            Duration::from_secs(config.timeout_seconds()),
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn fetch(&self) -> Result<FeedBatch> {
        tracing::debug!("Making feed request to: {}", self.url);

        let body = match tokio::time::timeout(self.timeout, self.fetch_body()).await {
            Ok(body) => body?,
            Err(_) => {
                return Err(QuakeMapError::unavailable(
                    &self.url,
                    format!("no response within {:?}", self.timeout),
                ))
            }
        };

        tracing::debug!("Feed body received ({} bytes)", body.len());
        decode_feed(&body)
    }

    /// Runs [`FeedClient::fetch`] on its own task so the caller can abort it.
    pub fn spawn_fetch(&self) -> FeedRequest {
        let client = self.clone();
        let handle = tokio::spawn(async move { client.fetch().await });
        FeedRequest {
            url: self.url.clone(),
            handle,
        }
    }

    async fn fetch_body(&self) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| QuakeMapError::unavailable(&self.url, e.to_string()))?;

        let status = response.status();
        tracing::debug!("Feed response status: {}", status);
        if !status.is_success() {
            return Err(QuakeMapError::unavailable(
                &self.url,
                format!("HTTP {}", status),
            ));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| QuakeMapError::unavailable(&self.url, e.to_string()))?;
        Ok(bytes.to_vec())
    }
}

/// In-flight fetch. Dropping it aborts the request.
pub struct FeedRequest {
    url: String,
    handle: JoinHandle<Result<FeedBatch>>,
}

impl FeedRequest {
    pub fn abort_handle(&self) -> AbortHandle {
        self.handle.abort_handle()
    }

    pub async fn wait(mut self) -> Result<FeedBatch> {
        match (&mut self.handle).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => {
                Err(QuakeMapError::unavailable(&self.url, "request aborted"))
            }
            Err(e) => Err(QuakeMapError::unavailable(
                &self.url,
                format!("fetch task failed: {}", e),
            )),
        }
    }
}

impl Drop for FeedRequest {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub fn decode_feed(body: &[u8]) -> Result<FeedBatch> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(QuakeMapError::malformed("empty response body"));
    }

    let document: FeedDocument =
        serde_json::from_slice(body).map_err(|e| QuakeMapError::malformed(e.to_string()))?;

    let title = document.metadata.and_then(|m| m.title);
    let mut features = Vec::with_capacity(document.features.len());
    let mut skipped = 0;

    for (index, value) in document.features.into_iter().enumerate() {
        match decode_feature(index, value) {
            Ok(feature) => features.push(feature),
            Err(e) => {
                tracing::warn!("⚠️ Skipping record: {}", e);
                skipped += 1;
            }
        }
    }

    Ok(FeedBatch {
        title,
        features,
        skipped,
    })
}

fn decode_feature(index: usize, value: serde_json::Value) -> Result<EarthquakeFeature> {
    let invalid = |reason: String| QuakeMapError::FeatureInvalid { index, reason };

    let raw: RawFeature = serde_json::from_value(value).map_err(|e| invalid(e.to_string()))?;

    // place 只用在彈出視窗，缺少時仍然畫出圓點
    let place = raw
        .properties
        .place
        .unwrap_or_else(|| UNKNOWN_PLACE.to_string());
    let magnitude = raw
        .properties
        .mag
        .ok_or_else(|| invalid("missing magnitude".to_string()))?;
    let time_epoch_millis = raw
        .properties
        .time
        .ok_or_else(|| invalid("missing time".to_string()))?;
    let position = raw
        .geometry
        .as_ref()
        .and_then(|g| LatLng::from_lon_lat(&g.coordinates))
        .ok_or_else(|| invalid("missing [longitude, latitude] coordinates".to_string()))?;

    Ok(EarthquakeFeature {
        place,
        magnitude,
        time_epoch_millis,
        latitude: position.latitude,
        longitude: position.longitude,
    })
}
