use crate::core::encoder;
use crate::domain::model::{EarthquakeFeature, MarkerDescriptor};
use chrono::{Local, TimeZone};
use std::fmt::Display;

const DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S GMT%z";

/// Builds the marker for one feature, rendering the timestamp in local time.
pub fn to_marker(feature: &EarthquakeFeature) -> MarkerDescriptor {
    to_marker_in(feature, &Local)
}

pub fn to_marker_in<Tz>(feature: &EarthquakeFeature, tz: &Tz) -> MarkerDescriptor
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    MarkerDescriptor {
        latitude: feature.latitude,
        longitude: feature.longitude,
        radius: encoder::radius(feature.magnitude),
        fill_color: encoder::color(feature.magnitude),
        popup_html: popup_html(feature, tz),
    }
}

/// 依原始順序轉換整批資料
pub fn to_markers(features: &[EarthquakeFeature]) -> Vec<MarkerDescriptor> {
    features.iter().map(to_marker).collect()
}

fn popup_html<Tz>(feature: &EarthquakeFeature, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    format!(
        "<h3>Location: {}</h3><h6>Magnitude: {}</h6><hr><p>{}</p>",
        escape_html(&feature.place),
        feature.magnitude,
        format_timestamp(feature.time_epoch_millis, tz)
    )
}

/// Browser-style date string; out-of-range timestamps read `Invalid Date`.
pub fn format_timestamp<Tz>(epoch_millis: i64, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    match tz.timestamp_millis_opt(epoch_millis).single() {
        Some(datetime) => datetime.format(DATE_FORMAT).to_string(),
        None => "Invalid Date".to_string(),
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
