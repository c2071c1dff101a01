use serde::{Deserialize, Serialize, Serializer};

/// 地理座標，內部一律使用 (緯度, 經度) 順序
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Converts a GeoJSON position (`[longitude, latitude, depth?]`) into
    /// internal latitude/longitude order. Returns `None` when fewer than two
    /// coordinates are present.
    pub fn from_lon_lat(coordinates: &[f64]) -> Option<Self> {
        match coordinates {
            [longitude, latitude, ..] => Some(Self::new(*latitude, *longitude)),
            _ => None,
        }
    }
}

/// One reported earthquake, decoded from a feed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EarthquakeFeature {
    pub place: String,
    pub magnitude: f64,
    pub time_epoch_millis: i64,
    pub latitude: f64,
    pub longitude: f64,
}

/// Magnitude color buckets, ordered from lowest to highest magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorBucket {
    Lightest,
    LightOrange,
    MidOrange,
    Orange,
    DarkOrange,
    Darkest,
}

impl ColorBucket {
    pub const ALL: [ColorBucket; 6] = [
        ColorBucket::Lightest,
        ColorBucket::LightOrange,
        ColorBucket::MidOrange,
        ColorBucket::Orange,
        ColorBucket::DarkOrange,
        ColorBucket::Darkest,
    ];

    pub fn hex(self) -> &'static str {
        match self {
            ColorBucket::Lightest => "#ffcca5",
            ColorBucket::LightOrange => "#ffb37e",
            ColorBucket::MidOrange => "#ff9143",
            ColorBucket::Orange => "#ff6f08",
            ColorBucket::DarkOrange => "#cc5500",
            ColorBucket::Darkest => "#a54500",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorBucket::Lightest => "lightest",
            ColorBucket::LightOrange => "light-orange",
            ColorBucket::MidOrange => "mid-orange",
            ColorBucket::Orange => "orange",
            ColorBucket::DarkOrange => "dark-orange",
            ColorBucket::Darkest => "darkest",
        }
    }

    /// Membership predicate for the bucket's magnitude range. Upper bounds are
    /// inclusive; NaN belongs to `Lightest`.
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn contains(self, magnitude: f64) -> bool {
        match self {
            ColorBucket::Lightest => !(magnitude > 1.0),
            ColorBucket::LightOrange => magnitude > 1.0 && magnitude <= 2.0,
            ColorBucket::MidOrange => magnitude > 2.0 && magnitude <= 3.0,
            ColorBucket::Orange => magnitude > 3.0 && magnitude <= 4.0,
            ColorBucket::DarkOrange => magnitude > 4.0 && magnitude <= 5.0,
            ColorBucket::Darkest => magnitude > 5.0,
        }
    }
}

// 序列化成色碼，給地圖頁面直接使用
impl Serialize for ColorBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.hex())
    }
}

/// Renderable form of one feature.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerDescriptor {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: f64,
    pub fill_color: ColorBucket,
    pub popup_html: String,
}

/// Decoded feed body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedBatch {
    pub title: Option<String>,
    pub features: Vec<EarthquakeFeature>,
    pub skipped: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub url_template: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub label: String,
    pub color: ColorBucket,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MapControl {
    Layers {
        collapsed: bool,
    },
    Legend {
        position: ControlPosition,
        entries: Vec<LegendEntry>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: LatLng::new(37.09, -95.71),
            zoom: 5,
        }
    }
}

/// Mapbox style identifiers for the three base layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileStyles {
    pub satellite: String,
    pub grayscale: String,
    pub outdoors: String,
}

impl Default for TileStyles {
    fn default() -> Self {
        Self {
            satellite: "satellite-v9".to_string(),
            grayscale: "dark-v9".to_string(),
            outdoors: "outdoors-v10".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub output_paths: Vec<String>,
    pub marker_count: usize,
    pub skipped_features: usize,
}
