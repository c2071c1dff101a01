use crate::core::feed::{DEFAULT_TIMEOUT_SECONDS, USGS_ALL_DAY_URL};
use crate::core::ConfigProvider;
use crate::domain::model::{LatLng, MapView, TileStyles};
use crate::utils::error::{QuakeMapError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub map: MapConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_feed_url")]
    pub url: String,
    pub timeout_seconds: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_feed_url(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MapConfig {
    #[serde(default)]
    pub access_token: String,
    /// `[latitude, longitude]`
    pub center: Option<[f64; 2]>,
    pub zoom: Option<u8>,
    pub styles: Option<TileStyles>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_format: Option<String>,
}

fn default_feed_url() -> String {
    USGS_ALL_DAY_URL.to_string()
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| QuakeMapError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAPBOX_ACCESS_TOKEN})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| QuakeMapError::ConfigError {
            message: format!("invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
            .map(|f| f.eq_ignore_ascii_case("json"))
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn feed_url(&self) -> &str {
        &self.feed.url
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[String] {
        &self.output.formats
    }

    fn timeout_seconds(&self) -> u64 {
        self.feed.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }

    fn access_token(&self) -> &str {
        &self.map.access_token
    }

    fn map_view(&self) -> MapView {
        let default = MapView::default();
        MapView {
            center: self
                .map
                .center
                .map(|[lat, lng]| LatLng::new(lat, lng))
                .unwrap_or(default.center),
            zoom: self.map.zoom.unwrap_or(default.zoom),
        }
    }

    fn tile_styles(&self) -> TileStyles {
        self.map.styles.clone().unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(format) = self
            .monitoring
            .as_ref()
            .and_then(|m| m.log_format.as_deref())
        {
            if !["json", "compact"].contains(&format) {
                return Err(QuakeMapError::InvalidConfigValueError {
                    field: "monitoring.log_format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: json, compact".to_string(),
                });
            }
        }
        crate::config::validate_provider(self)
    }
}
