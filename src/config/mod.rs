pub mod cli;
pub mod toml_config;

use crate::core::pipeline::VALID_FORMATS;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_access_token, validate_output_formats, validate_path, validate_positive_number,
    validate_range, validate_url,
};

#[cfg(feature = "cli")]
use crate::core::feed::{DEFAULT_TIMEOUT_SECONDS, USGS_ALL_DAY_URL};
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "quake-map")]
#[command(about = "Render the live USGS earthquake feed onto a Leaflet map")]
pub struct CliConfig {
    #[arg(long, default_value = USGS_ALL_DAY_URL)]
    pub feed_url: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "html", help = "Output formats: html, json, csv")]
    pub formats: Vec<String>,

    #[arg(long, env = "MAPBOX_ACCESS_TOKEN", default_value = "", hide_env_values = true)]
    pub access_token: String,

    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
    pub timeout_seconds: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn feed_url(&self) -> &str {
        &self.feed_url
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn access_token(&self) -> &str {
        &self.access_token
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

/// 所有設定來源共用的檢查
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    validate_url("feed_url", config.feed_url())?;
    validate_path("output_path", config.output_path())?;
    validate_positive_number("timeout_seconds", config.timeout_seconds(), 1)?;
    validate_output_formats("output_formats", config.output_formats(), &VALID_FORMATS)?;

    // 只有地圖頁面需要圖磚金鑰
    if config.output_formats().iter().any(|f| f == "html") {
        validate_access_token("access_token", config.access_token())?;
    }

    let view = config.map_view();
    validate_range("map.center.latitude", view.center.latitude, -90.0, 90.0)?;
    validate_range("map.center.longitude", view.center.longitude, -180.0, 180.0)?;
    validate_range("map.zoom", view.zoom, 0, 22)?;

    Ok(())
}
