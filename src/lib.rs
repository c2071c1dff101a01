pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::LeafletPage;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};
pub use crate::core::{
    engine::MapEngine, feed::FeedClient, map::MapSession, pipeline::QuakePipeline,
};
pub use crate::domain::model::{ColorBucket, EarthquakeFeature, MarkerDescriptor, RunSummary};
pub use crate::utils::error::{QuakeMapError, Result};
