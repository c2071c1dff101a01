pub mod encoder;
pub mod engine;
pub mod feed;
pub mod map;
pub mod pipeline;
pub mod transform;

pub use crate::domain::model::{FeedBatch, MarkerDescriptor};
pub use crate::domain::ports::{ConfigProvider, MapDisplay, Pipeline, Storage};
pub use crate::utils::error::Result;
