use crate::domain::model::{
    FeedBatch, LatLng, MapControl, MapView, MarkerDescriptor, TileLayer, TileStyles,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn feed_url(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn timeout_seconds(&self) -> u64;
    fn access_token(&self) -> &str;

    fn map_view(&self) -> MapView {
        MapView::default()
    }

    fn tile_styles(&self) -> TileStyles {
        TileStyles::default()
    }
}

/// The map widget as seen from the overlay composition step.
pub trait MapDisplay {
    fn set_view(&mut self, center: LatLng, zoom: u8);
    fn add_tile_layer(&mut self, layer: &TileLayer, visible: bool);
    /// Adds one marker per descriptor, each with its popup bound.
    fn add_marker_layer(&mut self, name: &str, markers: &[MarkerDescriptor], visible: bool);
    fn register_control(&mut self, control: MapControl);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<FeedBatch>;
    async fn transform(&self, batch: FeedBatch) -> Result<Vec<MarkerDescriptor>>;
    async fn load(&self, markers: Vec<MarkerDescriptor>) -> Result<Vec<String>>;
}
