use crate::adapters::LeafletPage;
use crate::core::feed::FeedClient;
use crate::core::map::MapSession;
use crate::core::{transform, ConfigProvider, FeedBatch, MarkerDescriptor, Pipeline, Storage};
use crate::utils::error::{QuakeMapError, Result};
use serde::Serialize;

pub const VALID_FORMATS: [&str; 3] = ["html", "json", "csv"];

const PAGE_TITLE: &str = "Earthquake Map";

/// 匯出用的扁平記錄
#[derive(Debug, Serialize)]
struct MarkerRecord<'a> {
    latitude: f64,
    longitude: f64,
    radius: f64,
    bucket: &'static str,
    fill_color: &'static str,
    popup_html: &'a str,
}

impl<'a> From<&'a MarkerDescriptor> for MarkerRecord<'a> {
    fn from(marker: &'a MarkerDescriptor) -> Self {
        Self {
            latitude: marker.latitude,
            longitude: marker.longitude,
            radius: marker.radius,
            bucket: marker.fill_color.name(),
            fill_color: marker.fill_color.hex(),
            popup_html: &marker.popup_html,
        }
    }
}

pub struct QuakePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    feed: FeedClient,
    session: MapSession,
}

impl<S: Storage, C: ConfigProvider> QuakePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let feed = FeedClient::from_config(&config);
        let session = MapSession::from_config(&config);
        Self {
            storage,
            config,
            feed,
            session,
        }
    }

    fn output_location(&self, filename: &str) -> String {
        format!(
            "{}/{}",
            self.config.output_path().trim_end_matches('/'),
            filename
        )
    }

    /// Renders one output format to bytes, paired with its file name.
    fn render(
        &self,
        format: &str,
        markers: &[MarkerDescriptor],
    ) -> Result<(&'static str, Vec<u8>)> {
        match format {
            "html" => Ok(("index.html", self.render_html(markers)?)),
            "json" => Ok(("markers.json", self.render_json(markers)?)),
            "csv" => Ok(("markers.csv", self.render_csv(markers)?)),
            other => Err(QuakeMapError::InvalidConfigValueError {
                field: "output_formats".to_string(),
                value: other.to_string(),
                reason: format!(
                    "Unsupported format. Valid formats: {}",
                    VALID_FORMATS.join(", ")
                ),
            }),
        }
    }

    fn render_html(&self, markers: &[MarkerDescriptor]) -> Result<Vec<u8>> {
        let mut page = LeafletPage::new(PAGE_TITLE);
        self.session.compose(&mut page, markers);
        Ok(page.render()?.into_bytes())
    }

    fn render_json(&self, markers: &[MarkerDescriptor]) -> Result<Vec<u8>> {
        let records: Vec<MarkerRecord> = markers.iter().map(MarkerRecord::from).collect();
        Ok(serde_json::to_vec_pretty(&records)?)
    }

    fn render_csv(&self, markers: &[MarkerDescriptor]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for marker in markers {
            writer.serialize(MarkerRecord::from(marker))?;
        }
        writer
            .into_inner()
            .map_err(|e| QuakeMapError::IoError(e.into_error()))
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for QuakePipeline<S, C> {
    async fn extract(&self) -> Result<FeedBatch> {
        tracing::debug!(
            "Fetching {} (timeout {:?})",
            self.feed.url(),
            self.feed.timeout()
        );
        // FeedRequest 被丟棄時會中止請求
        self.feed.spawn_fetch().wait().await
    }

    async fn transform(&self, batch: FeedBatch) -> Result<Vec<MarkerDescriptor>> {
        Ok(transform::to_markers(&batch.features))
    }

    async fn load(&self, markers: Vec<MarkerDescriptor>) -> Result<Vec<String>> {
        // 全部格式先在記憶體中產生，任何一個失敗都不寫檔
        let rendered = self
            .config
            .output_formats()
            .iter()
            .map(|format| self.render(format, &markers))
            .collect::<Result<Vec<_>>>()?;

        let mut written = Vec::with_capacity(rendered.len());
        for (filename, data) in rendered {
            tracing::debug!("Writing {} ({} bytes)", filename, data.len());
            self.storage.write_file(filename, &data).await?;
            written.push(self.output_location(filename));
        }

        Ok(written)
    }
}
