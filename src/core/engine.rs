use crate::core::Pipeline;
use crate::domain::model::RunSummary;
use crate::utils::error::Result;
use crate::utils::logger::PHASE_SPAN;
use crate::utils::monitor::SystemMonitor;
use tracing::Instrument;

pub struct MapEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> MapEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    /// Fetch, transform and render once. A feed failure returns before
    /// anything is written.
    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("🌍 Starting earthquake map run");

        tracing::info!("📡 Fetching feed...");
        let batch = self
            .pipeline
            .extract()
            .instrument(tracing::info_span!(PHASE_SPAN, phase = "extract"))
            .await?;
        let skipped_features = batch.skipped;
        tracing::info!(
            "Fetched {} features{}",
            batch.features.len(),
            batch
                .title
                .as_deref()
                .map(|t| format!(" from '{}'", t))
                .unwrap_or_default()
        );
        if skipped_features > 0 {
            tracing::warn!("⚠️ Skipped {} invalid records", skipped_features);
        }
        self.monitor.log_stats("Fetch");

        tracing::info!("🎨 Encoding markers...");
        let markers = self
            .pipeline
            .transform(batch)
            .instrument(tracing::info_span!(PHASE_SPAN, phase = "transform"))
            .await?;
        let marker_count = markers.len();
        tracing::info!("Encoded {} markers", marker_count);
        self.monitor.log_stats("Transform");

        tracing::info!("🗺️ Rendering outputs...");
        let output_paths = self
            .pipeline
            .load(markers)
            .instrument(tracing::info_span!(PHASE_SPAN, phase = "load"))
            .await?;
        for path in &output_paths {
            tracing::info!("Output saved to: {}", path);
        }
        self.monitor.log_stats("Render");
        self.monitor.log_final_stats();

        Ok(RunSummary {
            output_paths,
            marker_count,
            skipped_features,
        })
    }
}
