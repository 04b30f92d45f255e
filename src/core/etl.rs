use crate::core::{Pipeline, RunSummary};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct ExtractionEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ExtractionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Starting CPM extraction...");
        self.monitor.log_stats("Start");

        // Extract
        let capture = self.pipeline.extract().await?;
        tracing::info!("📥 Read capture ({} bytes)", capture.len());
        self.monitor.log_stats("Extract");

        // Transform
        let extraction = self.pipeline.transform(capture).await?;
        let record_count = extraction.records.len();
        let row_count = extraction.grid.row_count();
        tracing::info!(
            "🔄 Recognized {} sample records, {} plate rows",
            record_count,
            row_count
        );
        self.monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(extraction).await?;
        tracing::info!("💾 Output saved to: {}", output_path);
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats();

        Ok(RunSummary {
            output_path,
            record_count,
            row_count,
        })
    }
}
