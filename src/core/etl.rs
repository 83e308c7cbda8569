use crate::core::Pipeline;
use crate::domain::model::CleaningSummary;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

#[derive(Debug, Clone)]
pub struct EtlOutcome {
    pub output_path: String,
    pub summary: CleaningSummary,
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    pub fn run(&self) -> Result<EtlOutcome> {
        let mut monitor = SystemMonitor::new(self.monitor_enabled);
        tracing::info!("Starting cleaning run...");

        // Extract
        let table = self.pipeline.extract()?;
        tracing::info!("📥 Extracted {} rows", table.rows.len());
        monitor.log_stats("Extract");

        // Transform
        let result = self.pipeline.transform(table)?;
        let summary = &result.summary;
        tracing::info!("Total records parsed: {}", summary.total_input);
        // total = removed + valid, filters included
        tracing::info!("Invalid records removed: {}", summary.removed());
        if summary.filtered_by_region + summary.filtered_by_amount > 0 {
            tracing::info!(
                "  {} failed cleaning, {} filtered by region, {} filtered by amount",
                summary.invalid,
                summary.filtered_by_region,
                summary.filtered_by_amount
            );
        }
        tracing::info!("Valid records after cleaning: {}", summary.final_count);
        for (reason, count) in &summary.invalid_by_reason {
            tracing::debug!("  {:>6} × {}", count, reason);
        }
        monitor.log_stats("Transform");

        // Load
        let output_path = self.pipeline.load(&result)?;
        tracing::info!("💾 Output saved to: {}", output_path);
        monitor.log_final_stats(result.summary.total_input);

        Ok(EtlOutcome {
            output_path,
            summary: result.summary,
        })
    }
}
