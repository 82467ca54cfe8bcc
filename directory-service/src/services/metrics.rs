//! Prometheus recorder and the service's own counters.

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the global Prometheus recorder. Later calls are no-ops.
pub fn init_metrics() -> Result<(), anyhow::Error> {
    if METRICS_HANDLE.get().is_some() {
        return Ok(());
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    let _ = METRICS_HANDLE.set(handle);
    Ok(())
}

/// Current metrics in Prometheus text format.
pub fn render() -> String {
    METRICS_HANDLE
        .get()
        .map(|handle| handle.render())
        .unwrap_or_else(|| "# Metrics recorder not initialized".to_string())
}

pub fn record_token_issued() {
    counter!("tokens_issued_total").increment(1);
}

pub fn record_token_rejected(reason: &'static str) {
    counter!("token_rejections_total", "reason" => reason).increment(1);
}

pub fn record_directory_query(query: &'static str) {
    counter!("directory_queries_total", "query" => query).increment(1);
}
