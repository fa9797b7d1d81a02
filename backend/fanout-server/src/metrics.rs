use crate::error::{Result, ServerError};

use log::info;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the global Prometheus recorder.
///
/// Everything `fanout_ws::Metrics` records from here on shows up on `/metrics`.
pub fn install_recorder() -> Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| ServerError::metrics(format!("Failed to install metrics recorder: {e}")))?;

    info!("Prometheus metrics recorder installed");
    Ok(handle)
}
