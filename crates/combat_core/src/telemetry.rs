//! Telemetry bootstrap: tracing subscriber (text or JSON) plus an
//! optional Prometheus exporter for the `sim.*` counters and histograms.
//! Call once at process start; the simulation itself only emits.

use anyhow::{Context, Result};
use data_runtime::configs::telemetry::TelemetryCfg;
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber and, when configured, the
/// Prometheus HTTP exporter. Respects `RUST_LOG` over the config level.
pub fn init(cfg: &TelemetryCfg) -> Result<()> {
    let default_level = cfg.log_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("build log filter")?;
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if cfg.json_logs.unwrap_or(false) {
        builder.json().try_init().map_err(|e| anyhow::anyhow!(e))?;
    } else {
        builder.try_init().map_err(|e| anyhow::anyhow!(e))?;
    }

    if let Some(addr) = cfg.metrics_addr.as_deref() {
        let sock: std::net::SocketAddr = addr
            .parse()
            .with_context(|| format!("parse metrics addr {addr:?}"))?;
        metrics_exporter_prometheus::PrometheusBuilder::new()
            .with_http_listener(sock)
            .install()
            .context("install prometheus exporter")?;
        tracing::info!(target: "telemetry", %sock, "prometheus exporter listening");
    }
    Ok(())
}
