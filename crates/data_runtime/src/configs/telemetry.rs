//! Telemetry configuration (log level/format, optional Prometheus
//! exporter address).

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelemetryCfg {
    pub log_level: Option<String>,
    pub json_logs: Option<bool>,
    pub metrics_addr: Option<String>,
}

impl TelemetryCfg {
    pub fn load_default() -> Result<Self> {
        let path = crate::data_root().join("config/telemetry.toml");
        if path.is_file() {
            let txt = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            let c: Self = toml::from_str(&txt).context("parse telemetry TOML")?;
            Ok(c)
        } else {
            Ok(Self::default())
        }
    }
}
