//! Process configuration from `DEBTVIEW_*` environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use debtview_observability::LogFormat;

pub const BIND_ADDR: &str = "DEBTVIEW_BIND_ADDR";
pub const ENERGY_FILE: &str = "DEBTVIEW_ENERGY_FILE";
pub const INVOICE_SEED: &str = "DEBTVIEW_INVOICE_SEED";
pub const OVERDUE_SWEEP_SECS: &str = "DEBTVIEW_OVERDUE_SWEEP_SECS";
pub const LOG_FORMAT: &str = "DEBTVIEW_LOG_FORMAT";

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// Legacy fixed-width energy file; no energy data when unset.
    pub energy_file: Option<PathBuf>,
    /// JSON invoice seed; empty invoice store when unset.
    pub invoice_seed: Option<PathBuf>,
    /// Period of the background overdue sweep; disabled when unset or zero.
    pub overdue_sweep_interval: Option<Duration>,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = var(BIND_ADDR)
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("{BIND_ADDR} must be a socket address like {DEFAULT_BIND_ADDR}"))?;

        let overdue_sweep_interval = match var(OVERDUE_SWEEP_SECS) {
            Some(raw) => {
                let secs = raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("{OVERDUE_SWEEP_SECS} must be a whole number of seconds"))?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let log_format = match var(LOG_FORMAT) {
            Some(raw) => raw
                .parse::<LogFormat>()
                .with_context(|| format!("invalid {LOG_FORMAT}"))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            energy_file: var(ENERGY_FILE).map(PathBuf::from),
            invoice_seed: var(INVOICE_SEED).map(PathBuf::from),
            overdue_sweep_interval,
            log_format,
        })
    }
}
