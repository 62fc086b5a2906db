//! JSON invoice seed: an array of [`InvoiceSnapshot`]s.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use debtview_core::DomainError;
use debtview_invoicing::{Invoice, InvoiceSnapshot};

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("cannot read invoice seed {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invoice seed is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invoice seed entry {index} is invalid: {source}")]
    Invalid {
        index: usize,
        #[source]
        source: DomainError,
    },
}

/// Validate every snapshot. Stored versions are reset so the repository
/// assigns its own.
pub fn parse_invoices(json: &str) -> Result<Vec<Invoice>, SeedError> {
    let snapshots: Vec<InvoiceSnapshot> = serde_json::from_str(json)?;
    snapshots
        .into_iter()
        .enumerate()
        .map(|(index, snapshot)| {
            Invoice::from_snapshot(snapshot)
                .map(|invoice| invoice.with_version(0))
                .map_err(|source| SeedError::Invalid { index, source })
        })
        .collect()
}

pub fn load_invoices(path: impl AsRef<Path>) -> Result<Vec<Invoice>, SeedError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let invoices = parse_invoices(&json)?;
    info!(path = %path.display(), invoices = invoices.len(), "invoice seed loaded");
    Ok(invoices)
}
