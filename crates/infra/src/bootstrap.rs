//! Builds the in-memory stores from the configured data files.

use anyhow::{Context, Result};
use tracing::{info, warn};

use debtview_billing::{InMemoryEnergyReader, InMemoryInvoiceRepository};

use crate::config::AppConfig;
use crate::{legacy_energy, seed};

#[derive(Debug, Default)]
pub struct Stores {
    pub invoices: InMemoryInvoiceRepository,
    pub energy: InMemoryEnergyReader,
}

pub fn build_stores(config: &AppConfig) -> Result<Stores> {
    let invoices = match &config.invoice_seed {
        Some(path) => {
            let seeded = seed::load_invoices(path)?;
            InMemoryInvoiceRepository::with_invoices(seeded)
                .with_context(|| format!("cannot store invoices from {}", path.display()))?
        }
        None => {
            info!("no invoice seed configured, starting with an empty invoice store");
            InMemoryInvoiceRepository::new()
        }
    };

    let energy = match &config.energy_file {
        Some(path) => {
            let report = legacy_energy::load_file(path)?;
            if !report.rejected.is_empty() {
                warn!(
                    rejected = report.rejected.len(),
                    "some energy records were skipped"
                );
            }
            InMemoryEnergyReader::new(report.records)
        }
        None => {
            info!("no energy file configured, energy data is empty");
            InMemoryEnergyReader::default()
        }
    };

    Ok(Stores { invoices, energy })
}
