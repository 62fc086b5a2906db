//! Periodic background run of the overdue-marking batch.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::app::AppServices;

/// Stops the sweep loop when dropped or shut down.
pub struct OverdueSweepHandle {
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl OverdueSweepHandle {
    /// Signal the loop and wait for the in-flight run to finish.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        let _ = (&mut self.join).await;
    }
}

impl Drop for OverdueSweepHandle {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Run the sweep now and then every `interval`. Runs never overlap.
pub fn spawn_overdue_sweep(services: Arc<AppServices>, interval: Duration) -> OverdueSweepHandle {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

    let join = tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "overdue sweep scheduler started");
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    let services = services.clone();
                    let run = tokio::task::spawn_blocking(move || services.invoices.mark_overdue_invoices()).await;
                    match run {
                        Ok(Ok(_report)) => {}
                        Ok(Err(e)) => warn!(error = %e, "scheduled overdue sweep failed"),
                        Err(e) => warn!(error = %e, "scheduled overdue sweep panicked"),
                    }
                }
            }
        }

        info!("overdue sweep scheduler stopped");
    });

    OverdueSweepHandle {
        shutdown: Some(shutdown_tx),
        join,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    use debtview_billing::{FixedClock, InMemoryEnergyReader, InMemoryInvoiceRepository, InvoiceRepository};
    use debtview_core::{BillingPeriod, CustomerId, InvoiceId, Money, WaterQuantity};
    use debtview_invoicing::{Invoice, InvoiceStatus, NewInvoice};

    use super::*;

    #[tokio::test]
    async fn first_tick_marks_past_due_invoices() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 10, 0, 0).unwrap();
        let invoice = Invoice::issue(
            NewInvoice {
                id: InvoiceId::new(1).unwrap(),
                customer_id: CustomerId::new("0001234567").unwrap(),
                period: BillingPeriod::new("202505").unwrap(),
                consumption: WaterQuantity::new(12).unwrap(),
                amount_due: Money::from_units(40_000),
                due_date: Some(now.date_naive() - ChronoDuration::days(3)),
            },
            now,
        )
        .unwrap();
        let repo = Arc::new(InMemoryInvoiceRepository::with_invoices([invoice]).unwrap());
        let services = Arc::new(AppServices::new(
            repo.clone(),
            Arc::new(InMemoryEnergyReader::default()),
            Arc::new(FixedClock::new(now)),
        ));

        let handle = spawn_overdue_sweep(services, Duration::from_secs(3600));
        for _ in 0..100 {
            if repo.flush_count() > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.shutdown().await;

        let stored = repo.find_by_id(InvoiceId::new(1).unwrap()).unwrap().unwrap();
        assert_eq!(stored.status(), InvoiceStatus::Overdue);
    }
}
