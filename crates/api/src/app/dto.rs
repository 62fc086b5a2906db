use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use debtview_billing::OverdueMarkingReport;
use debtview_consolidation::{DebtConsolidation, DebtStatistics};
use debtview_core::{ConsumptionLevel, Money};
use debtview_energy::EnergyConsumptionRecord;
use debtview_invoicing::{Invoice, InvoiceStatus};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateAmountRequest {
    /// Decimal string, e.g. `"123.45"`.
    pub amount: String,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct InvoiceDto {
    pub id: u64,
    pub customer_id: String,
    pub period: String,
    pub consumption_m3: u32,
    pub consumption_level: ConsumptionLevel,
    pub amount_due: Money,
    pub status: InvoiceStatus,
    pub due_date: Option<NaiveDate>,
    pub overdue: bool,
    pub days_until_due: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

#[derive(Debug, Serialize)]
pub struct EnergyRecordDto {
    pub customer_id: String,
    pub period: String,
    pub consumption_kwh: u32,
    pub consumption_level: ConsumptionLevel,
    pub amount_due: Money,
    pub reading_date: NaiveDate,
    pub stratum: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StatisticsDto {
    pub total_invoices: usize,
    pub overdue_count: usize,
    pub pending_count: usize,
    pub average_water_consumption: f64,
    pub water_debt: Money,
    pub total_energy_records: usize,
    pub average_energy_consumption: f64,
    pub energy_debt: Money,
    pub significant_debt: bool,
    pub elevated_water_consumption: bool,
    pub elevated_energy_consumption: bool,
    pub overdue_ratio_percent: f64,
}

#[derive(Debug, Serialize)]
pub struct DebtDto {
    pub customer_id: String,
    pub computed_at: DateTime<Utc>,
    pub water_debt: Money,
    pub energy_debt: Money,
    pub grand_total: Money,
    pub alerts: Vec<String>,
    pub statistics: StatisticsDto,
    pub invoices: Vec<InvoiceDto>,
    pub energy_records: Vec<EnergyRecordDto>,
}

#[derive(Debug, Serialize)]
pub struct OverdueMarkingDto {
    pub pages: usize,
    pub scanned: usize,
    pub marked: usize,
    pub conflicts: usize,
}

#[derive(Debug, Serialize)]
pub struct Items<T> {
    pub items: Vec<T>,
}

// -------------------------
// Mapping helpers
// -------------------------

/// `today` drives the derived `overdue` and `days_until_due` fields.
pub fn invoice_to_dto(invoice: &Invoice, today: NaiveDate) -> InvoiceDto {
    use debtview_core::AggregateRoot;

    InvoiceDto {
        id: invoice.id_typed().value(),
        customer_id: invoice.customer_id().to_string(),
        period: invoice.period().to_string(),
        consumption_m3: invoice.consumption().cubic_meters(),
        consumption_level: invoice.consumption().level(),
        amount_due: invoice.amount_due(),
        status: invoice.status(),
        due_date: invoice.due_date(),
        overdue: invoice.is_overdue(today),
        days_until_due: invoice.days_until_due(today),
        created_at: invoice.created_at(),
        updated_at: invoice.updated_at(),
        version: invoice.version(),
    }
}

pub fn invoices_to_dto(invoices: &[Invoice], today: NaiveDate) -> Items<InvoiceDto> {
    Items {
        items: invoices.iter().map(|i| invoice_to_dto(i, today)).collect(),
    }
}

pub fn energy_to_dto(record: &EnergyConsumptionRecord) -> EnergyRecordDto {
    EnergyRecordDto {
        customer_id: record.customer_id().to_string(),
        period: record.period().to_string(),
        consumption_kwh: record.consumption().kilowatt_hours(),
        consumption_level: record.consumption().level(),
        amount_due: record.amount_due(),
        reading_date: record.reading_date(),
        stratum: record.stratum().map(str::to_string),
    }
}

pub fn energy_records_to_dto(records: &[EnergyConsumptionRecord]) -> Items<EnergyRecordDto> {
    Items {
        items: records.iter().map(energy_to_dto).collect(),
    }
}

pub fn statistics_to_dto(stats: &DebtStatistics) -> StatisticsDto {
    StatisticsDto {
        total_invoices: stats.total_invoices,
        overdue_count: stats.overdue_count,
        pending_count: stats.pending_count,
        average_water_consumption: stats.average_water_consumption,
        water_debt: stats.water_debt,
        total_energy_records: stats.total_energy_records,
        average_energy_consumption: stats.average_energy_consumption,
        energy_debt: stats.energy_debt,
        significant_debt: stats.has_significant_debt(),
        elevated_water_consumption: stats.has_elevated_water_consumption(),
        elevated_energy_consumption: stats.has_elevated_energy_consumption(),
        overdue_ratio_percent: stats.overdue_ratio_percent(),
    }
}

pub fn debt_to_dto(debt: &DebtConsolidation) -> DebtDto {
    let today = debt.computed_at().date_naive();
    DebtDto {
        customer_id: debt.customer_id().to_string(),
        computed_at: debt.computed_at(),
        water_debt: debt.water_debt(),
        energy_debt: debt.energy_debt(),
        grand_total: debt.grand_total(),
        alerts: debt.alert_messages(),
        statistics: statistics_to_dto(debt.statistics()),
        invoices: debt
            .invoices()
            .iter()
            .map(|i| invoice_to_dto(i, today))
            .collect(),
        energy_records: debt.energy_records().iter().map(energy_to_dto).collect(),
    }
}

pub fn overdue_report_to_dto(report: OverdueMarkingReport) -> OverdueMarkingDto {
    OverdueMarkingDto {
        pages: report.pages,
        scanned: report.scanned,
        marked: report.marked,
        conflicts: report.conflicts,
    }
}
