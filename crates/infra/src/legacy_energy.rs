//! Reader for the legacy fixed-width energy consumption file.
//!
//! One record per line, ASCII, 0-based byte columns:
//!
//! | columns  | field                              |
//! |----------|------------------------------------|
//! | `0..10`  | customer id                        |
//! | `10..16` | billing period `YYYYMM`            |
//! | `16..23` | consumption in kWh, zero padded    |
//! | `23..35` | amount due in cents, zero padded   |
//! | `35..43` | reading date `YYYYMMDD`            |
//! | `43..45` | stratum code (optional)            |

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, info, warn};

use debtview_core::{BillingPeriod, CustomerId, EnergyQuantity, Money};
use debtview_energy::EnergyConsumptionRecord;

const CUSTOMER: Range<usize> = 0..10;
const PERIOD: Range<usize> = 10..16;
const KWH: Range<usize> = 16..23;
const AMOUNT_CENTS: Range<usize> = 23..35;
const READING_DATE: Range<usize> = 35..43;
const STRATUM: Range<usize> = 43..45;

/// Shortest accepted line (everything up to the reading date).
pub const MIN_LINE_LEN: usize = READING_DATE.end;

#[derive(Debug, Error)]
pub enum LegacyFileError {
    #[error("cannot read energy file {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line has {len} characters, at least {min} required", min = MIN_LINE_LEN)]
    TooShort { len: usize },

    #[error("line contains non-ASCII characters")]
    NotAscii,

    #[error("invalid {field}: {reason}")]
    Field { field: &'static str, reason: String },
}

impl LegacyFileError {
    fn field(field: &'static str, reason: impl ToString) -> Self {
        Self::Field {
            field,
            reason: reason.to_string(),
        }
    }
}

/// A skipped line and why it was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedLine {
    /// 1-based.
    pub line: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct LegacyLoadReport {
    pub records: Vec<EnergyConsumptionRecord>,
    pub rejected: Vec<RejectedLine>,
    /// Physical lines read, blanks included.
    pub lines: usize,
}

/// Parse one record line. A trailing `\r` is ignored.
pub fn parse_line(line: &str) -> Result<EnergyConsumptionRecord, LegacyFileError> {
    let line = line.trim_end_matches('\r');
    if !line.is_ascii() {
        return Err(LegacyFileError::NotAscii);
    }
    if line.len() < MIN_LINE_LEN {
        return Err(LegacyFileError::TooShort { len: line.len() });
    }

    let customer_id =
        CustomerId::new(&line[CUSTOMER]).map_err(|e| LegacyFileError::field("customer id", e))?;
    let period =
        BillingPeriod::new(&line[PERIOD]).map_err(|e| LegacyFileError::field("period", e))?;
    let kwh = digits(&line[KWH], "consumption")?;
    let consumption =
        EnergyQuantity::new(kwh).map_err(|e| LegacyFileError::field("consumption", e))?;
    let amount_due = Money::from_cents(digits(&line[AMOUNT_CENTS], "amount")?);
    let reading_date = NaiveDate::parse_from_str(line[READING_DATE].trim(), "%Y%m%d")
        .map_err(|e| LegacyFileError::field("reading date", e))?;
    let stratum = line
        .get(STRATUM.start..line.len().min(STRATUM.end))
        .map(|s| s.trim().to_string());

    Ok(EnergyConsumptionRecord::new(
        customer_id,
        period,
        consumption,
        amount_due,
        reading_date,
        stratum,
    ))
}

/// Numeric columns may be zero- or space-padded.
fn digits(raw: &str, field: &'static str) -> Result<i64, LegacyFileError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LegacyFileError::field(field, format!("expected digits, got {raw:?}")));
    }
    raw.parse::<i64>().map_err(|e| LegacyFileError::field(field, e))
}

/// Parse a whole file body. Invalid lines are reported, not fatal.
pub fn parse_str(content: &str) -> LegacyLoadReport {
    let mut report = LegacyLoadReport::default();

    for (index, line) in content.lines().enumerate() {
        let number = index + 1;
        report.lines = number;

        if line.trim().is_empty() {
            debug!(line = number, "blank line skipped");
            continue;
        }

        match parse_line(line) {
            Ok(record) => report.records.push(record),
            Err(e) => {
                warn!(line = number, error = %e, "energy record rejected");
                report.rejected.push(RejectedLine {
                    line: number,
                    reason: e.to_string(),
                });
            }
        }
    }

    report
}

/// Read and parse the file at `path`. A missing or unreadable file is an error.
pub fn load_file(path: impl AsRef<Path>) -> Result<LegacyLoadReport, LegacyFileError> {
    let path = path.as_ref();
    info!(path = %path.display(), "reading legacy energy file");

    let content = fs::read_to_string(path).map_err(|source| LegacyFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let report = parse_str(&content);

    info!(
        lines = report.lines,
        records = report.records.len(),
        rejected = report.rejected.len(),
        "legacy energy file loaded"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const VALID: &str = "000123456720250100004200000001800002025012803";

    #[test]
    fn parses_a_full_line() {
        let record = parse_line(VALID).unwrap();
        assert_eq!(record.customer_id().as_str(), "0001234567");
        assert_eq!(record.period().as_str(), "202501");
        assert_eq!(record.consumption().kilowatt_hours(), 420);
        assert_eq!(record.amount_due(), Money::from_units(1_800));
        assert_eq!(
            record.reading_date(),
            NaiveDate::from_ymd_opt(2025, 1, 28).unwrap()
        );
        assert_eq!(record.stratum(), Some("03"));
    }

    #[test]
    fn stratum_is_optional() {
        let record = parse_line(&VALID[..MIN_LINE_LEN]).unwrap();
        assert_eq!(record.stratum(), None);

        let padded = format!("{}  \r", &VALID[..MIN_LINE_LEN]);
        assert_eq!(parse_line(&padded).unwrap().stratum(), None);
    }

    #[test]
    fn space_padded_numbers_are_accepted() {
        let mut line = VALID.to_string();
        line.replace_range(KWH, "    420");
        line.replace_range(AMOUNT_CENTS, "      180000");
        let record = parse_line(&line).unwrap();
        assert_eq!(record.consumption().kilowatt_hours(), 420);
        assert_eq!(record.amount_due(), Money::from_units(1_800));

        let mut blank = VALID.to_string();
        blank.replace_range(KWH, "       ");
        assert!(matches!(
            parse_line(&blank),
            Err(LegacyFileError::Field { field: "consumption", .. })
        ));
    }

    #[test]
    fn short_lines_are_rejected() {
        let err = parse_line(&VALID[..42]).unwrap_err();
        assert!(matches!(err, LegacyFileError::TooShort { len: 42 }));
    }

    #[test]
    fn field_errors_name_the_field() {
        let bad_period = VALID.replacen("202501", "202513", 1);
        assert!(matches!(
            parse_line(&bad_period),
            Err(LegacyFileError::Field { field: "period", .. })
        ));

        let mut bad_kwh = VALID.to_string();
        bad_kwh.replace_range(KWH, "00 0420");
        assert!(matches!(
            parse_line(&bad_kwh),
            Err(LegacyFileError::Field { field: "consumption", .. })
        ));

        let mut bad_date = VALID.to_string();
        bad_date.replace_range(READING_DATE, "20250230");
        assert!(matches!(
            parse_line(&bad_date),
            Err(LegacyFileError::Field { field: "reading date", .. })
        ));

        let mut bad_customer = VALID.to_string();
        bad_customer.replace_range(CUSTOMER, "00012345AB");
        assert!(matches!(
            parse_line(&bad_customer),
            Err(LegacyFileError::Field { field: "customer id", .. })
        ));
    }

    #[test]
    fn non_ascii_is_rejected() {
        let line = format!("ñ{}", &VALID[2..]);
        assert!(matches!(parse_line(&line), Err(LegacyFileError::NotAscii)));
    }

    #[test]
    fn bad_lines_are_reported_and_skipped() {
        let content = format!("{VALID}\n\n   \nshort line\n{VALID}\n");
        let report = parse_str(&content);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.lines, 5);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].line, 4);
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{VALID}").unwrap();
        writeln!(file, "000987654320250200006500000002100002025022602").unwrap();

        let report = load_file(file.path()).unwrap();
        assert_eq!(report.records.len(), 2);
        assert!(report.rejected.is_empty());
        assert!(report.records[1].is_high_consumption());
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, LegacyFileError::Io { .. }));
    }
}
