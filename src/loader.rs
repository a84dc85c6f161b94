use crate::error::{DashboardError, Result};
use crate::quality::flag_records;
use crate::types::{ForecastRecord, Month, MonthlyRecord, RawForecastRow, RawMonthlyRow, StressLevel};
use crate::util::{parse_count_safe, parse_f64_safe, parse_text};
use csv::{Reader, ReaderBuilder};
use std::fs::File;
use std::path::Path;
use tracing::{debug, info, warn};

pub const MONTHLY_COLUMNS: [&str; 8] = [
    "state",
    "district",
    "month",
    "update_total",
    "service_stress_score",
    "stress_level",
    "maturity_category",
    "confidence_score",
];

pub const FORECAST_COLUMNS: [&str; 4] = ["state", "district", "forecast_month", "predicted_update_total"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub flagged_rows: usize,
}

fn open_checked(path: &Path, required: &[&str]) -> Result<Reader<File>> {
    let mut rdr = ReaderBuilder::new().flexible(true).trim(csv::Trim::Headers).from_path(path)?;
    let headers = rdr.headers()?;
    let missing: Vec<String> = required
        .iter()
        .filter(|col| !headers.iter().any(|h| h == **col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::MissingColumns {
            path: path.to_path_buf(),
            columns: missing,
        });
    }
    Ok(rdr)
}

fn clean_monthly(row: RawMonthlyRow) -> Option<MonthlyRecord> {
    let state = parse_text(row.state)?;
    let district = parse_text(row.district)?;
    let month = Month::parse(row.month.as_deref()?)?;
    let update_total = parse_count_safe(row.update_total.as_deref())?;
    let service_stress_score = parse_f64_safe(row.service_stress_score.as_deref())?;
    let stress_level: StressLevel = row.stress_level.as_deref()?.parse().ok()?;
    let maturity_category = parse_text(row.maturity_category).unwrap_or_else(|| "Unclassified".to_string());
    let confidence_score = parse_f64_safe(row.confidence_score.as_deref())?;
    if !(0.0..=1.0).contains(&confidence_score) {
        return None;
    }
    Some(MonthlyRecord {
        state,
        district,
        month,
        update_total,
        service_stress_score,
        stress_level,
        maturity_category,
        confidence_score,
        data_quality_flag: false,
    })
}

fn clean_forecast(row: RawForecastRow) -> Option<ForecastRecord> {
    let predicted_update_total = parse_f64_safe(row.predicted_update_total.as_deref())?;
    Some(ForecastRecord {
        state: parse_text(row.state)?,
        district: parse_text(row.district)?,
        forecast_month: Month::parse(row.forecast_month.as_deref()?)?,
        predicted_update_total,
    })
}

/// Load the monthly intelligence table and compute the quality flag.
///
/// A file without the required columns is rejected outright. Individual rows
/// that fail to parse are skipped and counted in the report.
pub fn load_monthly(path: &Path) -> Result<(Vec<MonthlyRecord>, LoadReport)> {
    let mut rdr = open_checked(path, &MONTHLY_COLUMNS)?;
    let mut report = LoadReport::default();
    let mut records: Vec<MonthlyRecord> = Vec::new();

    for (idx, result) in rdr.deserialize::<RawMonthlyRow>().enumerate() {
        report.total_rows += 1;
        let cleaned = match result {
            Ok(row) => clean_monthly(row),
            Err(e) => {
                debug!("row {}: {}", idx + 1, e);
                None
            }
        };
        match cleaned {
            Some(r) => records.push(r),
            None => report.parse_errors += 1,
        }
    }

    report.flagged_rows = flag_records(&mut records);
    report.loaded_rows = records.len();
    if report.loaded_rows == 0 && report.total_rows > 0 {
        warn!("{}: every one of {} rows was rejected; check the month and number formats", path.display(), report.total_rows);
    } else if report.parse_errors > 0 {
        warn!("{}: skipped {} unparseable rows", path.display(), report.parse_errors);
    }
    info!(
        "{}: loaded {} of {} rows ({} flagged)",
        path.display(),
        report.loaded_rows,
        report.total_rows,
        report.flagged_rows
    );
    Ok((records, report))
}

pub fn load_forecast(path: &Path) -> Result<(Vec<ForecastRecord>, LoadReport)> {
    let mut rdr = open_checked(path, &FORECAST_COLUMNS)?;
    let mut report = LoadReport::default();
    let mut records: Vec<ForecastRecord> = Vec::new();

    for (idx, result) in rdr.deserialize::<RawForecastRow>().enumerate() {
        report.total_rows += 1;
        let cleaned = match result {
            Ok(row) => clean_forecast(row),
            Err(e) => {
                debug!("row {}: {}", idx + 1, e);
                None
            }
        };
        match cleaned {
            Some(r) => records.push(r),
            None => report.parse_errors += 1,
        }
    }

    report.loaded_rows = records.len();
    if report.parse_errors > 0 {
        warn!("{}: skipped {} unparseable rows", path.display(), report.parse_errors);
    }
    info!("{}: loaded {} forecast rows", path.display(), report.loaded_rows);
    Ok((records, report))
}
