use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tabled::Tabled;

/// One line of the monthly intelligence CSV before validation.
#[derive(Debug, Deserialize)]
pub struct RawMonthlyRow {
    pub state: Option<String>,
    pub district: Option<String>,
    pub month: Option<String>,
    pub update_total: Option<String>,
    pub service_stress_score: Option<String>,
    pub stress_level: Option<String>,
    pub maturity_category: Option<String>,
    pub confidence_score: Option<String>,
}

/// One line of the forecast CSV before validation.
#[derive(Debug, Deserialize)]
pub struct RawForecastRow {
    pub state: Option<String>,
    pub district: Option<String>,
    pub forecast_month: Option<String>,
    pub predicted_update_total: Option<String>,
}

/// Calendar month used as the period key of both tables.
///
/// Accepts `YYYY-MM` as written by the upstream pipeline, full `YYYY-MM-DD`
/// dates, and datetime stamps (`YYYY-MM-DD HH:MM:SS`, space or `T`
/// separated); anything finer than the month is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(NaiveDate);

impl Month {
    pub fn new(year: i32, month: u32) -> Option<Month> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Month)
    }

    pub fn parse(s: &str) -> Option<Month> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
            .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
            .ok()
            .and_then(|d| d.with_day(1))
            .map(Month)
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m"))
    }
}

impl Serialize for Month {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Categorical summary of administrative load for a district-month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StressLevel {
    Low,
    Medium,
    High,
}

impl StressLevel {
    pub fn row_style(self) -> RowStyle {
        match self {
            StressLevel::Low => RowStyle::Normal,
            StressLevel::Medium => RowStyle::Caution,
            StressLevel::High => RowStyle::Critical,
        }
    }
}

impl FromStr for StressLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(StressLevel::Low),
            "medium" => Ok(StressLevel::Medium),
            "high" => Ok(StressLevel::High),
            other => Err(format!("unknown stress level '{}'", other)),
        }
    }
}

impl fmt::Display for StressLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            StressLevel::Low => "Low",
            StressLevel::Medium => "Medium",
            StressLevel::High => "High",
        };
        f.write_str(label)
    }
}

/// Display treatment for a ranked row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Normal,
    Caution,
    Critical,
}

impl RowStyle {
    pub fn marker(self) -> &'static str {
        match self {
            RowStyle::Normal => "🟢",
            RowStyle::Caution => "🟠",
            RowStyle::Critical => "🔴",
        }
    }

    /// Render a label with this style's marker in front of it.
    pub fn apply(self, label: &str) -> String {
        format!("{} {}", self.marker(), label)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    pub state: String,
    pub district: String,
    pub month: Month,
    pub update_total: u64,
    pub service_stress_score: f64,
    pub stress_level: StressLevel,
    pub maturity_category: String,
    pub confidence_score: f64,
    pub data_quality_flag: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastRecord {
    pub state: String,
    pub district: String,
    pub forecast_month: Month,
    pub predicted_update_total: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct FlaggedRow {
    #[serde(rename = "state")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "district")]
    #[tabled(rename = "District")]
    pub district: String,
    #[serde(rename = "month")]
    #[tabled(rename = "Month")]
    pub month: String,
    #[serde(rename = "update_total")]
    #[tabled(rename = "UpdateTotal")]
    pub update_total: u64,
    #[serde(rename = "service_stress_score")]
    #[tabled(rename = "ServiceStressScore")]
    pub service_stress_score: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct RiskRow {
    #[serde(rename = "rank")]
    #[tabled(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "state")]
    #[tabled(rename = "State")]
    pub state: String,
    #[serde(rename = "district")]
    #[tabled(rename = "District")]
    pub district: String,
    #[serde(rename = "service_stress_score")]
    #[tabled(rename = "ServiceStressScore")]
    pub service_stress_score: String,
    #[serde(rename = "stress_level")]
    #[tabled(rename = "StressLevel")]
    pub stress_level: String,
}

/// Four headline metrics for the selected district, rendered as cards.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct KpiRow {
    #[tabled(rename = "Stress Level")]
    pub stress_level: String,
    #[tabled(rename = "Maturity Category")]
    pub maturity_category: String,
    #[tabled(rename = "Confidence Score")]
    pub confidence_score: String,
    #[tabled(rename = "Service Stress Score")]
    pub service_stress_score: String,
}

/// One point of a rendered line chart, with a proportional text bar.
#[derive(Debug, Tabled, Clone)]
pub struct SeriesRow {
    #[tabled(rename = "Month")]
    pub month: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Trend")]
    pub bar: String,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePlan {
    pub staff: u64,
    pub devices: u64,
    pub mobile_units: u64,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtraCapacity {
    pub staff: u32,
    pub devices: u32,
    pub mobile_units: u32,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct ScenarioOutcome {
    pub capacity_gain: f64,
    pub remaining_workload: f64,
    pub fully_covered: bool,
}

/// Headline values shown for a selection after optional noise injection.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Kpis {
    pub stress_level: StressLevel,
    pub maturity_category: String,
    pub confidence_score: f64,
    pub service_stress_score: f64,
    pub update_total: f64,
    pub noised: bool,
}

#[derive(Debug, Serialize)]
pub struct DashboardSummary {
    pub state: String,
    pub district: String,
    pub latest_month: Month,
    pub kpis: Kpis,
    pub flagged_records: usize,
    pub predicted_demand: Option<f64>,
    pub recommendation: Option<ResourcePlan>,
    pub scenario: Option<ScenarioOutcome>,
    pub extra_capacity: ExtraCapacity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_parse_formats() {
        let m = Month::parse("2025-03").unwrap();
        assert_eq!(m.to_string(), "2025-03");
        assert_eq!(Month::parse(" 2025-03-17 "), Some(m));
        assert_eq!(Month::parse("2025-03-01 00:00:00"), Some(m));
        assert_eq!(Month::parse("2025-03-31T23:59:59"), Some(m));
        assert_eq!(Month::parse("2025-13"), None);
        assert_eq!(Month::parse("March 2025"), None);
        assert!(Month::parse("2024-12").unwrap() < m);
    }

    #[test]
    fn test_stress_level_parse_and_style() {
        assert_eq!("HIGH".parse::<StressLevel>(), Ok(StressLevel::High));
        assert_eq!(" medium ".parse::<StressLevel>(), Ok(StressLevel::Medium));
        assert!("severe".parse::<StressLevel>().is_err());
        assert_eq!(StressLevel::Low.row_style(), RowStyle::Normal);
        assert_eq!(StressLevel::High.row_style().apply("High"), "🔴 High");
    }
}
