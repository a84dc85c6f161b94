//! Session-scoped, read-only view over the two loaded tables.
//!
//! A `DataStore` is built once per run and handed by reference to every
//! query, so there is no process-wide cache to invalidate.
use crate::error::{DashboardError, Result};
use crate::loader::{self, LoadReport};
use crate::quality;
use crate::ranking;
use crate::types::{FlaggedRow, ForecastRecord, Month, MonthlyRecord};
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct DataStore {
    monthly: Vec<MonthlyRecord>,
    forecast: Vec<ForecastRecord>,
    monthly_report: LoadReport,
    forecast_report: LoadReport,
    /// Where the monthly table came from, for error messages.
    source: String,
}

/// All rows for one state+district pair, ordered by month. Never empty.
#[derive(Debug, Clone)]
pub struct LocationView<'a> {
    pub state: &'a str,
    pub district: &'a str,
    pub history: Vec<&'a MonthlyRecord>,
    pub forecast: Vec<&'a ForecastRecord>,
}

impl<'a> LocationView<'a> {
    /// Most recent month for the location.
    pub fn latest(&self) -> &'a MonthlyRecord {
        // The constructor rejects empty selections.
        self.history[self.history.len() - 1]
    }

    /// Demand to plan for: the earliest forecast period, if any.
    pub fn next_predicted_demand(&self) -> Option<f64> {
        self.forecast.first().map(|f| f.predicted_update_total)
    }
}

impl DataStore {
    pub fn new(mut monthly: Vec<MonthlyRecord>, forecast: Vec<ForecastRecord>) -> DataStore {
        let flagged_rows = quality::flag_records(&mut monthly);
        let monthly_report = LoadReport {
            total_rows: monthly.len(),
            loaded_rows: monthly.len(),
            parse_errors: 0,
            flagged_rows,
        };
        let forecast_report = LoadReport {
            total_rows: forecast.len(),
            loaded_rows: forecast.len(),
            ..LoadReport::default()
        };
        DataStore {
            monthly,
            forecast,
            monthly_report,
            forecast_report,
            source: "in-memory table".to_string(),
        }
    }

    pub fn load(monthly_path: &Path, forecast_path: &Path) -> Result<DataStore> {
        let (monthly, monthly_report) = loader::load_monthly(monthly_path)?;
        let (forecast, forecast_report) = loader::load_forecast(forecast_path)?;
        Ok(DataStore {
            monthly,
            forecast,
            monthly_report,
            forecast_report,
            source: monthly_path.display().to_string(),
        })
    }

    pub fn monthly(&self) -> &[MonthlyRecord] {
        &self.monthly
    }

    pub fn forecast(&self) -> &[ForecastRecord] {
        &self.forecast
    }

    pub fn monthly_report(&self) -> LoadReport {
        self.monthly_report
    }

    pub fn forecast_report(&self) -> LoadReport {
        self.forecast_report
    }

    pub fn flagged_count(&self) -> usize {
        self.monthly.iter().filter(|r| r.data_quality_flag).count()
    }

    pub fn flagged_rows(&self) -> Vec<FlaggedRow> {
        quality::flagged_rows(&self.monthly)
    }

    /// Sorted distinct states.
    pub fn states(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self.monthly.iter().map(|r| r.state.as_str()).collect();
        set.into_iter().collect()
    }

    /// State options for a selection menu. An empty table is an error rather
    /// than an empty menu.
    pub fn state_options(&self) -> Result<Vec<&str>> {
        let states = self.states();
        if states.is_empty() {
            return Err(DashboardError::EmptyDataset(self.source.clone()));
        }
        Ok(states)
    }

    /// Sorted distinct districts for `state`.
    pub fn districts(&self, state: &str) -> Result<Vec<&str>> {
        let set: BTreeSet<&str> = self
            .monthly
            .iter()
            .filter(|r| r.state == state)
            .map(|r| r.district.as_str())
            .collect();
        if set.is_empty() {
            return Err(DashboardError::UnknownState(state.to_string()));
        }
        Ok(set.into_iter().collect())
    }

    pub fn select(&self, state: &str, district: &str) -> Result<LocationView<'_>> {
        let mut history: Vec<&MonthlyRecord> = self
            .monthly
            .iter()
            .filter(|r| r.state == state && r.district == district)
            .collect();
        let Some(&first) = history.first() else {
            if !self.monthly.iter().any(|r| r.state == state) {
                return Err(DashboardError::UnknownState(state.to_string()));
            }
            return Err(DashboardError::NoData {
                state: state.to_string(),
                district: district.to_string(),
            });
        };
        let (state, district) = (first.state.as_str(), first.district.as_str());
        history.sort_by_key(|r| r.month);

        let mut forecast: Vec<&ForecastRecord> = self
            .forecast
            .iter()
            .filter(|f| f.state == state && f.district == district)
            .collect();
        forecast.sort_by_key(|f| f.forecast_month);

        Ok(LocationView {
            state,
            district,
            history,
            forecast,
        })
    }

    pub fn latest_month(&self) -> Option<Month> {
        ranking::latest_month(&self.monthly)
    }

    pub fn top_risk(&self, limit: usize) -> Vec<&MonthlyRecord> {
        ranking::top_risk(&self.monthly, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StressLevel;

    fn record(state: &str, district: &str, year: i32, month: u32, total: u64) -> MonthlyRecord {
        MonthlyRecord {
            state: state.to_string(),
            district: district.to_string(),
            month: Month::new(year, month).unwrap(),
            update_total: total,
            service_stress_score: total as f64 / 10.0,
            stress_level: StressLevel::Medium,
            maturity_category: "Growing".to_string(),
            confidence_score: 0.7,
            data_quality_flag: false,
        }
    }

    fn forecast(state: &str, district: &str, month: u32, predicted: f64) -> ForecastRecord {
        ForecastRecord {
            state: state.to_string(),
            district: district.to_string(),
            forecast_month: Month::new(2025, month).unwrap(),
            predicted_update_total: predicted,
        }
    }

    fn sample_store() -> DataStore {
        DataStore::new(
            vec![
                record("Telangana", "Warangal", 2024, 12, 300),
                record("Telangana", "Hyderabad", 2025, 2, 900),
                record("Telangana", "Hyderabad", 2024, 12, 700),
                record("Karnataka", "Mysuru", 2025, 2, 200),
                record("Andhra Pradesh", "Hyderabad", 2025, 1, 50),
            ],
            vec![
                forecast("Telangana", "Hyderabad", 4, 1100.0),
                forecast("Telangana", "Hyderabad", 3, 1000.0),
            ],
        )
    }

    #[test]
    fn test_state_and_district_options() {
        let store = sample_store();
        assert_eq!(store.states(), vec!["Andhra Pradesh", "Karnataka", "Telangana"]);
        assert_eq!(store.districts("Telangana").unwrap(), vec!["Hyderabad", "Warangal"]);
        assert_eq!(store.districts("Karnataka").unwrap(), vec!["Mysuru"]);
        assert!(matches!(store.districts("Goa"), Err(DashboardError::UnknownState(_))));
    }

    #[test]
    fn test_select_sorts_history_and_forecast() {
        let store = sample_store();
        let view = store.select("Telangana", "Hyderabad").unwrap();
        let months: Vec<String> = view.history.iter().map(|r| r.month.to_string()).collect();
        assert_eq!(months, vec!["2024-12", "2025-02"]);
        assert_eq!(view.latest().update_total, 900);
        assert_eq!(view.forecast.len(), 2);
        assert_eq!(view.next_predicted_demand(), Some(1000.0));
    }

    #[test]
    fn test_select_without_forecast() {
        let store = sample_store();
        let view = store.select("Karnataka", "Mysuru").unwrap();
        assert!(view.forecast.is_empty());
        assert_eq!(view.next_predicted_demand(), None);
    }

    #[test]
    fn test_empty_selection_is_an_error() {
        let store = sample_store();
        assert!(matches!(
            store.select("Karnataka", "Hyderabad"),
            Err(DashboardError::NoData { .. })
        ));
        assert!(matches!(
            store.select("Goa", "Panaji"),
            Err(DashboardError::UnknownState(_))
        ));
    }

    #[test]
    fn test_empty_store_has_no_state_options() {
        let store = DataStore::new(Vec::new(), Vec::new());
        assert!(store.states().is_empty());
        assert!(matches!(store.state_options(), Err(DashboardError::EmptyDataset(_))));
        assert!(matches!(
            store.select("Telangana", "Hyderabad"),
            Err(DashboardError::UnknownState(_))
        ));
        assert_eq!(sample_store().state_options().unwrap().len(), 3);
    }

    #[test]
    fn test_new_computes_quality_flags() {
        let store = sample_store();
        assert_eq!(store.flagged_count(), 1);
        assert_eq!(store.monthly_report().flagged_rows, 1);
        assert_eq!(store.flagged_rows()[0].state, "Andhra Pradesh");
    }
}
