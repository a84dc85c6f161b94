//! Administrative consistency check for the monthly table.
//!
//! Legacy source extracts still code Hyderabad under Andhra Pradesh. Any
//! Hyderabad row whose state is not Telangana is flagged so the console can
//! warn about it; the rows themselves stay in the table.
use crate::types::{FlaggedRow, MonthlyRecord};
use crate::util::format_number;

const MISMATCH_DISTRICT: &str = "hyderabad";
const EXPECTED_STATE: &str = "telangana";

pub fn is_admin_mismatch(state: &str, district: &str) -> bool {
    district.to_lowercase() == MISMATCH_DISTRICT && state.to_lowercase() != EXPECTED_STATE
}

/// Set `data_quality_flag` on every record. Returns the number flagged.
pub fn flag_records(records: &mut [MonthlyRecord]) -> usize {
    let mut flagged = 0usize;
    for r in records.iter_mut() {
        r.data_quality_flag = is_admin_mismatch(&r.state, &r.district);
        if r.data_quality_flag {
            flagged += 1;
        }
    }
    flagged
}

pub fn flagged_rows(records: &[MonthlyRecord]) -> Vec<FlaggedRow> {
    records
        .iter()
        .filter(|r| r.data_quality_flag)
        .map(|r| FlaggedRow {
            state: r.state.clone(),
            district: r.district.clone(),
            month: r.month.to_string(),
            update_total: r.update_total,
            service_stress_score: format_number(r.service_stress_score, 2),
        })
        .collect()
}

/// Banner text for the console, or `None` when nothing was flagged.
pub fn warning_banner(flagged: usize) -> Option<String> {
    if flagged == 0 {
        return None;
    }
    Some(format!(
        "⚠ Detected {} records with possible administrative mismatch \
         (e.g., Hyderabad mapped outside Telangana). \
         This reflects legacy coding in source UIDAI datasets.",
        flagged
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Month, StressLevel};

    fn record(state: &str, district: &str) -> MonthlyRecord {
        MonthlyRecord {
            state: state.to_string(),
            district: district.to_string(),
            month: Month::new(2025, 1).unwrap(),
            update_total: 100,
            service_stress_score: 10.0,
            stress_level: StressLevel::Low,
            maturity_category: "Emerging".to_string(),
            confidence_score: 0.5,
            data_quality_flag: false,
        }
    }

    #[test]
    fn test_mismatch_rule() {
        assert!(is_admin_mismatch("Andhra Pradesh", "Hyderabad"));
        assert!(is_admin_mismatch("andhra pradesh", "HYDERABAD"));
        assert!(!is_admin_mismatch("Telangana", "Hyderabad"));
        assert!(!is_admin_mismatch("TELANGANA", "hyderabad"));
        assert!(!is_admin_mismatch("Andhra Pradesh", "Guntur"));
    }

    #[test]
    fn test_flag_records_counts_and_marks() {
        let mut records = vec![
            record("Andhra Pradesh", "Hyderabad"),
            record("Telangana", "Hyderabad"),
            record("Karnataka", "Bengaluru Urban"),
        ];
        assert_eq!(flag_records(&mut records), 1);
        assert!(records[0].data_quality_flag);
        assert!(!records[1].data_quality_flag);
        assert!(!records[2].data_quality_flag);

        let rows = flagged_rows(&records);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].state, "Andhra Pradesh");
        assert_eq!(rows[0].month, "2025-01");
    }

    #[test]
    fn test_no_banner_when_clean() {
        let mut records = vec![record("Telangana", "Hyderabad")];
        let flagged = flag_records(&mut records);
        assert!(warning_banner(flagged).is_none());
        assert!(flagged_rows(&records).is_empty());
        assert!(warning_banner(3).unwrap().contains("Detected 3 records"));
    }
}
