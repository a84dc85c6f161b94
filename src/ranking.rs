use crate::types::{Month, MonthlyRecord, RiskRow};
use crate::util::format_number;

pub const DEFAULT_TOP_N: usize = 20;

/// Globally latest period across the whole table.
pub fn latest_month(data: &[MonthlyRecord]) -> Option<Month> {
    data.iter().map(|r| r.month).max()
}

/// Highest-stress districts for the latest month.
///
/// Ordered by `service_stress_score` descending; ties fall back to state,
/// then district, ascending so the ranking is reproducible.
pub fn top_risk(data: &[MonthlyRecord], limit: usize) -> Vec<&MonthlyRecord> {
    let Some(latest) = latest_month(data) else {
        return Vec::new();
    };
    let mut rows: Vec<&MonthlyRecord> = data.iter().filter(|r| r.month == latest).collect();
    rows.sort_by(|a, b| {
        b.service_stress_score
            .total_cmp(&a.service_stress_score)
            .then_with(|| a.state.cmp(&b.state))
            .then_with(|| a.district.cmp(&b.district))
    });
    rows.truncate(limit);
    rows
}

pub fn risk_rows(ranked: &[&MonthlyRecord]) -> Vec<RiskRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(idx, r)| RiskRow {
            rank: idx + 1,
            state: r.state.clone(),
            district: r.district.clone(),
            service_stress_score: format_number(r.service_stress_score, 2),
            stress_level: r.stress_level.row_style().apply(&r.stress_level.to_string()),
        })
        .collect()
}
