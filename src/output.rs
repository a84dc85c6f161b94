use crate::dashboard::DashboardView;
use crate::error::Result;
use crate::privacy;
use crate::types::{FlaggedRow, KpiRow, Kpis, Month, SeriesRow};
use crate::util::{bar, format_int, format_number};
use serde::Serialize;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};
use tracing::info;

const BAR_WIDTH: usize = 40;

pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

pub fn markdown_table<T: Tabled>(rows: &[T]) -> String
where
    T: Clone,
{
    Table::new(rows.to_vec()).with(Style::markdown()).to_string()
}

fn print_table<T>(rows: &[T])
where
    T: Tabled + Clone,
{
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    println!("{}\n", markdown_table(rows));
}

fn print_section(title: &str) {
    println!("\n{}", title);
    println!("{}", "─".repeat(75));
}

pub fn kpi_cards(kpis: &Kpis) -> KpiRow {
    let style = kpis.stress_level.row_style();
    KpiRow {
        stress_level: style.apply(&kpis.stress_level.to_string()),
        maturity_category: kpis.maturity_category.clone(),
        confidence_score: format!("{:.2}", kpis.confidence_score),
        service_stress_score: format!("{}", kpis.service_stress_score.trunc() as i64),
    }
}

/// Text rendering of a line chart: one row per period with a proportional bar.
pub fn series_rows(points: &[(Month, f64)]) -> Vec<SeriesRow> {
    let max = points.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
    points
        .iter()
        .map(|(month, value)| SeriesRow {
            month: month.to_string(),
            value: format_number(*value, 0),
            bar: bar(*value, max, BAR_WIDTH),
        })
        .collect()
}

pub fn print_dashboard(view: &DashboardView<'_>) {
    println!("🇮🇳 Aadhaar Pulse – District Intelligence & Forecasting System");
    println!("Interactive planning console for UIDAI\n");

    if let Some(banner) = &view.banner {
        println!("{}\n", banner);
    }
    if !view.flagged.is_empty() {
        print_section("Administrative mismatch records");
        print_table(&view.flagged);
    }

    let location = &view.location;
    print_section(&format!(
        "📍 {}, {} (latest: {})",
        location.district,
        location.state,
        location.latest().month
    ));
    print_table(&[kpi_cards(&view.kpis)]);

    print_section("🔐 Privacy status");
    for line in privacy::status_lines(view.epsilon) {
        println!("{}", line);
    }
    let updates_label = if view.kpis.noised { "Latest update total (noised)" } else { "Latest update total" };
    println!("{}: {}", updates_label, format_number(view.kpis.update_total, 0));

    print_section("📈 Historical Update Trend");
    let history: Vec<(Month, f64)> = location
        .history
        .iter()
        .map(|r| (r.month, r.update_total as f64))
        .collect();
    print_table(&series_rows(&history));

    print_section("🔮 Forecasted Update Demand");
    if location.forecast.is_empty() {
        println!("No forecast data available for this district.");
    } else {
        let forecast: Vec<(Month, f64)> = location
            .forecast
            .iter()
            .map(|f| (f.forecast_month, f.predicted_update_total))
            .collect();
        print_table(&series_rows(&forecast));
    }

    print_section("🧮 Resource Recommendation");
    match (view.predicted_demand, view.recommendation) {
        (Some(demand), Some(plan)) => {
            println!("Predicted demand (next period): {}", format_number(demand, 0));
            println!("Staff required:        {}", format_int(plan.staff));
            println!("Devices required:      {}", format_int(plan.devices));
            println!("Mobile units required: {}", format_int(plan.mobile_units));
        }
        _ => println!("No forecast available; resource recommendation skipped."),
    }

    print_section("🎛 What-if Scenario");
    match view.scenario {
        Some(outcome) => {
            println!(
                "Added capacity: {} staff, {} devices, {} mobile units (+{} updates)",
                view.extra.staff,
                view.extra.devices,
                view.extra.mobile_units,
                format_number(outcome.capacity_gain, 0)
            );
            println!("Remaining workload: {}", format_number(outcome.remaining_workload, 0));
            if outcome.fully_covered {
                println!("✅ Added capacity fully covers predicted demand.");
            }
        }
        None => println!("No forecast available; scenario simulation skipped."),
    }

    print_section(&format!("🚨 Top {} High-Risk Districts", view.top_risk.len()));
    print_table(&view.top_risk);
}

/// Write the console's tables and a JSON summary under `dir`.
pub fn export(view: &DashboardView<'_>, all_flagged: &[FlaggedRow], dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)?;
    write_csv(&dir.join("top_risk.csv"), &view.top_risk)?;
    write_csv(&dir.join("flagged_records.csv"), all_flagged)?;
    write_csv(&dir.join("location_history.csv"), &view.location.history)?;
    write_json(&dir.join("summary.json"), &view.summary())?;
    info!("exported tables and summary to {}", dir.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StressLevel;

    #[test]
    fn test_kpi_cards_formatting() {
        let kpis = Kpis {
            stress_level: StressLevel::Medium,
            maturity_category: "Growing".to_string(),
            confidence_score: 0.876,
            service_stress_score: 54.9,
            update_total: 1200.0,
            noised: false,
        };
        let card = kpi_cards(&kpis);
        assert_eq!(card.stress_level, "🟠 Medium");
        assert_eq!(card.confidence_score, "0.88");
        assert_eq!(card.service_stress_score, "54");
    }

    #[test]
    fn test_series_rows_bars() {
        let points = vec![
            (Month::new(2025, 1).unwrap(), 500.0),
            (Month::new(2025, 2).unwrap(), 1000.0),
        ];
        let rows = series_rows(&points);
        assert_eq!(rows[0].month, "2025-01");
        assert_eq!(rows[1].value, "1,000");
        assert_eq!(rows[0].bar.chars().count(), BAR_WIDTH / 2);
        assert_eq!(rows[1].bar.chars().count(), BAR_WIDTH);
    }

    #[test]
    fn test_markdown_table_has_headers() {
        let rendered = markdown_table(&series_rows(&[(Month::new(2024, 11).unwrap(), 3.0)]));
        assert!(rendered.contains("Month"));
        assert!(rendered.contains("2024-11"));
    }
}
