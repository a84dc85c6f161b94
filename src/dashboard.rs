//! One full recomputation of the console for a selected location.
use crate::error::Result;
use crate::planning;
use crate::privacy::NoiseInjector;
use crate::quality;
use crate::ranking;
use crate::store::{DataStore, LocationView};
use crate::types::{
    DashboardSummary, ExtraCapacity, FlaggedRow, Kpis, ResourcePlan, RiskRow, ScenarioOutcome,
};
use rand::Rng;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub show_flagged: bool,
    pub extra: ExtraCapacity,
    pub top_n: usize,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            show_flagged: false,
            extra: ExtraCapacity::default(),
            top_n: ranking::DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardView<'a> {
    pub location: LocationView<'a>,
    pub kpis: Kpis,
    /// `Some(ε)` when noise was injected into `kpis`.
    pub epsilon: Option<f64>,
    pub banner: Option<String>,
    pub flagged_count: usize,
    /// Populated only when the detail view was requested.
    pub flagged: Vec<FlaggedRow>,
    pub predicted_demand: Option<f64>,
    pub recommendation: Option<ResourcePlan>,
    pub scenario: Option<ScenarioOutcome>,
    pub extra: ExtraCapacity,
    pub top_risk: Vec<RiskRow>,
}

pub fn exact_kpis(location: &LocationView<'_>) -> Kpis {
    let latest = location.latest();
    Kpis {
        stress_level: latest.stress_level,
        maturity_category: latest.maturity_category.clone(),
        confidence_score: latest.confidence_score,
        service_stress_score: latest.service_stress_score,
        update_total: latest.update_total as f64,
        noised: false,
    }
}

pub fn build<'a, R: Rng>(
    store: &'a DataStore,
    state: &str,
    district: &str,
    opts: &RenderOptions,
    noise: Option<&mut NoiseInjector<R>>,
) -> Result<DashboardView<'a>> {
    let location = store.select(state, district)?;
    debug!(
        "selected {}, {}: {} months, {} forecast rows",
        location.district,
        location.state,
        location.history.len(),
        location.forecast.len()
    );

    let exact = exact_kpis(&location);
    let (kpis, epsilon) = match noise {
        Some(injector) => (injector.apply(&exact), Some(injector.epsilon())),
        None => (exact, None),
    };

    let flagged_count = store.flagged_count();
    let flagged = if opts.show_flagged {
        store.flagged_rows()
    } else {
        Vec::new()
    };

    let predicted_demand = location.next_predicted_demand();
    let recommendation = predicted_demand.map(planning::recommend);
    let scenario = predicted_demand.map(|d| planning::simulate(d, opts.extra));

    let top_risk = ranking::risk_rows(&store.top_risk(opts.top_n));

    Ok(DashboardView {
        location,
        kpis,
        epsilon,
        banner: quality::warning_banner(flagged_count),
        flagged_count,
        flagged,
        predicted_demand,
        recommendation,
        scenario,
        extra: opts.extra,
        top_risk,
    })
}

impl DashboardView<'_> {
    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            state: self.location.state.to_string(),
            district: self.location.district.to_string(),
            latest_month: self.location.latest().month,
            kpis: self.kpis.clone(),
            flagged_records: self.flagged_count,
            predicted_demand: self.predicted_demand,
            recommendation: self.recommendation,
            scenario: self.scenario,
            extra_capacity: self.extra,
        }
    }
}
