//! Command-line configuration.
//!
//! Every control of the console maps to a flag; the slider ranges are
//! enforced by the value parsers.
use crate::dashboard::RenderOptions;
use crate::planning::{MAX_EXTRA_DEVICES, MAX_EXTRA_STAFF, MAX_EXTRA_UNITS};
use crate::privacy::DEFAULT_EPSILON;
use crate::ranking::DEFAULT_TOP_N;
use crate::types::ExtraCapacity;
use clap::Parser;
use std::path::PathBuf;

/// Aadhaar Pulse - district intelligence and forecasting console
#[derive(Parser, Debug, Clone)]
#[command(name = "aadhaar_pulse")]
#[command(about = "District-level Aadhaar update intelligence, forecasts and resource planning")]
pub struct Args {
    /// Monthly intelligence dataset (CSV)
    #[arg(long, env = "PULSE_MONTHLY_CSV", default_value = "aadhaar_phase2_intelligence_dataset.csv")]
    pub monthly: PathBuf,

    /// Forecast dataset (CSV)
    #[arg(long, env = "PULSE_FORECAST_CSV", default_value = "aadhaar_phase3_forecast.csv")]
    pub forecast: PathBuf,

    /// State to inspect; omit together with --district for the interactive menu
    #[arg(long, requires = "district")]
    pub state: Option<String>,

    /// District within --state
    #[arg(long, requires = "state")]
    pub district: Option<String>,

    /// List records flagged by the administrative consistency check
    #[arg(long)]
    pub show_flagged: bool,

    /// Add Laplace noise to the stress score and update total
    #[arg(long)]
    pub privacy_noise: bool,

    /// Privacy parameter; noise scale is 1/epsilon
    #[arg(long, default_value_t = DEFAULT_EPSILON)]
    pub epsilon: f64,

    /// Seed for the noise generator (reseeded from entropy when absent)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Additional staff for the what-if scenario
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=MAX_EXTRA_STAFF as i64))]
    pub extra_staff: u32,

    /// Additional devices for the what-if scenario
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=MAX_EXTRA_DEVICES as i64))]
    pub extra_devices: u32,

    /// Additional mobile units for the what-if scenario
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=MAX_EXTRA_UNITS as i64))]
    pub extra_units: u32,

    /// Number of rows in the high-risk ranking
    #[arg(long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,

    /// Write CSV tables and summary.json to this directory
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Log filter (trace, debug, info, warn, error or an EnvFilter directive)
    #[arg(long, env = "PULSE_LOG")]
    pub log_level: Option<String>,
}

impl Args {
    pub fn extra_capacity(&self) -> ExtraCapacity {
        ExtraCapacity {
            staff: self.extra_staff,
            devices: self.extra_devices,
            mobile_units: self.extra_units,
        }
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            show_flagged: self.show_flagged,
            extra: self.extra_capacity(),
            top_n: self.top,
        }
    }

    /// Location given on the command line, if both halves are present.
    pub fn location(&self) -> Option<(&str, &str)> {
        match (&self.state, &self.district) {
            (Some(s), Some(d)) => Some((s.as_str(), d.as_str())),
            _ => None,
        }
    }
}
