//! Resource sizing and what-if capacity simulation.
//!
//! Throughput assumptions per month: one operator clears 400 updates, one
//! enrolment device 250, one mobile unit 1000.
use crate::types::{ExtraCapacity, ResourcePlan, ScenarioOutcome};

pub const UPDATES_PER_STAFF: f64 = 400.0;
pub const UPDATES_PER_DEVICE: f64 = 250.0;
pub const UPDATES_PER_MOBILE_UNIT: f64 = 1000.0;

pub const MAX_EXTRA_STAFF: u32 = 100;
pub const MAX_EXTRA_DEVICES: u32 = 100;
pub const MAX_EXTRA_UNITS: u32 = 20;

fn units_needed(demand: f64, per_unit: f64) -> u64 {
    (demand / per_unit).ceil() as u64
}

/// Staff, devices and mobile units needed to absorb `predicted_updates`.
///
/// Negative or non-finite demand sizes to zero.
pub fn recommend(predicted_updates: f64) -> ResourcePlan {
    let demand = if predicted_updates.is_finite() {
        predicted_updates.max(0.0)
    } else {
        0.0
    };
    ResourcePlan {
        staff: units_needed(demand, UPDATES_PER_STAFF),
        devices: units_needed(demand, UPDATES_PER_DEVICE),
        mobile_units: units_needed(demand, UPDATES_PER_MOBILE_UNIT),
    }
}

pub fn capacity_gain(extra: ExtraCapacity) -> f64 {
    extra.staff as f64 * UPDATES_PER_STAFF
        + extra.devices as f64 * UPDATES_PER_DEVICE
        + extra.mobile_units as f64 * UPDATES_PER_MOBILE_UNIT
}

pub fn simulate(predicted_demand: f64, extra: ExtraCapacity) -> ScenarioOutcome {
    let gain = capacity_gain(extra);
    let remaining = (predicted_demand - gain).max(0.0);
    ScenarioOutcome {
        capacity_gain: gain,
        remaining_workload: remaining,
        fully_covered: remaining == 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extra(staff: u32, devices: u32, mobile_units: u32) -> ExtraCapacity {
        ExtraCapacity {
            staff,
            devices,
            mobile_units,
        }
    }

    fn plan(staff: u64, devices: u64, mobile_units: u64) -> ResourcePlan {
        ResourcePlan {
            staff,
            devices,
            mobile_units,
        }
    }

    #[test]
    fn test_recommend_reference_points() {
        assert_eq!(recommend(0.0), plan(0, 0, 0));
        assert_eq!(recommend(400.0), plan(1, 2, 1));
        assert_eq!(recommend(1000.0), plan(3, 4, 1));
        assert_eq!(recommend(1.0), plan(1, 1, 1));
        assert_eq!(recommend(2500.5), plan(7, 11, 3));
    }

    #[test]
    fn test_recommend_clamps_bad_input() {
        assert_eq!(recommend(-50.0), plan(0, 0, 0));
        assert_eq!(recommend(f64::NAN), plan(0, 0, 0));
    }

    #[test]
    fn test_simulate_reduces_workload() {
        let outcome = simulate(1000.0, extra(1, 0, 0));
        assert_eq!(outcome.capacity_gain, 400.0);
        assert_eq!(outcome.remaining_workload, 600.0);
        assert!(!outcome.fully_covered);
    }

    #[test]
    fn test_simulate_floors_at_zero() {
        let outcome = simulate(100.0, extra(1, 0, 0));
        assert_eq!(outcome.remaining_workload, 0.0);
        assert!(outcome.fully_covered);
    }

    #[test]
    fn test_capacity_gain_mixes_resources() {
        assert_eq!(capacity_gain(extra(2, 4, 1)), 800.0 + 1000.0 + 1000.0);
        assert_eq!(capacity_gain(ExtraCapacity::default()), 0.0);
        assert_eq!(simulate(5000.0, ExtraCapacity::default()).remaining_workload, 5000.0);
    }
}
