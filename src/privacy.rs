//! Laplace noise for the headline metrics.
//!
//! This is display-level perturbation only: there is no sensitivity
//! analysis and no cumulative budget, so repeated renders leak the true
//! value. The status panel says as much.
use crate::error::{DashboardError, Result};
use crate::types::Kpis;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_EPSILON: f64 = 1.0;

pub struct NoiseInjector<R: Rng> {
    epsilon: f64,
    rng: R,
}

impl NoiseInjector<StdRng> {
    /// Seeded injector for reproducible output, or entropy-seeded when `seed` is `None`.
    pub fn from_seed(epsilon: f64, seed: Option<u64>) -> Result<Self> {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        NoiseInjector::new(epsilon, rng)
    }
}

impl<R: Rng> NoiseInjector<R> {
    pub fn new(epsilon: f64, rng: R) -> Result<Self> {
        if !epsilon.is_finite() || epsilon <= 0.0 {
            return Err(DashboardError::InvalidEpsilon(epsilon));
        }
        Ok(NoiseInjector { epsilon, rng })
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn scale(&self) -> f64 {
        1.0 / self.epsilon
    }

    /// One draw from Laplace(0, 1/ε) by inverse CDF.
    pub fn sample(&mut self) -> f64 {
        let u = loop {
            let u: f64 = self.rng.gen::<f64>() - 0.5;
            // -0.5 would map to ln(0)
            if u > -0.5 {
                break u;
            }
        };
        -self.scale() * u.signum() * (1.0 - 2.0 * u.abs()).ln()
    }

    /// `value` plus noise, never below zero.
    pub fn add_noise(&mut self, value: f64) -> f64 {
        (value + self.sample()).max(0.0)
    }

    /// Perturb the two numeric headline metrics independently.
    pub fn apply(&mut self, kpis: &Kpis) -> Kpis {
        Kpis {
            service_stress_score: self.add_noise(kpis.service_stress_score),
            update_total: self.add_noise(kpis.update_total),
            noised: true,
            ..kpis.clone()
        }
    }
}

pub fn status_lines(epsilon: Option<f64>) -> Vec<String> {
    match epsilon {
        Some(eps) => vec![
            format!("Privacy noise: ENABLED (Laplace, ε = {:.2}, scale = {:.2})", eps, 1.0 / eps),
            "Service stress score and update total are perturbed and clamped at zero.".to_string(),
            "No privacy budget is tracked across renders; treat this as obfuscation only.".to_string(),
        ],
        None => vec!["Privacy noise: DISABLED (exact aggregates shown)".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::StressLevel;

    fn seeded(seed: u64) -> NoiseInjector<StdRng> {
        NoiseInjector::new(DEFAULT_EPSILON, StdRng::seed_from_u64(seed)).unwrap()
    }

    #[test]
    fn test_rejects_bad_epsilon() {
        assert!(matches!(
            NoiseInjector::from_seed(0.0, Some(1)),
            Err(DashboardError::InvalidEpsilon(_))
        ));
        assert!(NoiseInjector::from_seed(-1.0, Some(1)).is_err());
        assert!(NoiseInjector::from_seed(f64::INFINITY, Some(1)).is_err());
    }

    #[test]
    fn test_output_never_negative() {
        let mut noise = seeded(7);
        for v in [-100.0, -1.0, 0.0, 0.3, 2.0] {
            for _ in 0..1000 {
                assert!(noise.add_noise(v) >= 0.0);
            }
        }
    }

    #[test]
    fn test_mean_is_close_to_value() {
        let mut noise = seeded(42);
        let draws: Vec<f64> = (0..20_000).map(|_| noise.add_noise(100.0)).collect();
        let mean = draws.iter().sum::<f64>() / draws.len() as f64;
        assert!((mean - 100.0).abs() < 0.1, "mean drifted: {}", mean);
    }

    #[test]
    fn test_seed_is_deterministic() {
        let mut a = seeded(99);
        let mut b = seeded(99);
        for _ in 0..10 {
            assert_eq!(a.sample(), b.sample());
        }
    }

    #[test]
    fn test_apply_only_touches_numeric_metrics() {
        let kpis = Kpis {
            stress_level: StressLevel::High,
            maturity_category: "Mature".to_string(),
            confidence_score: 0.82,
            service_stress_score: 60.0,
            update_total: 5000.0,
            noised: false,
        };
        let noised = seeded(3).apply(&kpis);
        assert!(noised.noised);
        assert_eq!(noised.stress_level, StressLevel::High);
        assert_eq!(noised.confidence_score, 0.82);
        assert_eq!(noised.maturity_category, "Mature");
        assert!(noised.service_stress_score >= 0.0);
        assert!(noised.update_total >= 0.0);
    }

    #[test]
    fn test_status_lines() {
        assert!(status_lines(None)[0].contains("DISABLED"));
        let lines = status_lines(Some(1.0));
        assert!(lines[0].contains("ENABLED"));
        assert!(lines.iter().any(|l| l.contains("budget")));
    }
}
