//! Homeowners insurance estimate.
//!
//! This is a rough approximation, not a rated insurance quote: a flat share of the
//! home value nudged by a coarse region bucket. Callers with a real premium should
//! pass it as an override; a real rating provider can replace [`RegionHeuristic`]
//! through [`InsuranceEstimator`].

/// Annual insurance premium estimate.
pub trait InsuranceEstimator: Send + Sync {
    fn annual_premium(&self, home_value: f64, region: Option<&str>) -> f64;
}

/// Annual premium as a fraction of home value before the region modifier.
pub const BASE_PREMIUM_RATE: f64 = 0.003;

/// `(upper bound of the 2-digit prefix, exclusive, modifier)`, checked in order.
const REGION_BUCKETS: [(u32, f64); 2] = [(20, 1.05), (50, 0.95)];
const DEFAULT_REGION_MODIFIER: f64 = 1.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct RegionHeuristic;

impl InsuranceEstimator for RegionHeuristic {
    fn annual_premium(&self, home_value: f64, region: Option<&str>) -> f64 {
        if !(home_value > 0.0) {
            return 0.0;
        }
        home_value * BASE_PREMIUM_RATE * region_modifier(region)
    }
}

/// Multiplier for the leading two digits of a zip/region code.
///
/// Anything without two leading digits uses the default bucket.
pub fn region_modifier(region: Option<&str>) -> f64 {
    let Some(prefix) = region.and_then(region_prefix) else {
        return DEFAULT_REGION_MODIFIER;
    };
    REGION_BUCKETS
        .iter()
        .find(|(upper, _)| prefix < *upper)
        .map(|(_, modifier)| *modifier)
        .unwrap_or(DEFAULT_REGION_MODIFIER)
}

fn region_prefix(region: &str) -> Option<u32> {
    let mut digits = region.trim().chars();
    let tens = digits.next()?.to_digit(10)?;
    let ones = digits.next()?.to_digit(10)?;
    Some(tens * 10 + ones)
}

/// Annual premium: a finite, non-negative override wins. The flag is `true` when estimated.
pub fn resolve_annual_premium(
    estimator: &dyn InsuranceEstimator,
    home_value: f64,
    region: Option<&str>,
    override_annual: Option<f64>,
) -> (f64, bool) {
    match override_annual {
        Some(v) if v.is_finite() && v >= 0.0 => (v, false),
        _ => (estimator.annual_premium(home_value, region), true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_buckets() {
        assert_eq!(region_modifier(Some("02134")), 1.05);
        assert_eq!(region_modifier(Some("19999")), 1.05);
        assert_eq!(region_modifier(Some("20001")), 0.95);
        assert_eq!(region_modifier(Some("49")), 0.95);
        assert_eq!(region_modifier(Some("50")), 1.0);
        assert_eq!(region_modifier(Some("84044")), 1.0);
    }

    #[test]
    fn unparseable_region_uses_default_bucket() {
        assert_eq!(region_modifier(None), 1.0);
        assert_eq!(region_modifier(Some("")), 1.0);
        assert_eq!(region_modifier(Some("7")), 1.0);
        assert_eq!(region_modifier(Some("K1A 0B1")), 1.0);
        assert_eq!(region_modifier(Some("1x234")), 1.0);
    }

    #[test]
    fn heuristic_premium() {
        let est = RegionHeuristic;
        assert!((est.annual_premium(400_000.0, Some("84044")) - 1_200.0).abs() < 1e-9);
        assert!((est.annual_premium(400_000.0, Some("10001")) - 1_260.0).abs() < 1e-9);
        assert!((est.annual_premium(400_000.0, Some("30301")) - 1_140.0).abs() < 1e-9);
        assert_eq!(est.annual_premium(0.0, Some("10001")), 0.0);
    }

    #[test]
    fn override_wins() {
        let (annual, estimated) = resolve_annual_premium(&RegionHeuristic, 400_000.0, None, Some(2_000.0));
        assert_eq!(annual, 2_000.0);
        assert!(!estimated);

        let (annual, estimated) = resolve_annual_premium(&RegionHeuristic, 400_000.0, None, Some(f64::NAN));
        assert!((annual - 1_200.0).abs() < 1e-9);
        assert!(estimated);
    }
}
