//! Interest rate resolution.
//!
//! A rate is resolved for `(loan type, term)` by walking an ordered chain of
//! [`Strategy`] values over a snapshot of the anchor series that term needs:
//!
//! 1. `ExactAnchor`: the term is an anchor term and its series answered
//! 2. `Interpolate`: fixed term strictly between the 15y and 30y anchors, both live
//! 3. `Extrapolate`: ARM term off the reference (additive offset), or fixed term
//!    outside [15, 30] (flat from the nearest anchor)
//! 4. `StaticFallback`: the same shapes over last-known rates; always answers
//!
//! Each series is queried at most once per resolution. Resolution never fails.

use std::sync::Arc;
use std::thread;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::data::RateSource;
use crate::domain::{LoanType, RateAnchor, RateObservation, RateOrigin, ResolvedRate};

pub const FIXED_15Y: RateAnchor = RateAnchor {
    loan_type: LoanType::Fixed,
    term_years: 15,
    series_key: "MORTGAGE15US",
    last_known_rate: Some(5.5),
};

pub const FIXED_30Y: RateAnchor = RateAnchor {
    loan_type: LoanType::Fixed,
    term_years: 30,
    series_key: "MORTGAGE30US",
    last_known_rate: Some(6.0),
};

/// 5/1 ARM series, quoted for a standard 30-year amortization.
pub const ARM_REFERENCE: RateAnchor = RateAnchor {
    loan_type: LoanType::Adjustable,
    term_years: 30,
    series_key: "MORTGAGE5US",
    last_known_rate: Some(5.7),
};

pub const ANCHORS: [RateAnchor; 3] = [FIXED_15Y, FIXED_30Y, ARM_REFERENCE];

/// Used only if an anchor carries no last-known rate.
const LAST_RESORT_PERCENT: f64 = 6.0;

/// Additive ARM offsets (percentage points) relative to [`ARM_REFERENCE`].
///
/// `(upper term bound in years, inclusive, offset)`, checked in order.
pub const ARM_TERM_OFFSETS: [(u32, f64); 5] = [
    (15, -0.50),
    (29, -0.25),
    (30, 0.0),
    (40, 0.25),
    (u32::MAX, 0.50),
];

pub fn arm_offset(term_years: u32) -> f64 {
    ARM_TERM_OFFSETS
        .iter()
        .find(|(upper, _)| term_years <= *upper)
        .map(|(_, offset)| *offset)
        .unwrap_or(0.0)
}

/// One step of the degradation chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    ExactAnchor,
    Interpolate,
    Extrapolate,
    StaticFallback,
}

pub const DEFAULT_CHAIN: [Strategy; 4] = [
    Strategy::ExactAnchor,
    Strategy::Interpolate,
    Strategy::Extrapolate,
    Strategy::StaticFallback,
];

/// Position of a fixed term relative to the fixed anchors.
#[derive(Debug, Clone, Copy, PartialEq)]
enum FixedBracket {
    Exact(RateAnchor),
    Between(RateAnchor, RateAnchor),
    Below(RateAnchor),
    Above(RateAnchor),
}

fn fixed_bracket(term_years: u32) -> FixedBracket {
    if term_years == FIXED_15Y.term_years {
        FixedBracket::Exact(FIXED_15Y)
    } else if term_years == FIXED_30Y.term_years {
        FixedBracket::Exact(FIXED_30Y)
    } else if term_years < FIXED_15Y.term_years {
        FixedBracket::Below(FIXED_15Y)
    } else if term_years > FIXED_30Y.term_years {
        FixedBracket::Above(FIXED_30Y)
    } else {
        FixedBracket::Between(FIXED_15Y, FIXED_30Y)
    }
}

/// Anchor series a `(loan type, term)` resolution may consult.
fn anchors_for(loan_type: LoanType, term_years: u32) -> Vec<RateAnchor> {
    match loan_type {
        LoanType::Adjustable => vec![ARM_REFERENCE],
        LoanType::Fixed => match fixed_bracket(term_years) {
            FixedBracket::Exact(a) | FixedBracket::Below(a) | FixedBracket::Above(a) => vec![a],
            FixedBracket::Between(lo, hi) => vec![lo, hi],
        },
    }
}

/// Per-resolution view of anchor observations.
#[derive(Debug, Clone, Default)]
pub struct AnchorQuotes {
    quotes: Vec<(&'static str, Option<RateObservation>)>,
}

impl AnchorQuotes {
    /// Query every anchor once.
    ///
    /// Lookups are blocking I/O, so each one gets its own scoped thread owned by this
    /// call; concurrent resolutions never queue behind each other's timeouts.
    pub fn fetch(source: &dyn RateSource, anchors: &[RateAnchor]) -> Self {
        let quotes = match anchors {
            [] => Vec::new(),
            [only] => vec![(only.series_key, source.latest(only.series_key))],
            _ => thread::scope(|scope| {
                let lookups: Vec<_> = anchors
                    .iter()
                    .map(|anchor| (anchor.series_key, scope.spawn(move || source.latest(anchor.series_key))))
                    .collect();
                lookups
                    .into_iter()
                    .map(|(key, lookup)| (key, lookup.join().ok().flatten()))
                    .collect()
            }),
        };
        Self { quotes }
    }

    pub fn live(&self, anchor: &RateAnchor) -> Option<RateObservation> {
        self.quotes
            .iter()
            .find(|(key, _)| *key == anchor.series_key)
            .and_then(|(_, obs)| *obs)
    }
}

impl Strategy {
    pub fn name(self) -> &'static str {
        match self {
            Strategy::ExactAnchor => "exact anchor",
            Strategy::Interpolate => "interpolate",
            Strategy::Extrapolate => "extrapolate",
            Strategy::StaticFallback => "static fallback",
        }
    }

    /// Try this step; `None` hands over to the next one.
    pub fn attempt(self, loan_type: LoanType, term_years: u32, quotes: &AnchorQuotes) -> Option<ResolvedRate> {
        match self {
            Strategy::ExactAnchor => {
                let anchor = match loan_type {
                    LoanType::Adjustable if term_years == ARM_REFERENCE.term_years => ARM_REFERENCE,
                    LoanType::Fixed => match fixed_bracket(term_years) {
                        FixedBracket::Exact(a) => a,
                        _ => return None,
                    },
                    _ => return None,
                };
                let obs = quotes.live(&anchor)?;
                Some(resolved(obs.percent, RateOrigin::Live, obs.date))
            }
            Strategy::Interpolate => {
                let FixedBracket::Between(lo, hi) = fixed_bracket(term_years) else {
                    return None;
                };
                if loan_type != LoanType::Fixed {
                    return None;
                }
                let lo_obs = quotes.live(&lo)?;
                let hi_obs = quotes.live(&hi)?;
                let percent = interpolate(term_years, lo.term_years, lo_obs.percent, hi.term_years, hi_obs.percent);
                Some(resolved(percent, RateOrigin::Interpolated, lo_obs.date.max(hi_obs.date)))
            }
            Strategy::Extrapolate => match loan_type {
                LoanType::Adjustable => {
                    if term_years == ARM_REFERENCE.term_years {
                        return None;
                    }
                    let obs = quotes.live(&ARM_REFERENCE)?;
                    let percent = (obs.percent + arm_offset(term_years)).max(0.0);
                    Some(resolved(percent, RateOrigin::Extrapolated, obs.date))
                }
                LoanType::Fixed => match fixed_bracket(term_years) {
                    FixedBracket::Below(a) | FixedBracket::Above(a) => {
                        let obs = quotes.live(&a)?;
                        Some(resolved(obs.percent, RateOrigin::Extrapolated, obs.date))
                    }
                    _ => None,
                },
            },
            Strategy::StaticFallback => Some(static_fallback(loan_type, term_years)),
        }
    }
}

/// Last-known rates arranged in the same shape as the live strategies.
pub fn static_fallback(loan_type: LoanType, term_years: u32) -> ResolvedRate {
    let percent = match loan_type {
        LoanType::Adjustable => (last_known(&ARM_REFERENCE) + arm_offset(term_years)).max(0.0),
        LoanType::Fixed => match fixed_bracket(term_years) {
            FixedBracket::Exact(a) | FixedBracket::Below(a) | FixedBracket::Above(a) => last_known(&a),
            FixedBracket::Between(lo, hi) => {
                interpolate(term_years, lo.term_years, last_known(&lo), hi.term_years, last_known(&hi))
            }
        },
    };
    resolved(percent, RateOrigin::StaticFallback, None)
}

fn last_known(anchor: &RateAnchor) -> f64 {
    anchor.last_known_rate.unwrap_or(LAST_RESORT_PERCENT)
}

fn interpolate(term: u32, lo_term: u32, lo_rate: f64, hi_term: u32, hi_rate: f64) -> f64 {
    if hi_term <= lo_term {
        return lo_rate;
    }
    let w = f64::from(term.saturating_sub(lo_term)) / f64::from(hi_term - lo_term);
    lo_rate + (hi_rate - lo_rate) * w.clamp(0.0, 1.0)
}

fn resolved(annual_percent: f64, origin: RateOrigin, as_of: Option<NaiveDate>) -> ResolvedRate {
    ResolvedRate {
        annual_percent,
        origin,
        as_of,
    }
}

/// Latest value of one anchor series, for market summaries.
#[derive(Debug, Clone, Serialize)]
pub struct AnchorQuote {
    pub series_key: &'static str,
    pub loan_type: LoanType,
    pub term_years: u32,
    pub observation: Option<RateObservation>,
    pub last_known_rate: Option<f64>,
}

pub struct RateResolver {
    source: Arc<dyn RateSource>,
    chain: Vec<Strategy>,
}

impl RateResolver {
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self::with_chain(source, DEFAULT_CHAIN.to_vec())
    }

    pub fn with_chain(source: Arc<dyn RateSource>, chain: Vec<Strategy>) -> Self {
        Self { source, chain }
    }

    /// Resolve the annual rate for `(loan_type, term_years)`. Always returns a rate.
    pub fn resolve(&self, loan_type: LoanType, term_years: u32) -> ResolvedRate {
        let quotes = AnchorQuotes::fetch(self.source.as_ref(), &anchors_for(loan_type, term_years));

        for strategy in &self.chain {
            if let Some(rate) = strategy.attempt(loan_type, term_years, &quotes) {
                debug!(
                    ?loan_type,
                    term_years,
                    strategy = strategy.name(),
                    percent = rate.annual_percent,
                    "rate resolved"
                );
                return rate;
            }
        }

        // A chain without `StaticFallback` still has to answer.
        static_fallback(loan_type, term_years)
    }

    /// Latest observation of every anchor series.
    pub fn market_snapshot(&self) -> Vec<AnchorQuote> {
        let quotes = AnchorQuotes::fetch(self.source.as_ref(), &ANCHORS);
        ANCHORS
            .iter()
            .map(|anchor| AnchorQuote {
                series_key: anchor.series_key,
                loan_type: anchor.loan_type,
                term_years: anchor.term_years,
                observation: quotes.live(anchor),
                last_known_rate: anchor.last_known_rate,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use crate::data::OfflineSource;

    /// Fixed answers per series, counting lookups.
    #[derive(Default)]
    struct Scripted {
        values: HashMap<&'static str, f64>,
        calls: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn with(pairs: &[(&'static str, f64)]) -> Arc<Self> {
            Arc::new(Self {
                values: pairs.iter().copied().collect(),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            let mut calls = self.calls.lock().unwrap().clone();
            calls.sort();
            calls
        }
    }

    impl RateSource for Scripted {
        fn latest(&self, series_key: &str) -> Option<RateObservation> {
            self.calls.lock().unwrap().push(series_key.to_string());
            self.values.get(series_key).map(|&percent| RateObservation {
                date: NaiveDate::from_ymd_opt(2025, 6, 5),
                percent,
            })
        }
    }

    fn all_live() -> Arc<Scripted> {
        Scripted::with(&[("MORTGAGE15US", 5.9), ("MORTGAGE30US", 6.8), ("MORTGAGE5US", 6.1)])
    }

    #[test]
    fn exact_anchor_is_live() {
        let resolver = RateResolver::new(all_live());
        let rate = resolver.resolve(LoanType::Fixed, 30);
        assert_eq!(rate.annual_percent, 6.8);
        assert_eq!(rate.origin, RateOrigin::Live);
        assert_eq!(rate.as_of, NaiveDate::from_ymd_opt(2025, 6, 5));

        let rate = resolver.resolve(LoanType::Fixed, 15);
        assert_eq!(rate.annual_percent, 5.9);

        let rate = resolver.resolve(LoanType::Adjustable, 30);
        assert_eq!(rate.annual_percent, 6.1);
        assert_eq!(rate.origin, RateOrigin::Live);
    }

    #[test]
    fn interpolation_lies_between_anchors() {
        let resolver = RateResolver::new(all_live());
        let mut prev = 5.9;
        for term in 16..30 {
            let rate = resolver.resolve(LoanType::Fixed, term);
            assert_eq!(rate.origin, RateOrigin::Interpolated);
            assert!(rate.annual_percent > 5.9 && rate.annual_percent < 6.8);
            assert!(rate.annual_percent >= prev);
            prev = rate.annual_percent;
        }
        let twenty = resolver.resolve(LoanType::Fixed, 20).annual_percent;
        assert!((twenty - (5.9 + 0.9 * 5.0 / 15.0)).abs() < 1e-12);
    }

    #[test]
    fn interpolation_needs_both_anchors() {
        let resolver = RateResolver::new(Scripted::with(&[("MORTGAGE30US", 6.8)]));
        let rate = resolver.resolve(LoanType::Fixed, 20);
        assert_eq!(rate.origin, RateOrigin::StaticFallback);
        assert!((rate.annual_percent - (5.5 + 0.5 * 5.0 / 15.0)).abs() < 1e-12);
    }

    #[test]
    fn arm_offsets_are_additive() {
        let resolver = RateResolver::new(all_live());
        let cases = [(10, 5.6), (15, 5.6), (20, 5.85), (40, 6.35), (50, 6.6)];
        for (term, expected) in cases {
            let rate = resolver.resolve(LoanType::Adjustable, term);
            assert_eq!(rate.origin, RateOrigin::Extrapolated, "term={term}");
            assert!((rate.annual_percent - expected).abs() < 1e-12, "term={term}");
        }
    }

    #[test]
    fn arm_offsets_trend_with_term() {
        let mut prev = f64::NEG_INFINITY;
        for term in 1..=50 {
            let offset = arm_offset(term);
            assert!(offset >= prev);
            prev = offset;
        }
        assert_eq!(arm_offset(30), 0.0);
        assert!(arm_offset(10) < 0.0 && arm_offset(45) > 0.0);
    }

    #[test]
    fn fixed_terms_outside_anchors_use_nearest_anchor() {
        let resolver = RateResolver::new(all_live());
        let short = resolver.resolve(LoanType::Fixed, 10);
        assert_eq!(short.annual_percent, 5.9);
        assert_eq!(short.origin, RateOrigin::Extrapolated);
        let long = resolver.resolve(LoanType::Fixed, 40);
        assert_eq!(long.annual_percent, 6.8);
    }

    #[test]
    fn never_fails_when_source_is_down() {
        let resolver = RateResolver::new(Arc::new(OfflineSource));
        for loan_type in [LoanType::Fixed, LoanType::Adjustable] {
            for term in 0..=60 {
                let rate = resolver.resolve(loan_type, term);
                assert_eq!(rate.origin, RateOrigin::StaticFallback);
                assert!(rate.annual_percent.is_finite() && rate.annual_percent > 0.0);
            }
        }
        assert_eq!(resolver.resolve(LoanType::Fixed, 30).annual_percent, 6.0);
        assert_eq!(resolver.resolve(LoanType::Fixed, 15).annual_percent, 5.5);
        assert_eq!(resolver.resolve(LoanType::Adjustable, 30).annual_percent, 5.7);
    }

    #[test]
    fn each_series_is_queried_once() {
        let source = Scripted::with(&[]);
        let resolver = RateResolver::new(source.clone());
        resolver.resolve(LoanType::Fixed, 20);
        assert_eq!(source.calls(), vec!["MORTGAGE15US", "MORTGAGE30US"]);

        let source = Scripted::with(&[]);
        let resolver = RateResolver::new(source.clone());
        resolver.resolve(LoanType::Adjustable, 15);
        assert_eq!(source.calls(), vec!["MORTGAGE5US"]);
    }

    /// Answers every series after a fixed delay.
    struct Slow(std::time::Duration);

    impl RateSource for Slow {
        fn latest(&self, _series_key: &str) -> Option<RateObservation> {
            std::thread::sleep(self.0);
            Some(RateObservation {
                date: None,
                percent: 6.0,
            })
        }
    }

    #[test]
    fn concurrent_resolutions_do_not_queue_lookups() {
        let delay = std::time::Duration::from_millis(200);
        let resolver = Arc::new(RateResolver::new(Arc::new(Slow(delay))));

        let started = std::time::Instant::now();
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let resolver = Arc::clone(&resolver);
                std::thread::spawn(move || resolver.resolve(LoanType::Fixed, 20))
            })
            .collect();
        for worker in workers {
            assert_eq!(worker.join().unwrap().origin, RateOrigin::Interpolated);
        }

        // 16 lookups of 200 ms each; serialized they would take 3.2 s.
        assert!(started.elapsed() < delay * 5, "took {:?}", started.elapsed());
    }

    #[test]
    fn chain_without_static_step_still_answers() {
        let resolver = RateResolver::with_chain(Arc::new(OfflineSource), vec![Strategy::ExactAnchor]);
        let rate = resolver.resolve(LoanType::Fixed, 30);
        assert_eq!(rate.origin, RateOrigin::StaticFallback);
        assert_eq!(rate.annual_percent, 6.0);
    }

    #[test]
    fn market_snapshot_lists_every_anchor() {
        let resolver = RateResolver::new(Scripted::with(&[("MORTGAGE30US", 6.8)]));
        let snapshot = resolver.market_snapshot();
        assert_eq!(snapshot.len(), ANCHORS.len());
        let thirty = snapshot.iter().find(|q| q.series_key == "MORTGAGE30US").unwrap();
        assert_eq!(thirty.observation.map(|o| o.percent), Some(6.8));
        let arm = snapshot.iter().find(|q| q.series_key == "MORTGAGE5US").unwrap();
        assert!(arm.observation.is_none());
    }
}
