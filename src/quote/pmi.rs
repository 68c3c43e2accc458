//! Private mortgage insurance estimate.
//!
//! PMI is quoted as an annual percent of the loan amount. The default estimator is a
//! step table keyed on down payment percent; any [`PmiEstimator`] can replace it.

/// Maps a down payment percent to an annual PMI percent.
pub trait PmiEstimator: Send + Sync {
    fn annual_percent(&self, down_payment_percent: f64) -> f64;
}

/// One row of the step table: at least `min_down_percent` down → `annual_percent`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PmiStep {
    pub min_down_percent: f64,
    pub annual_percent: f64,
}

/// Descending thresholds; first match wins.
pub const STANDARD_PMI_STEPS: [PmiStep; 3] = [
    PmiStep { min_down_percent: 20.0, annual_percent: 0.0 },
    PmiStep { min_down_percent: 15.0, annual_percent: 0.35 },
    PmiStep { min_down_percent: 10.0, annual_percent: 0.65 },
];

/// Rate below the lowest threshold.
pub const STANDARD_PMI_FLOOR_PERCENT: f64 = 0.95;

// Absorbs float noise from amount → percent conversion (30_000 / 300_000 * 100).
const THRESHOLD_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone)]
pub struct StepTablePmi {
    steps: Vec<PmiStep>,
    floor_percent: f64,
}

impl StepTablePmi {
    /// `steps` are sorted by descending threshold before use.
    pub fn new(mut steps: Vec<PmiStep>, floor_percent: f64) -> Self {
        steps.sort_by(|a, b| {
            b.min_down_percent
                .partial_cmp(&a.min_down_percent)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { steps, floor_percent }
    }
}

impl Default for StepTablePmi {
    fn default() -> Self {
        Self::new(STANDARD_PMI_STEPS.to_vec(), STANDARD_PMI_FLOOR_PERCENT)
    }
}

impl PmiEstimator for StepTablePmi {
    fn annual_percent(&self, down_payment_percent: f64) -> f64 {
        self.steps
            .iter()
            .find(|step| down_payment_percent + THRESHOLD_EPSILON >= step.min_down_percent)
            .map(|step| step.annual_percent)
            .unwrap_or(self.floor_percent)
    }
}

/// Annual PMI percent: a finite, non-negative override wins outright.
pub fn resolve_pmi_percent(
    estimator: &dyn PmiEstimator,
    down_payment_percent: f64,
    override_percent: Option<f64>,
) -> f64 {
    match override_percent {
        Some(v) if v.is_finite() && v >= 0.0 => v,
        _ => estimator.annual_percent(down_payment_percent),
    }
}

/// Monthly PMI cost; exactly zero when the percent is zero.
pub fn monthly_pmi(loan_amount: f64, annual_percent: f64) -> f64 {
    if annual_percent <= 0.0 || loan_amount <= 0.0 {
        return 0.0;
    }
    loan_amount * annual_percent / 100.0 / 12.0
}

/// Explanation shown alongside a quote that carries PMI.
pub fn pmi_notice(down_payment_percent: f64, annual_percent: f64) -> String {
    format!(
        "Down payment is {down_payment_percent:.2}% of the home value, below the 20% needed to avoid \
         private mortgage insurance. PMI is estimated at {annual_percent:.2}% of the loan amount per year; \
         actual premiums depend on credit score and lender and typically fall between 0.3% and 1.5%."
    )
}
