//! Quote aggregation.
//!
//! normalize down payment → loan amount → rate → PMI → insurance → P&I → monthly total.

use std::sync::Arc;

use crate::data::RateSource;
use crate::domain::{QuoteBreakdown, QuoteRequest, QuoteResult, RateOrigin, ResolvedRate};
use crate::quote::amortization::monthly_payment;
use crate::quote::down_payment::{loan_amount, normalize};
use crate::quote::insurance::{InsuranceEstimator, RegionHeuristic, resolve_annual_premium};
use crate::quote::pmi::{PmiEstimator, StepTablePmi, monthly_pmi, pmi_notice, resolve_pmi_percent};
use crate::quote::rate::RateResolver;
use crate::quote::{round_money, round_rate};

pub struct QuoteEngine {
    resolver: RateResolver,
    pmi: Box<dyn PmiEstimator>,
    insurance: Box<dyn InsuranceEstimator>,
}

impl QuoteEngine {
    /// Engine with the default resolver chain and heuristic estimators.
    pub fn new(source: Arc<dyn RateSource>) -> Self {
        Self::with_estimators(
            RateResolver::new(source),
            Box::new(StepTablePmi::default()),
            Box::new(RegionHeuristic),
        )
    }

    pub fn with_estimators(
        resolver: RateResolver,
        pmi: Box<dyn PmiEstimator>,
        insurance: Box<dyn InsuranceEstimator>,
    ) -> Self {
        Self {
            resolver,
            pmi,
            insurance,
        }
    }

    pub fn resolver(&self) -> &RateResolver {
        &self.resolver
    }

    /// The caller's rate when positive, otherwise the resolver's.
    pub fn resolve_rate(&self, request: &QuoteRequest) -> ResolvedRate {
        match request.rate_override_percent {
            Some(v) if v.is_finite() && v > 0.0 => ResolvedRate {
                annual_percent: v,
                origin: RateOrigin::Override,
                as_of: None,
            },
            _ => self.resolver.resolve(request.loan_type, request.loan_term_years),
        }
    }

    /// Produce a quote for a request that already passed [`QuoteRequest::validate`].
    pub fn quote(&self, request: &QuoteRequest) -> QuoteResult {
        let down = normalize(request.home_value, request.down_payment_value, request.down_payment_type);
        let loan = match request.loan_amount_override {
            Some(v) if v.is_finite() => v.max(0.0),
            _ => loan_amount(request.home_value, &down),
        };

        let rate = self.resolve_rate(request);
        let pmi_percent = resolve_pmi_percent(self.pmi.as_ref(), down.percent, request.pmi_override_percent);
        let (insurance_annual, insurance_estimated) = resolve_annual_premium(
            self.insurance.as_ref(),
            request.home_value,
            request.region.as_deref(),
            request.insurance_annual_override,
        );

        let monthly = QuoteBreakdown {
            principal_and_interest: monthly_payment(loan, rate.annual_percent, request.loan_term_years),
            property_tax: request.property_tax_annual / 12.0,
            insurance: insurance_annual / 12.0,
            pmi: monthly_pmi(loan, pmi_percent),
            hoa: request.hoa_monthly,
        };

        let pmi_notice = (monthly.pmi > 0.0).then(|| pmi_notice(down.percent, pmi_percent));

        QuoteResult {
            loan_amount: round_money(loan),
            down_payment_amount: round_money(down.amount),
            down_payment_percent: round_rate(down.percent),
            rate: ResolvedRate {
                annual_percent: round_rate(rate.annual_percent),
                ..rate
            },
            pmi_percent: round_rate(pmi_percent),
            insurance_estimated,
            monthly_total: round_money(monthly.total()),
            breakdown: QuoteBreakdown {
                principal_and_interest: round_money(monthly.principal_and_interest),
                property_tax: round_money(monthly.property_tax),
                insurance: round_money(monthly.insurance),
                pmi: round_money(monthly.pmi),
                hoa: round_money(monthly.hoa),
            },
            pmi_notice,
        }
    }
}
