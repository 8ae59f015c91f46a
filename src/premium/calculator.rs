//! Premium calculator
//!
//! Looks up coefficients in the rate tables and applies the closed-form
//! premium formulas. Pure: identical inputs give identical quotes.

use super::input::{FinancingTerms, ProjectInput};
use super::result::{LongTermPremium, PostShipmentPremium, PreShipmentPremium, PremiumQuote, TranchePremium};
use super::tenor::{risk_tenor, LongTermTenor};
use super::{
    round_amount, CATEGORY_ZERO_LONG_TERM_WARNING, CATEGORY_ZERO_SHORT_TERM_WARNING,
    NO_DELIVERY_WINDOW_WARNING, NO_EQUIPMENT_START_WARNING, NO_STARTING_POINT_WARNING,
    PARTIAL_DELIVERY_WINDOW_WARNING,
};
use crate::classification::{BuyerCategory, CountryCategory};
use crate::error::PremiumError;
use crate::rates::{round_percent, RateTables};
use crate::schedule::{PaymentTranche, Phase, ProjectSchedule};

/// Main premium calculator
#[derive(Debug, Clone, Default)]
pub struct PremiumCalculator {
    tables: RateTables,
}

fn push_warning(warnings: &mut Vec<String>, message: impl Into<String>) {
    let message = message.into();
    if !warnings.contains(&message) {
        log::warn!("{}", message);
        warnings.push(message);
    }
}

impl PremiumCalculator {
    pub fn new(tables: RateTables) -> Self {
        Self { tables }
    }

    /// Pre-shipment coefficient sqrt(a * FBZ) + b, unrounded
    pub fn pre_shipment_coefficient(&self, category: CountryCategory, fbz: f64) -> Result<f64, PremiumError> {
        if fbz.is_nan() || fbz < 0.0 {
            return Err(PremiumError::InvalidInput(format!("FBZ must be non-negative, got {}", fbz)));
        }
        Ok(self.tables.pre_shipment.rates(category).coefficient(fbz))
    }

    /// Pre-shipment and counter-guarantee premiums.
    ///
    /// Percentages are `round(coefficient * self_cost / 100, 2)` and
    /// `round(counter_guarantee * guarantee / 100, 2)`; amounts apply them to
    /// the covered share of the contract value.
    pub fn pre_shipment(
        &self,
        category: CountryCategory,
        fbz: f64,
        self_cost_percent: f64,
        guarantee_percent: f64,
        contract_value: f64,
        schedule: &ProjectSchedule,
    ) -> Result<PreShipmentPremium, PremiumError> {
        let rates = self.tables.pre_shipment.rates(category);
        let coefficient = self.pre_shipment_coefficient(category, fbz)?;
        let premium_percent = round_percent(coefficient * self_cost_percent / 100.0);
        let covered_share_percent = schedule.pre_shipment_share();

        let counter_guarantee_percent = round_percent(rates.counter_guarantee * guarantee_percent / 100.0);
        let counter_guarantee_share_percent = schedule.total_share();

        Ok(PreShipmentPremium {
            fbz,
            coefficient,
            self_cost_percent,
            premium_percent,
            covered_share_percent,
            premium_amount: round_amount(
                contract_value * covered_share_percent / 100.0 * premium_percent / 100.0,
            ),
            formula: format!(
                "sqrt({} * {}) + {} = {:.4}; {:.4} * {}% = {:.2}%",
                rates.a, fbz, rates.b, coefficient, coefficient, self_cost_percent, premium_percent
            ),
            counter_guarantee_coefficient: rates.counter_guarantee,
            guarantee_percent,
            counter_guarantee_percent,
            counter_guarantee_share_percent,
            counter_guarantee_amount: round_amount(
                contract_value * counter_guarantee_share_percent / 100.0 * counter_guarantee_percent / 100.0,
            ),
            counter_guarantee_formula: format!(
                "{} * {}% = {:.2}%",
                rates.counter_guarantee, guarantee_percent, counter_guarantee_percent
            ),
        })
    }

    /// Short-term rate: round(m * risk_tenor + n, 2)
    pub fn short_term_rate(
        &self,
        category: CountryCategory,
        buyer: BuyerCategory,
        risk_tenor: f64,
    ) -> Result<f64, PremiumError> {
        self.tables.short_term.premium(category, buyer, risk_tenor)
    }

    /// Long-term rate: round(m * risk_tenor_years + n, 2)
    pub fn long_term_rate(
        &self,
        category: CountryCategory,
        buyer: BuyerCategory,
        risk_tenor_years: f64,
    ) -> Result<f64, PremiumError> {
        self.tables.long_term.premium(category, buyer, risk_tenor_years)
    }

    /// Short-term premium for one tranche; down payments are exempt
    pub fn tranche_premium(
        &self,
        category: CountryCategory,
        buyer: BuyerCategory,
        tranche: &PaymentTranche,
        schedule: &ProjectSchedule,
        contract_value: f64,
    ) -> Result<TranchePremium, PremiumError> {
        let average_phase_month = schedule.average_month(tranche.phase);
        let tenor = risk_tenor(tranche.payment_month, average_phase_month);
        let down_payment = tranche.is_down_payment();

        let (rate_percent, premium_percent, formula) = if down_payment {
            (0.0, 0.0, "down payment: exempt".to_string())
        } else {
            let cell = self.tables.short_term.cell(category, buyer)?;
            let rate = self.short_term_rate(category, buyer, tenor)?;
            let premium = round_percent(rate * tranche.amount_percent / 100.0);
            let formula = format!(
                "round({} * {} + {}, 2) = {:.2}%; {:.2}% * {}% = {:.2}%",
                cell.slope, tenor, cell.intercept, rate, rate, tranche.amount_percent, premium
            );
            (rate, premium, formula)
        };

        Ok(TranchePremium {
            name: tranche.name.clone(),
            phase: tranche.phase,
            payment_month: tranche.payment_month,
            amount_percent: tranche.amount_percent,
            average_phase_month,
            risk_tenor: tenor,
            down_payment,
            rate_percent,
            premium_percent,
            premium_amount: round_amount(contract_value * premium_percent / 100.0),
            formula,
        })
    }

    /// Short-term premiums over all tranches, with advisory warnings
    pub fn post_shipment(
        &self,
        category: CountryCategory,
        buyer: BuyerCategory,
        schedule: &ProjectSchedule,
        tranches: &[PaymentTranche],
        contract_value: f64,
        warnings: &mut Vec<String>,
    ) -> Result<PostShipmentPremium, PremiumError> {
        if category.needs_benchmark() && !tranches.is_empty() {
            push_warning(warnings, CATEGORY_ZERO_SHORT_TERM_WARNING);
        }

        let mut lines = Vec::with_capacity(tranches.len());
        for tranche in tranches {
            if !tranche.is_down_payment() {
                schedule_warnings(schedule, tranche.phase, warnings);
            }
            lines.push(self.tranche_premium(category, buyer, tranche, schedule, contract_value)?);
        }

        let total_percent = round_percent(lines.iter().map(|l| l.premium_percent).sum());
        let total_amount = round_amount(lines.iter().map(|l| l.premium_amount).sum());

        Ok(PostShipmentPremium {
            tranches: lines,
            total_percent,
            total_amount,
        })
    }

    /// Long-term financing premium on the financed amount
    pub fn long_term(
        &self,
        category: CountryCategory,
        buyer: BuyerCategory,
        schedule: &ProjectSchedule,
        financing: &FinancingTerms,
        contract_value: f64,
        warnings: &mut Vec<String>,
    ) -> Result<LongTermPremium, PremiumError> {
        if category.needs_benchmark() {
            push_warning(warnings, CATEGORY_ZERO_LONG_TERM_WARNING);
        }

        let tenor = LongTermTenor::from_schedule(schedule, financing.loan_tenor_years);
        if tenor.assumed_pre_risk() {
            push_warning(warnings, NO_STARTING_POINT_WARNING);
        }

        let cell = self.tables.long_term.cell(category, buyer)?;
        let rate_percent = self.long_term_rate(category, buyer, tenor.years)?;
        let financed_amount = round_amount(contract_value * financing.financed_percent / 100.0);

        Ok(LongTermPremium {
            starting_point: tenor.starting_point,
            pre_risk_years: tenor.pre_risk_years,
            loan_tenor_years: tenor.loan_tenor_years,
            risk_tenor_years: tenor.years,
            rate_percent,
            financed_percent: financing.financed_percent,
            financed_amount,
            premium_amount: round_amount(financed_amount * rate_percent / 100.0),
            formula: format!(
                "round({} * {:.4} + {}, 2) = {:.2}%",
                cell.slope, tenor.years, cell.intercept, rate_percent
            ),
        })
    }

    /// Full quote for a project
    pub fn quote(&self, input: &ProjectInput) -> Result<PremiumQuote, PremiumError> {
        input.validate()?;

        let category = input.country_category;
        let buyer = input.buyer_category;
        let mut warnings = Vec::new();

        if input.fbz.is_none() {
            let equipment = &input.schedule.equipment;
            if equipment.start_month.is_none() {
                push_warning(&mut warnings, NO_EQUIPMENT_START_WARNING);
            }
        }

        let pre_shipment = self.pre_shipment(
            category,
            input.effective_fbz(),
            input.self_cost_percent,
            input.guarantee_percent,
            input.contract_value,
            &input.schedule,
        )?;

        let post_shipment = self.post_shipment(
            category,
            buyer,
            &input.schedule,
            &input.tranches,
            input.contract_value,
            &mut warnings,
        )?;

        let long_term = input
            .financing
            .as_ref()
            .map(|financing| {
                self.long_term(category, buyer, &input.schedule, financing, input.contract_value, &mut warnings)
            })
            .transpose()?;

        let total_premium_amount = round_amount(
            pre_shipment.premium_amount
                + pre_shipment.counter_guarantee_amount
                + post_shipment.total_amount
                + long_term.as_ref().map_or(0.0, |lt| lt.premium_amount),
        );

        log::debug!(
            "Quoted cat {} (applied {}) {}: total {}",
            category,
            category.benchmark(),
            buyer,
            total_premium_amount
        );

        Ok(PremiumQuote {
            country_category: category,
            applied_category: category.benchmark(),
            buyer_category: buyer,
            contract_value: input.contract_value,
            pre_shipment,
            post_shipment,
            long_term,
            total_premium_amount,
            warnings,
        })
    }
}

/// Advisory notices for a phase with missing delivery bounds
fn schedule_warnings(schedule: &ProjectSchedule, phase: Phase, warnings: &mut Vec<String>) {
    let window = schedule.phase(phase);
    if !window.has_bounds() {
        push_warning(warnings, format!("{}: {}", NO_DELIVERY_WINDOW_WARNING, phase));
    } else if window.is_partial() {
        push_warning(warnings, format!("{}: {}", PARTIAL_DELIVERY_WINDOW_WARNING, phase));
    }
}
