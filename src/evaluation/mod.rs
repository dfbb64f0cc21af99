//! Evaluation engine
//!
//! Pure computation of how well one month of usage justifies a subscription's
//! cost. Nothing in here touches storage; the recorder feeds it snapshots of the
//! subscription and category and persists the outcome.

pub mod config;
pub mod policy;

pub use config::EvaluationConfig;
pub use policy::StatusPolicy;

use crate::database::entities::{
    Category, CategoryType, EvaluationStatus, Subscription, SubscriptionStatus,
};
use serde::Serialize;

/// Everything the engine needs to evaluate one (subscription, month)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationInput {
    pub usage_value: i32,
    pub reference_value: i32,
    pub category_type: CategoryType,
    pub monthly_cost: i64,
    pub subscription_status: SubscriptionStatus,
}

impl EvaluationInput {
    /// Capture the current subscription and category state for a usage sample
    pub fn from_snapshot(usage_value: i32, subscription: &Subscription, category: &Category) -> Self {
        Self {
            usage_value,
            reference_value: category.reference_value,
            category_type: category.category_type,
            monthly_cost: subscription.monthly_share_cost,
            subscription_status: subscription.status,
        }
    }
}

/// Computed fields of an evaluation record
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationOutcome {
    pub efficiency_rate: f64,
    pub status: EvaluationStatus,
    pub cost_per_unit: i64,
    pub annual_waste: i64,
    pub reference_snapshot_value: i32,
}

/// Usage as a percentage of the reference value.
///
/// Productivity tools are capped at 100%; content keeps counting past it.
pub fn efficiency_rate(usage_value: i32, reference_value: i32, category_type: CategoryType) -> f64 {
    if reference_value == 0 {
        return 0.0;
    }

    let rate = usage_value as f64 / reference_value as f64 * 100.0;
    match category_type {
        CategoryType::Productivity => rate.min(100.0),
        CategoryType::Content => rate,
    }
}

/// Monthly cost divided by usage, rounded half-up. Zero usage wastes the whole month.
pub fn cost_per_unit(monthly_cost: i64, usage_value: i32) -> i64 {
    if usage_value <= 0 {
        return monthly_cost;
    }
    (monthly_cost as f64 / usage_value as f64).round() as i64
}

/// Yearly spend attributable to under-use at the given rate, ignoring trial status
pub fn projected_annual_waste(monthly_cost: i64, efficiency_rate: f64) -> i64 {
    if efficiency_rate >= 100.0 {
        return 0;
    }
    (monthly_cost as f64 * (1.0 - efficiency_rate / 100.0) * 12.0).round() as i64
}

/// Run the full evaluation for one usage sample
pub fn evaluate(input: &EvaluationInput, policy: &StatusPolicy) -> EvaluationOutcome {
    let rate = efficiency_rate(input.usage_value, input.reference_value, input.category_type);

    // Nothing has been paid during a trial, so there is nothing realized to waste
    let annual_waste = if input.subscription_status.is_trial() {
        0
    } else {
        projected_annual_waste(input.monthly_cost, rate)
    };

    EvaluationOutcome {
        efficiency_rate: rate,
        status: policy.classify(rate, input.usage_value),
        cost_per_unit: cost_per_unit(input.monthly_cost, input.usage_value),
        annual_waste,
        reference_snapshot_value: input.reference_value,
    }
}
