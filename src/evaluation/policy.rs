use super::config::EvaluationConfig;
use crate::database::entities::EvaluationStatus;
use std::{fmt, sync::Arc};

type ClassifyFn = dyn Fn(f64, i32) -> EvaluationStatus + Send + Sync;

/// Strategy that turns an efficiency rate and raw usage into a status.
///
/// The recorder receives one of these at construction, so category-specific
/// rules can be plugged in without touching the engine.
#[derive(Clone)]
pub struct StatusPolicy {
    classify: Arc<ClassifyFn>,
}

impl StatusPolicy {
    pub fn new<F>(classify: F) -> Self
    where
        F: Fn(f64, i32) -> EvaluationStatus + Send + Sync + 'static,
    {
        Self {
            classify: Arc::new(classify),
        }
    }

    /// Default tiered policy with the given thresholds
    pub fn with_thresholds(config: &EvaluationConfig) -> Self {
        let config = config.clone();
        Self::new(move |rate, usage_value| tiered_status(&config, rate, usage_value))
    }

    pub fn classify(&self, efficiency_rate: f64, usage_value: i32) -> EvaluationStatus {
        (self.classify)(efficiency_rate, usage_value)
    }
}

impl Default for StatusPolicy {
    fn default() -> Self {
        Self::with_thresholds(&EvaluationConfig::default())
    }
}

impl fmt::Debug for StatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusPolicy").finish_non_exhaustive()
    }
}

/// First match wins; zero usage is GHOST whatever the rate says.
pub fn tiered_status(config: &EvaluationConfig, rate: f64, usage_value: i32) -> EvaluationStatus {
    if usage_value == 0 {
        return EvaluationStatus::Ghost;
    }

    if rate >= config.efficient_threshold {
        EvaluationStatus::Efficient
    } else if rate >= config.keep_threshold {
        EvaluationStatus::Keep
    } else if rate >= config.review_threshold {
        EvaluationStatus::Review
    } else {
        EvaluationStatus::Inefficient
    }
}
