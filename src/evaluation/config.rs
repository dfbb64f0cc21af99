use serde::{Deserialize, Serialize};

/// Rate thresholds (in percent) used by the default status policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    #[serde(default = "default_efficient_threshold")]
    pub efficient_threshold: f64,
    #[serde(default = "default_keep_threshold")]
    pub keep_threshold: f64,
    #[serde(default = "default_review_threshold")]
    pub review_threshold: f64,
}

fn default_efficient_threshold() -> f64 {
    100.0
}

fn default_keep_threshold() -> f64 {
    70.0
}

fn default_review_threshold() -> f64 {
    40.0
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            efficient_threshold: default_efficient_threshold(),
            keep_threshold: default_keep_threshold(),
            review_threshold: default_review_threshold(),
        }
    }
}

impl EvaluationConfig {
    /// Thresholds must be non-negative and ordered review <= keep <= efficient
    pub fn validate(&self) -> Result<(), String> {
        let thresholds = [
            ("review_threshold", self.review_threshold),
            ("keep_threshold", self.keep_threshold),
            ("efficient_threshold", self.efficient_threshold),
        ];
        if let Some((name, value)) = thresholds
            .iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(format!("{} must be a non-negative number, got {}", name, value));
        }
        if self.review_threshold > self.keep_threshold
            || self.keep_threshold > self.efficient_threshold
        {
            return Err(format!(
                "thresholds must satisfy review ({}) <= keep ({}) <= efficient ({})",
                self.review_threshold, self.keep_threshold, self.efficient_threshold
            ));
        }
        Ok(())
    }
}
