//! Externally supplied control feedback.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::FieldId;
use crate::numeric::clamp_unit;

/// Performance scores reported for one field.
///
/// Scores are clamped to [0, 1] when the value is constructed, so
/// out-of-range input never reaches the learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlFeedback {
    pub field_id: FieldId,
    pub performance: f64,
    pub coherence: f64,
    pub stability: f64,
    pub emergence: f64,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
}

impl ControlFeedback {
    pub fn new(
        field_id: FieldId,
        performance: f64,
        coherence: f64,
        stability: f64,
        emergence: f64,
    ) -> Self {
        Self {
            field_id,
            performance: clamp_unit(performance),
            coherence: clamp_unit(coherence),
            stability: clamp_unit(stability),
            emergence: clamp_unit(emergence),
            recommendation: String::new(),
            received_at: Utc::now(),
        }
    }

    pub fn with_recommendation(mut self, recommendation: impl Into<String>) -> Self {
        self.recommendation = recommendation.into();
        self
    }

    /// Re-clamp scores, for values that arrived through deserialization.
    pub fn sanitized(mut self) -> Self {
        self.performance = clamp_unit(self.performance);
        self.coherence = clamp_unit(self.coherence);
        self.stability = clamp_unit(self.stability);
        self.emergence = clamp_unit(self.emergence);
        self
    }

    /// Mean of performance, coherence and stability.
    pub fn effectiveness(&self) -> f64 {
        (self.performance + self.coherence + self.stability) / 3.0
    }
}
