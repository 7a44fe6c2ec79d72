//! Types for the adaptive feedback learner.

use serde::{Deserialize, Serialize};

use resonance_core::numeric::clamp_range;

/// The three global gains.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveGains {
    pub performance_gain: f64,
    pub coherence_gain: f64,
    pub stability_gain: f64,
}

impl AdaptiveGains {
    pub fn uniform(gain: f64) -> Self {
        Self {
            performance_gain: gain,
            coherence_gain: gain,
            stability_gain: gain,
        }
    }

    /// Multiply every gain by `factor`, clamping into `[min, max]`.
    pub(crate) fn scaled(self, factor: f64, min: f64, max: f64) -> Self {
        Self {
            performance_gain: clamp_range(self.performance_gain * factor, min, max),
            coherence_gain: clamp_range(self.coherence_gain * factor, min, max),
            stability_gain: clamp_range(self.stability_gain * factor, min, max),
        }
    }

    pub fn within(&self, min: f64, max: f64) -> bool {
        [self.performance_gain, self.coherence_gain, self.stability_gain]
            .iter()
            .all(|g| (min..=max).contains(g))
    }
}

/// Introspection view of a learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnerSnapshot {
    pub gains: AdaptiveGains,
    pub tracked_fields: usize,
    pub total_processed: u64,
    pub batches: u64,
    /// Mean effectiveness of the most recent non-empty batch.
    pub last_effectiveness: Option<f64>,
}
