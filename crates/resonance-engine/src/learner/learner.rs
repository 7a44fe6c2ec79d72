//! AdaptiveFeedbackLearner implementation.

use std::collections::{HashMap, VecDeque};

use tracing::{debug, info};

use resonance_core::numeric::mean;
use resonance_core::{ControlFeedback, FieldId, LearnerConfig, Network, ResonanceResult};

use super::types::{AdaptiveGains, LearnerSnapshot};

/// Feedback-driven learner with per-field bounded history.
#[derive(Debug, Clone)]
pub struct AdaptiveFeedbackLearner {
    config: LearnerConfig,
    gains: AdaptiveGains,
    history: HashMap<FieldId, VecDeque<ControlFeedback>>,
    total_processed: u64,
    batches: u64,
    last_effectiveness: Option<f64>,
}

impl AdaptiveFeedbackLearner {
    pub fn new(config: LearnerConfig) -> ResonanceResult<Self> {
        config.validate()?;
        let gains = AdaptiveGains::uniform(config.initial_gain);
        Ok(Self {
            config,
            gains,
            history: HashMap::new(),
            total_processed: 0,
            batches: 0,
            last_effectiveness: None,
        })
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    #[inline]
    pub fn gains(&self) -> AdaptiveGains {
        self.gains
    }

    /// Retained feedback for `id`, oldest first.
    pub fn history(&self, id: FieldId) -> Option<&VecDeque<ControlFeedback>> {
        self.history.get(&id)
    }

    pub fn total_processed(&self) -> u64 {
        self.total_processed
    }

    pub fn snapshot(&self) -> LearnerSnapshot {
        LearnerSnapshot {
            gains: self.gains,
            tracked_fields: self.history.len(),
            total_processed: self.total_processed,
            batches: self.batches,
            last_effectiveness: self.last_effectiveness,
        }
    }

    /// Apply a feedback batch to `network` and adapt the gains.
    ///
    /// Every field id is checked before anything is mutated, so an unknown
    /// id fails the whole batch with `UnknownField` and leaves both the
    /// network and the learner untouched.
    pub fn apply_feedback(
        &mut self,
        network: &mut Network,
        feedback: &[ControlFeedback],
    ) -> ResonanceResult<AdaptiveGains> {
        for item in feedback {
            network.index_of(item.field_id)?;
        }
        if feedback.is_empty() {
            return Ok(self.gains);
        }

        let gains = self.gains;
        let mut effectiveness = Vec::with_capacity(feedback.len());
        for item in feedback {
            let item = item.clone().sanitized();
            let field = network.field_mut(item.field_id)?;

            let amplitude_factor =
                1.0 + gains.performance_gain * (self.config.target_performance - item.performance);
            field.set_amplitude(field.amplitude() * amplitude_factor);
            field.set_entropy(
                field.entropy() - gains.coherence_gain * (self.config.target_coherence - item.coherence),
            );
            field.set_stability(
                field.stability() + gains.stability_gain * (self.config.target_stability - item.stability),
            );
            field.touch();

            effectiveness.push(item.effectiveness());
            self.remember(item);
        }

        let batch_effectiveness = mean(&effectiveness);
        self.adapt_gains(batch_effectiveness);
        self.total_processed += feedback.len() as u64;
        self.batches += 1;
        self.last_effectiveness = Some(batch_effectiveness);

        debug!(
            items = feedback.len(),
            effectiveness = batch_effectiveness,
            performance_gain = self.gains.performance_gain,
            coherence_gain = self.gains.coherence_gain,
            stability_gain = self.gains.stability_gain,
            "Applied feedback batch"
        );
        Ok(self.gains)
    }

    fn remember(&mut self, item: ControlFeedback) {
        let cap = self.config.history_cap;
        // grows on demand; history_cap is only an upper bound
        let entries = self.history.entry(item.field_id).or_default();
        while entries.len() >= cap {
            entries.pop_front();
        }
        entries.push_back(item);
    }

    fn adapt_gains(&mut self, effectiveness: f64) {
        let (min, max) = (self.config.gain_min, self.config.gain_max);
        if effectiveness > self.config.high_effectiveness {
            self.gains = self.gains.scaled(self.config.gain_growth, min, max);
            info!(effectiveness, "Feedback effective; gains increased");
        } else if effectiveness < self.config.low_effectiveness {
            self.gains = self.gains.scaled(self.config.gain_decay, min, max);
            info!(effectiveness, "Feedback ineffective; gains decreased");
        }
    }

    /// Drop all history and restore the initial gains.
    pub fn reset(&mut self) {
        self.gains = AdaptiveGains::uniform(self.config.initial_gain);
        self.history.clear();
        self.total_processed = 0;
        self.batches = 0;
        self.last_effectiveness = None;
    }
}
