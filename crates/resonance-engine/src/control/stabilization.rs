//! Iterative stabilization of a network.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use resonance_core::{refresh_metrics, stability_score, Network, ResonanceResult, StabilizationConfig};

use super::cancel::CancelFlag;
use crate::integrator::OscillatorIntegrator;

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlState {
    #[default]
    Stabilizing,
    Stabilized,
}

/// Result of a stabilization run. Hitting the iteration cap is reported
/// here with `stabilized: false`, not as an error.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StabilizationOutcome {
    pub stabilized: bool,
    /// Control iterations performed (nudge, step, refresh).
    pub iterations: usize,
    pub initial_score: f64,
    pub final_score: f64,
    pub state: ControlState,
    pub cancelled: bool,
}

/// Drives a network toward a stability score threshold.
///
/// Each iteration scores the network; below threshold, every field whose
/// stability is under the threshold is nudged in proportion to its deficit,
/// then the network is integrated one step and its metrics refreshed.
#[derive(Debug, Clone)]
pub struct StabilizationController {
    config: StabilizationConfig,
    integrator: OscillatorIntegrator,
    state: ControlState,
    cancel: CancelFlag,
}

impl StabilizationController {
    pub fn new(config: StabilizationConfig, integrator: OscillatorIntegrator) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            integrator,
            state: ControlState::Stabilizing,
            cancel: CancelFlag::new(),
        })
    }

    pub fn config(&self) -> &StabilizationConfig {
        &self.config
    }

    pub fn state(&self) -> ControlState {
        self.state
    }

    /// Handle that cancels the running (or next) stabilization.
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    pub fn stabilize<R: Rng + ?Sized>(&mut self, network: &mut Network, rng: &mut R) -> StabilizationOutcome {
        self.state = ControlState::Stabilizing;
        let threshold = self.config.stability_threshold;
        let initial_score = stability_score(network);
        let mut score = initial_score;
        let mut iterations = 0;

        debug!(
            fields = network.len(),
            initial_score,
            threshold,
            max_iterations = self.config.max_iterations,
            "Starting stabilization"
        );

        loop {
            if score >= threshold {
                self.state = ControlState::Stabilized;
                break;
            }
            if iterations >= self.config.max_iterations {
                break;
            }
            if self.cancel.is_cancelled() {
                self.cancel.reset();
                info!(iterations, score, "Stabilization cancelled");
                return self.outcome(iterations, initial_score, score, true);
            }

            self.nudge(network);
            self.integrator.step(network, self.integrator.default_dt(), rng);
            refresh_metrics(network);
            iterations += 1;
            score = stability_score(network);
            trace!(iterations, score, "Stabilization iteration");
        }

        let outcome = self.outcome(iterations, initial_score, score, false);
        info!(
            stabilized = outcome.stabilized,
            iterations,
            final_score = score,
            "Stabilization finished"
        );
        outcome
    }

    fn nudge(&self, network: &mut Network) {
        let threshold = self.config.stability_threshold;
        let gain = self.config.control_gain;
        for field in network.fields_mut() {
            let deficit = threshold - field.stability();
            if deficit <= 0.0 {
                continue;
            }
            let adjustment = gain * deficit;
            field.set_amplitude(field.amplitude() * (1.0 - adjustment));
            field.set_entropy(field.entropy() * (1.0 - adjustment));
            field.set_stability(field.stability() + adjustment);
        }
    }

    fn outcome(&self, iterations: usize, initial_score: f64, final_score: f64, cancelled: bool) -> StabilizationOutcome {
        StabilizationOutcome {
            stabilized: self.state == ControlState::Stabilized,
            iterations,
            initial_score,
            final_score,
            state: self.state,
            cancelled,
        }
    }
}
