//! Timeout-bounded induction of a target emergence type.

use std::fmt;
use std::time::{Duration, Instant};

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use resonance_core::constants::control::MIN_PERTURBATION;
use resonance_core::{
    refresh_metrics, EmergenceConfig, EmergenceEvent, EmergenceType, FieldId, Network,
    ResonanceError, ResonanceResult, TAG_TIMEOUT,
};

use super::cancel::CancelFlag;
use crate::detector::{annotate_participants, EmergenceDetector};
use crate::integrator::OscillatorIntegrator;

/// Outcome tag added to fallbacks produced by cancellation, in place of
/// `timeout`.
pub const TAG_CANCELLED: &str = "cancelled";

/// What the caller wants to induce.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergenceTarget {
    pub emergence_type: EmergenceType,
    /// Requested strength, in (0, 1].
    pub strength: f64,
    /// Requested duration of the behaviour. Informational.
    pub duration: Duration,
    /// Fields to perturb. Empty means every field.
    pub participants: Vec<FieldId>,
}

impl EmergenceTarget {
    pub fn new(emergence_type: EmergenceType, strength: f64) -> Self {
        Self {
            emergence_type,
            strength,
            duration: Duration::ZERO,
            participants: Vec::new(),
        }
    }

    pub fn with_participants(mut self, participants: Vec<FieldId>) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Per-type preparation run once before the first perturbation.
pub trait EmergencePreparation: Send + Sync {
    fn prepare(&self, network: &mut Network, target: &EmergenceTarget) -> ResonanceResult<()>;
}

/// Preparation that leaves the network unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPreparation;

impl EmergencePreparation for NoPreparation {
    fn prepare(&self, _network: &mut Network, _target: &EmergenceTarget) -> ResonanceResult<()> {
        Ok(())
    }
}

/// Perturbs participants until the detector reports the target type at
/// sufficient strength, or the wall-clock timeout elapses.
///
/// A timeout yields a reduced-strength, control-induced fallback event
/// rather than an error.
pub struct EmergenceController {
    config: EmergenceConfig,
    integrator: OscillatorIntegrator,
    preparation: Box<dyn EmergencePreparation>,
    cancel: CancelFlag,
}

impl fmt::Debug for EmergenceController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmergenceController")
            .field("config", &self.config)
            .field("integrator", &self.integrator)
            .finish_non_exhaustive()
    }
}

impl EmergenceController {
    pub fn new(config: EmergenceConfig, integrator: OscillatorIntegrator) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            integrator,
            preparation: Box::new(NoPreparation),
            cancel: CancelFlag::new(),
        })
    }

    pub fn with_preparation(mut self, preparation: Box<dyn EmergencePreparation>) -> Self {
        self.preparation = preparation;
        self
    }

    pub fn config(&self) -> &EmergenceConfig {
        &self.config
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Induce `target` using the configured timeout.
    pub fn induce<R: Rng + ?Sized>(
        &mut self,
        network: &mut Network,
        detector: &mut EmergenceDetector,
        target: &EmergenceTarget,
        rng: &mut R,
    ) -> ResonanceResult<EmergenceEvent> {
        let timeout = self.config.timeout();
        self.induce_within(network, detector, target, timeout, rng)
    }

    /// Induce `target`, giving up after `timeout`.
    ///
    /// Fails only for invalid input: an unknown participant yields
    /// `UnknownField`, a strength outside (0, 1] `InvalidParameter`.
    pub fn induce_within<R: Rng + ?Sized>(
        &mut self,
        network: &mut Network,
        detector: &mut EmergenceDetector,
        target: &EmergenceTarget,
        timeout: Duration,
        rng: &mut R,
    ) -> ResonanceResult<EmergenceEvent> {
        if !target.strength.is_finite() || target.strength <= 0.0 || target.strength > 1.0 {
            return Err(ResonanceError::invalid_parameter(format!(
                "target strength must be in (0, 1], got {}",
                target.strength
            )));
        }
        for id in &target.participants {
            network.index_of(*id)?;
        }

        let started = Instant::now();
        let deadline = started + timeout;
        let strength = target.strength;
        let participants = if target.participants.is_empty() {
            network.ids()
        } else {
            target.participants.clone()
        };

        debug!(
            target = target.emergence_type.name(),
            strength,
            participants = participants.len(),
            timeout_ms = timeout.as_millis() as u64,
            "Inducing emergence"
        );

        self.preparation.prepare(network, target)?;

        let mut perturbation = self.config.initial_perturbation;
        perturb(network, &participants, perturbation * strength);

        let mut iterations = 0u64;
        let mut cancelled = false;
        while Instant::now() < deadline {
            if self.cancel.is_cancelled() {
                self.cancel.reset();
                cancelled = true;
                break;
            }

            self.integrator.step(network, self.integrator.default_dt(), rng);
            refresh_metrics(network);
            iterations += 1;

            let events = detector.detect_emergence(network);
            let best = events
                .iter()
                .filter(|e| e.event_type() == target.emergence_type)
                .max_by(|a, b| a.strength().total_cmp(&b.strength()));

            match best {
                Some(event) if event.strength() >= self.config.success_ratio * strength => {
                    let event = event.clone().with_duration(started.elapsed());
                    annotate_participants(network, std::slice::from_ref(&event));
                    info!(
                        target = target.emergence_type.name(),
                        strength = event.strength(),
                        iterations,
                        "Emergence induced"
                    );
                    return Ok(event);
                }
                Some(_) => perturbation = self.retune(perturbation, true),
                None => perturbation = self.retune(perturbation, false),
            }
            perturb(network, &participants, perturbation * strength);
            trace!(iterations, perturbation, "Emergence iteration");
        }

        let fallback = EmergenceEvent::control_fallback(
            target.emergence_type,
            strength * self.config.fallback_strength_ratio,
            participants,
            started.elapsed(),
            self.config.fallback_stability,
        )
        .with_outcome(if cancelled { TAG_CANCELLED } else { TAG_TIMEOUT });
        detector.record_event(fallback.clone());
        warn!(
            target = target.emergence_type.name(),
            strength = fallback.strength(),
            iterations,
            cancelled,
            "Emergence not reached; returning partial fallback"
        );
        Ok(fallback)
    }

    /// Next perturbation: shrink toward the floor after a weaker detection
    /// of the target type, grow toward the cap when it was absent.
    fn retune(&self, perturbation: f64, near_miss: bool) -> f64 {
        if near_miss {
            (perturbation * self.config.fine_tune_factor).max(MIN_PERTURBATION)
        } else {
            (perturbation * self.config.escalation_factor).min(self.config.max_perturbation)
        }
    }
}

/// Raise each participant's amplitude by `delta`.
fn perturb(network: &mut Network, participants: &[FieldId], delta: f64) {
    for id in participants {
        if let Ok(field) = network.field_mut(*id) {
            field.set_amplitude(field.amplitude() + delta);
        }
    }
}
