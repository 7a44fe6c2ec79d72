//! The `ResonanceEngine` facade.

use tracing::{debug, info};

use resonance_core::{
    build_network, refresh_metrics, rng_from_seed, ControlFeedback, EmergenceEvent, EngineConfig,
    EngineRng, Field, Network, NetworkSummary, ResonancePattern, ResonanceResult,
    SynchronizationPattern,
};

use crate::control::{
    CancelFlag, EmergenceController, EmergencePreparation, EmergenceTarget,
    StabilizationController, StabilizationOutcome,
};
use crate::detector::{annotate_participants, CoherenceMetrics, EmergenceDetector, EmergenceTrend};
use crate::integrator::OscillatorIntegrator;
use crate::learner::{AdaptiveFeedbackLearner, AdaptiveGains};

/// Owns one network, the seeded generator and every stateful component.
///
/// All randomness flows from `config.seed`; two engines built from the same
/// seeded configuration and driven by the same calls produce the same
/// fields, connections and detections.
#[derive(Debug)]
pub struct ResonanceEngine {
    config: EngineConfig,
    rng: EngineRng,
    network: Network,
    integrator: OscillatorIntegrator,
    detector: EmergenceDetector,
    stabilizer: StabilizationController,
    emergence: EmergenceController,
    learner: AdaptiveFeedbackLearner,
}

impl ResonanceEngine {
    /// Validate `config`, construct every component and build the initial
    /// network.
    pub fn new(config: EngineConfig) -> ResonanceResult<Self> {
        config.validate()?;
        let mut rng = rng_from_seed(config.seed);
        let integrator = OscillatorIntegrator::new(config.integrator.clone())?;
        let detector = EmergenceDetector::new(config.detector.clone())?;
        let stabilizer = StabilizationController::new(config.stabilization.clone(), integrator.clone())?;
        let emergence = EmergenceController::new(config.emergence.clone(), integrator.clone())?;
        let learner = AdaptiveFeedbackLearner::new(config.learner.clone())?;
        let network = build_network(&config, &mut rng)?;

        info!(
            fields = network.len(),
            connections = network.connection_count(),
            clusters = network.clusters().len(),
            seed = ?config.seed,
            "Resonance engine ready"
        );

        Ok(Self {
            config,
            rng,
            network,
            integrator,
            detector,
            stabilizer,
            emergence,
            learner,
        })
    }

    /// Replace the preparation hook run before each induction.
    pub fn with_preparation(mut self, preparation: Box<dyn EmergencePreparation>) -> Self {
        self.emergence = self.emergence.with_preparation(preparation);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    pub fn network_mut(&mut self) -> &mut Network {
        &mut self.network
    }

    pub fn into_network(self) -> Network {
        self.network
    }

    pub fn detector(&self) -> &EmergenceDetector {
        &self.detector
    }

    pub fn learner(&self) -> &AdaptiveFeedbackLearner {
        &self.learner
    }

    /// Discard the current network and build a fresh one from the
    /// engine's generator.
    pub fn build_network(&mut self) -> ResonanceResult<&Network> {
        self.network = build_network(&self.config, &mut self.rng)?;
        debug!(fields = self.network.len(), "Network rebuilt");
        Ok(&self.network)
    }

    /// Advance one step of `dt` (the configured step when `None`) and
    /// refresh every derived metric. Returns false, leaving the network
    /// unchanged, when `dt` is not a positive finite number.
    pub fn integrate_step(&mut self, dt: Option<f64>) -> bool {
        let dt = dt.unwrap_or_else(|| self.integrator.default_dt());
        let stepped = self.integrator.step(&mut self.network, dt, &mut self.rng);
        if stepped {
            refresh_metrics(&mut self.network);
        }
        stepped
    }

    /// Run `steps` configured-length steps; returns how many were applied.
    pub fn run(&mut self, steps: usize) -> usize {
        let applied = (0..steps).filter(|_| self.integrate_step(None)).count();
        debug!(
            applied,
            global_coherence = self.network.global_coherence(),
            "Run complete"
        );
        applied
    }

    pub fn detect_patterns(&self) -> Vec<ResonancePattern> {
        self.detector.detect_patterns(self.network.fields())
    }

    /// Patterns among an arbitrary field slice.
    pub fn detect_patterns_in(&self, fields: &[Field]) -> Vec<ResonancePattern> {
        self.detector.detect_patterns(fields)
    }

    /// Detect emergence, record it in the history and tag participants.
    pub fn detect_emergence(&mut self) -> Vec<EmergenceEvent> {
        let events = self.detector.detect_emergence(&self.network);
        annotate_participants(&mut self.network, &events);
        events
    }

    /// Detect synchronization and append it to the network's log.
    pub fn detect_synchronization(&mut self) -> Vec<SynchronizationPattern> {
        self.detector.record_synchronization(&mut self.network)
    }

    pub fn detect_coherence(&self) -> CoherenceMetrics {
        self.detector.detect_coherence(&self.network)
    }

    pub fn stabilize(&mut self) -> StabilizationOutcome {
        self.stabilizer.stabilize(&mut self.network, &mut self.rng)
    }

    pub fn induce_emergence(&mut self, target: &EmergenceTarget) -> ResonanceResult<EmergenceEvent> {
        self.emergence
            .induce(&mut self.network, &mut self.detector, target, &mut self.rng)
    }

    pub fn apply_feedback(&mut self, feedback: &[ControlFeedback]) -> ResonanceResult<AdaptiveGains> {
        self.learner.apply_feedback(&mut self.network, feedback)
    }

    pub fn gains(&self) -> AdaptiveGains {
        self.learner.gains()
    }

    pub fn trend(&self) -> EmergenceTrend {
        self.detector.trend()
    }

    pub fn summary(&self) -> NetworkSummary {
        self.network.summary()
    }

    /// Cancels the running (or next) stabilization.
    pub fn stabilization_cancel(&self) -> CancelFlag {
        self.stabilizer.cancel_flag()
    }

    /// Cancels the running (or next) induction.
    pub fn emergence_cancel(&self) -> CancelFlag {
        self.emergence.cancel_flag()
    }

    /// Draw from the engine's generator, for callers that need randomness
    /// consistent with the engine's seed.
    pub fn rng(&mut self) -> &mut EngineRng {
        &mut self.rng
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_core::EmergenceType;
    use std::time::Duration;

    fn config(seed: u64) -> EngineConfig {
        let mut config = EngineConfig::default().with_seed(seed);
        config.network.size = 8;
        config.emergence.timeout_ms = 30;
        config
    }

    #[test]
    fn test_same_seed_same_network() {
        let a = ResonanceEngine::new(config(11)).expect("engine");
        let b = ResonanceEngine::new(config(11)).expect("engine");
        let phases = |e: &ResonanceEngine| e.network().fields().iter().map(Field::phase).collect::<Vec<_>>();
        assert_eq!(phases(&a), phases(&b));
        assert_eq!(a.network().connection_count(), b.network().connection_count());
        println!("[PASS] seeded engines are reproducible");
    }

    #[test]
    fn test_invalid_config_fails_fast() {
        let mut config = config(1);
        config.network.density = 1.5;
        assert!(ResonanceEngine::new(config).is_err());
    }

    #[test]
    fn test_integrate_step_rejects_bad_dt() {
        let mut engine = ResonanceEngine::new(config(2)).expect("engine");
        let before = engine.network().fields()[0].phase();
        assert!(!engine.integrate_step(Some(0.0)));
        assert!(!engine.integrate_step(Some(f64::NAN)));
        assert_eq!(engine.network().fields()[0].phase(), before);
        assert_eq!(engine.summary().steps, 0);
    }

    #[test]
    fn test_run_and_detect() {
        let mut engine = ResonanceEngine::new(config(3)).expect("engine");
        assert_eq!(engine.run(20), 20);
        assert_eq!(engine.summary().steps, 20);

        let coherence = engine.detect_coherence();
        assert!((0.0..=1.0).contains(&coherence.overall_coherence));
        let _ = engine.detect_emergence();
        let logged = engine.detect_synchronization().len();
        assert_eq!(engine.summary().sync_patterns_logged, logged);
        println!("[VERIFIED] r = {:.3}", engine.network().global_coherence());
    }

    #[test]
    fn test_induce_unreachable_target_falls_back() {
        let mut engine = ResonanceEngine::new(config(4)).expect("engine");
        let target = EmergenceTarget::new(EmergenceType::DistributedComputation, 0.8)
            .with_duration(Duration::from_millis(10));
        let event = engine.induce_emergence(&target).expect("fallback");
        assert!(event.is_control_induced());
        assert!((event.strength() - 0.4).abs() < 1e-12);
        let last = engine.detector().history().events().back().cloned();
        assert!(last.is_some_and(|e| e.is_control_induced()));
    }

    #[test]
    fn test_rebuild_replaces_network() {
        let mut engine = ResonanceEngine::new(config(5)).expect("engine");
        engine.run(3);
        let first = engine.network().ids();
        engine.build_network().expect("rebuild");
        assert_ne!(engine.network().ids(), first);
        assert_eq!(engine.summary().steps, 0);
    }
}
