//! Per-component configuration sections.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{check_positive, check_range};
use crate::constants::{control, detection, field, integrator, learning, network};
use crate::error::{ResonanceError, ResonanceResult};

/// Network construction parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct NetworkConfig {
    /// Number of fields.
    pub size: usize,
    /// Probability that any unordered pair is connected, in [0, 1].
    pub density: f64,
    /// Centre of the natural frequency distribution.
    pub base_frequency: f64,
    /// Half-width of the uniform frequency jitter.
    pub frequency_spread: f64,
    /// Global coupling strength K.
    pub coupling_strength: f64,
    /// How strongly the network adapts, in [0, 1]. Reported, not integrated.
    pub adaptivity: f64,
    /// Initial field entropy, in [0, 1]. Drives the integrator's noise terms.
    pub noise_level: f64,
    /// Target emergence level, in [0, 1].
    pub emergence_target: f64,
    /// Target stability, in [0, 1].
    pub stability_target: f64,
    /// Target coherence, in [0, 1].
    pub coherence_target: f64,
    /// Radius for spatial cluster formation.
    pub cluster_radius: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            size: network::DEFAULT_SIZE,
            density: network::DEFAULT_DENSITY,
            base_frequency: network::DEFAULT_BASE_FREQUENCY,
            frequency_spread: network::DEFAULT_FREQUENCY_SPREAD,
            coupling_strength: network::DEFAULT_COUPLING,
            adaptivity: network::DEFAULT_ADAPTIVITY,
            noise_level: network::DEFAULT_NOISE,
            emergence_target: detection::EMERGENCE_THRESHOLD,
            stability_target: control::STABILITY_THRESHOLD,
            coherence_target: detection::COHERENCE_THRESHOLD,
            cluster_radius: network::CLUSTER_RADIUS,
        }
    }
}

impl NetworkConfig {
    /// Validate ranges. Density outside [0, 1] fails rather than clamping.
    pub fn validate(&self) -> ResonanceResult<()> {
        check_range("network.density", self.density, 0.0, 1.0)?;
        if !self.base_frequency.is_finite() {
            return Err(ResonanceError::invalid_config(
                "network.base_frequency",
                format!("must be finite, got {}", self.base_frequency),
            ));
        }
        check_range("network.frequency_spread", self.frequency_spread, 0.0, f64::MAX)?;
        check_range("network.coupling_strength", self.coupling_strength, 0.0, f64::MAX)?;
        check_range("network.adaptivity", self.adaptivity, 0.0, 1.0)?;
        check_range("network.noise_level", self.noise_level, 0.0, 1.0)?;
        check_range("network.emergence_target", self.emergence_target, 0.0, 1.0)?;
        check_range("network.stability_target", self.stability_target, 0.0, 1.0)?;
        check_range("network.coherence_target", self.coherence_target, 0.0, 1.0)?;
        check_positive("network.cluster_radius", self.cluster_radius)?;
        Ok(())
    }
}

/// Oscillator integrator parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct IntegratorConfig {
    /// Default time step.
    pub dt: f64,
    /// Multiplicative amplitude damping per step, in [0, 1).
    pub damping: f64,
    pub phase_noise_scale: f64,
    pub amplitude_noise_scale: f64,
    pub amplitude_min: f64,
    pub amplitude_max: f64,
}

impl Default for IntegratorConfig {
    fn default() -> Self {
        Self {
            dt: integrator::DEFAULT_DT,
            damping: integrator::DEFAULT_DAMPING,
            phase_noise_scale: integrator::DEFAULT_PHASE_NOISE_SCALE,
            amplitude_noise_scale: integrator::DEFAULT_AMPLITUDE_NOISE_SCALE,
            amplitude_min: field::AMPLITUDE_MIN,
            amplitude_max: field::AMPLITUDE_MAX,
        }
    }
}

impl IntegratorConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        check_positive("integrator.dt", self.dt)?;
        check_range("integrator.damping", self.damping, 0.0, 0.999)?;
        check_range("integrator.phase_noise_scale", self.phase_noise_scale, 0.0, f64::MAX)?;
        check_range(
            "integrator.amplitude_noise_scale",
            self.amplitude_noise_scale,
            0.0,
            f64::MAX,
        )?;
        check_positive("integrator.amplitude_min", self.amplitude_min)?;
        if !self.amplitude_max.is_finite() || self.amplitude_max <= self.amplitude_min {
            return Err(ResonanceError::invalid_config(
                "integrator.amplitude_max",
                format!(
                    "must be finite and greater than amplitude_min ({}), got {}",
                    self.amplitude_min, self.amplitude_max
                ),
            ));
        }
        Ok(())
    }
}

/// Detector thresholds and tolerances.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DetectorThresholds {
    pub pattern_threshold: f64,
    pub sync_threshold: f64,
    pub coherence_threshold: f64,
    pub emergence_threshold: f64,
    pub resonance_tolerance: f64,
    pub harmonic_tolerance: f64,
    pub frequency_tolerance: f64,
    pub phase_tolerance: f64,
    pub amplitude_tolerance: f64,
    pub min_group_size: usize,
    pub history_cap: usize,
}

impl Default for DetectorThresholds {
    fn default() -> Self {
        Self {
            pattern_threshold: detection::PATTERN_THRESHOLD,
            sync_threshold: detection::SYNC_THRESHOLD,
            coherence_threshold: detection::COHERENCE_THRESHOLD,
            emergence_threshold: detection::EMERGENCE_THRESHOLD,
            resonance_tolerance: detection::RESONANCE_TOLERANCE,
            harmonic_tolerance: detection::HARMONIC_TOLERANCE,
            frequency_tolerance: detection::FREQUENCY_TOLERANCE,
            phase_tolerance: detection::PHASE_TOLERANCE,
            amplitude_tolerance: detection::AMPLITUDE_TOLERANCE,
            min_group_size: detection::MIN_GROUP_SIZE,
            history_cap: detection::HISTORY_CAP,
        }
    }
}

impl DetectorThresholds {
    pub fn validate(&self) -> ResonanceResult<()> {
        check_range("detector.pattern_threshold", self.pattern_threshold, 0.0, 1.0)?;
        check_range("detector.sync_threshold", self.sync_threshold, 0.0, 1.0)?;
        check_range("detector.coherence_threshold", self.coherence_threshold, 0.0, 1.0)?;
        check_range("detector.emergence_threshold", self.emergence_threshold, 0.0, 1.0)?;
        check_positive("detector.resonance_tolerance", self.resonance_tolerance)?;
        check_positive("detector.harmonic_tolerance", self.harmonic_tolerance)?;
        check_positive("detector.frequency_tolerance", self.frequency_tolerance)?;
        check_range(
            "detector.phase_tolerance",
            self.phase_tolerance,
            f64::MIN_POSITIVE,
            std::f64::consts::PI,
        )?;
        check_positive("detector.amplitude_tolerance", self.amplitude_tolerance)?;
        if self.min_group_size < 2 {
            return Err(ResonanceError::invalid_config(
                "detector.min_group_size",
                format!("must be at least 2, got {}", self.min_group_size),
            ));
        }
        if self.history_cap == 0 {
            return Err(ResonanceError::invalid_config(
                "detector.history_cap",
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Stabilization controller parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct StabilizationConfig {
    pub stability_threshold: f64,
    pub max_iterations: usize,
    pub control_gain: f64,
}

impl Default for StabilizationConfig {
    fn default() -> Self {
        Self {
            stability_threshold: control::STABILITY_THRESHOLD,
            max_iterations: control::MAX_ITERATIONS,
            control_gain: control::CONTROL_GAIN,
        }
    }
}

impl StabilizationConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        check_range(
            "stabilization.stability_threshold",
            self.stability_threshold,
            0.0,
            1.0,
        )?;
        check_range("stabilization.control_gain", self.control_gain, 0.0, 1.0)?;
        Ok(())
    }
}

/// Emergence controller parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EmergenceConfig {
    /// Wall-clock bound for one induction call.
    pub timeout_ms: u64,
    pub success_ratio: f64,
    pub fallback_strength_ratio: f64,
    pub fallback_stability: f64,
    pub initial_perturbation: f64,
    pub escalation_factor: f64,
    pub fine_tune_factor: f64,
    pub max_perturbation: f64,
}

impl Default for EmergenceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: control::EMERGENCE_TIMEOUT_MS,
            success_ratio: control::SUCCESS_RATIO,
            fallback_strength_ratio: control::FALLBACK_STRENGTH_RATIO,
            fallback_stability: control::FALLBACK_STABILITY,
            initial_perturbation: control::INITIAL_PERTURBATION,
            escalation_factor: control::ESCALATION_FACTOR,
            fine_tune_factor: control::FINE_TUNE_FACTOR,
            max_perturbation: control::MAX_PERTURBATION,
        }
    }
}

impl EmergenceConfig {
    #[inline]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> ResonanceResult<()> {
        check_range("emergence.success_ratio", self.success_ratio, 0.0, 1.0)?;
        check_range(
            "emergence.fallback_strength_ratio",
            self.fallback_strength_ratio,
            0.0,
            1.0,
        )?;
        check_range("emergence.fallback_stability", self.fallback_stability, 0.0, 1.0)?;
        check_range(
            "emergence.initial_perturbation",
            self.initial_perturbation,
            0.0,
            self.max_perturbation,
        )?;
        check_range("emergence.escalation_factor", self.escalation_factor, 1.0, f64::MAX)?;
        check_range("emergence.fine_tune_factor", self.fine_tune_factor, 0.0, 1.0)?;
        check_positive("emergence.max_perturbation", self.max_perturbation)?;
        Ok(())
    }
}

/// Adaptive feedback learner parameters.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LearnerConfig {
    pub initial_gain: f64,
    pub gain_min: f64,
    pub gain_max: f64,
    pub gain_growth: f64,
    pub gain_decay: f64,
    pub high_effectiveness: f64,
    pub low_effectiveness: f64,
    pub history_cap: usize,
    pub target_performance: f64,
    pub target_coherence: f64,
    pub target_stability: f64,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            initial_gain: learning::INITIAL_GAIN,
            gain_min: learning::GAIN_MIN,
            gain_max: learning::GAIN_MAX,
            gain_growth: learning::GAIN_GROWTH,
            gain_decay: learning::GAIN_DECAY,
            high_effectiveness: learning::HIGH_EFFECTIVENESS,
            low_effectiveness: learning::LOW_EFFECTIVENESS,
            history_cap: learning::FEEDBACK_HISTORY_CAP,
            target_performance: learning::TARGET_PERFORMANCE,
            target_coherence: learning::TARGET_COHERENCE,
            target_stability: learning::TARGET_STABILITY,
        }
    }
}

impl LearnerConfig {
    pub fn validate(&self) -> ResonanceResult<()> {
        check_positive("learner.gain_min", self.gain_min)?;
        if !self.gain_max.is_finite() || self.gain_max < self.gain_min {
            return Err(ResonanceError::invalid_config(
                "learner.gain_max",
                format!(
                    "must be finite and >= gain_min ({}), got {}",
                    self.gain_min, self.gain_max
                ),
            ));
        }
        check_range("learner.initial_gain", self.initial_gain, self.gain_min, self.gain_max)?;
        check_range("learner.gain_growth", self.gain_growth, 1.0, f64::MAX)?;
        check_range("learner.gain_decay", self.gain_decay, f64::MIN_POSITIVE, 1.0)?;
        check_range("learner.high_effectiveness", self.high_effectiveness, 0.0, 1.0)?;
        check_range(
            "learner.low_effectiveness",
            self.low_effectiveness,
            0.0,
            self.high_effectiveness,
        )?;
        if self.history_cap == 0 {
            return Err(ResonanceError::invalid_config(
                "learner.history_cap",
                "must be greater than 0",
            ));
        }
        check_range("learner.target_performance", self.target_performance, 0.0, 1.0)?;
        check_range("learner.target_coherence", self.target_coherence, 0.0, 1.0)?;
        check_range("learner.target_stability", self.target_stability, 0.0, 1.0)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_density_out_of_range_fails() {
        for density in [-0.1, 1.01, f64::NAN] {
            let config = NetworkConfig {
                density,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("network.density"));
        }
        println!("[PASS] density outside [0, 1] fails fast");
    }

    #[test]
    fn test_network_boundary_density_is_valid() {
        for density in [0.0, 1.0] {
            let config = NetworkConfig {
                density,
                ..Default::default()
            };
            config.validate().expect("boundary density is valid");
        }
    }

    #[test]
    fn test_integrator_amplitude_bounds_must_be_ordered() {
        let config = IntegratorConfig {
            amplitude_min: 1.0,
            amplitude_max: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_learner_gain_bounds() {
        let config = LearnerConfig {
            initial_gain: 0.9,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("initial_gain"));
        println!("[PASS] initial gain outside [gain_min, gain_max] rejected");
    }

    #[test]
    fn test_emergence_timeout_conversion() {
        let config = EmergenceConfig {
            timeout_ms: 50,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_millis(50));
    }
}
