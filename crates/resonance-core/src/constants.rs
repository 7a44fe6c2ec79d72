//! Named defaults for every threshold and tolerance in the engine.
//!
//! These values carry no derivation; they are the calibrated defaults that
//! the configuration structs start from and may be overridden per deployment.

use std::f64::consts::PI;

/// Field state bounds.
pub mod field {
    /// Lower amplitude clamp.
    pub const AMPLITUDE_MIN: f64 = 0.01;
    /// Upper amplitude clamp.
    pub const AMPLITUDE_MAX: f64 = 2.0;
    /// Initial amplitudes are drawn uniformly from this range.
    pub const INITIAL_AMPLITUDE_RANGE: (f64, f64) = (0.5, 1.0);
    /// Starting coherence for freshly built fields.
    pub const INITIAL_COHERENCE: f64 = 0.5;
    /// Starting stability for freshly built fields.
    pub const INITIAL_STABILITY: f64 = 0.5;
    /// Cap for the per-field stability sample log.
    pub const STABILITY_HISTORY_CAP: usize = 20;
    /// Cap for the per-field emergence pattern tag log.
    pub const PATTERN_HISTORY_CAP: usize = 20;
    /// Fraction of the gap to the local target closed by each metrics refresh.
    pub const STABILITY_RELAXATION: f64 = 0.1;
}

/// Network construction defaults.
pub mod network {
    pub const DEFAULT_SIZE: usize = 10;
    pub const DEFAULT_DENSITY: f64 = 0.3;
    pub const DEFAULT_BASE_FREQUENCY: f64 = 1.0;
    pub const DEFAULT_FREQUENCY_SPREAD: f64 = 0.5;
    pub const DEFAULT_COUPLING: f64 = 0.5;
    pub const DEFAULT_ADAPTIVITY: f64 = 0.5;
    pub const DEFAULT_NOISE: f64 = 0.05;
    /// Spatial radius used when forming clusters.
    pub const CLUSTER_RADIUS: f64 = 0.5;
    /// Cap for the network's chronological synchronization-pattern log.
    pub const SYNC_PATTERN_LOG_CAP: usize = 1000;
    /// Number of bins used for the phase-distribution entropy.
    pub const PHASE_HISTOGRAM_BINS: usize = 8;
}

/// Integrator defaults.
pub mod integrator {
    /// Default time step.
    pub const DEFAULT_DT: f64 = 0.01;
    /// Multiplicative amplitude damping applied per step.
    pub const DEFAULT_DAMPING: f64 = 0.001;
    /// Scale of the entropy-weighted phase noise term.
    pub const DEFAULT_PHASE_NOISE_SCALE: f64 = 1.0;
    /// Scale of the entropy-weighted amplitude noise increment.
    pub const DEFAULT_AMPLITUDE_NOISE_SCALE: f64 = 0.01;
}

/// Detector thresholds and tolerances.
pub mod detection {
    use super::PI;

    /// Pairwise patterns below this strength are discarded.
    pub const PATTERN_THRESHOLD: f64 = 0.7;
    /// Synchronization candidates below this strength are discarded.
    pub const SYNC_THRESHOLD: f64 = 0.75;
    /// Aggregate coherence above which an emergent-coherence pattern is reported.
    pub const COHERENCE_THRESHOLD: f64 = 0.6;
    /// Network-level emergence metrics must exceed this to emit an event.
    pub const EMERGENCE_THRESHOLD: f64 = 0.8;

    /// Canonical (≥ 1) resonant frequency ratios.
    pub const RESONANT_RATIOS: [f64; 5] = [1.0, 1.5, 2.0, 2.5, 3.0];
    /// Tolerance for matching a resonant ratio.
    pub const RESONANCE_TOLERANCE: f64 = 0.1;
    /// Harmonic ratios.
    pub const HARMONIC_RATIOS: [f64; 6] = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    /// Tolerance for matching a harmonic ratio.
    pub const HARMONIC_TOLERANCE: f64 = 0.05;
    /// Maximum phase distance for aligned (in-phase) fields.
    pub const PHASE_ALIGNMENT: f64 = PI / 4.0;
    /// Minimum phase distance for anti-phase (destructive) fields.
    pub const PHASE_OPPOSITION: f64 = 3.0 * PI / 4.0;
    /// Entropy above which a field counts as chaotic.
    pub const CHAOS_ENTROPY: f64 = 0.8;
    /// Frequency difference required for a chaos pattern.
    pub const CHAOS_FREQUENCY_DIFFERENCE: f64 = 0.5;

    /// Grouping tolerances.
    pub const FREQUENCY_TOLERANCE: f64 = 0.1;
    pub const PHASE_TOLERANCE: f64 = PI / 8.0;
    pub const AMPLITUDE_TOLERANCE: f64 = 0.1;
    /// Minimum group size for multi-field and synchronization patterns.
    pub const MIN_GROUP_SIZE: usize = 3;

    /// Critical order parameter for phase-transition detection.
    pub const CRITICAL_ORDER_PARAMETER: f64 = 0.5;
    /// Order-parameter jump that counts as a transition on its own.
    pub const TRANSITION_JUMP: f64 = 0.15;
    /// Mean amplitude at which coherent amplification starts to register.
    pub const AMPLIFICATION_ONSET: f64 = 1.0;

    /// Rolling emergence-event history cap.
    pub const HISTORY_CAP: usize = 1000;

    /// Weights for the overall coherence sum.
    pub const PHASE_WEIGHT: f64 = 0.4;
    pub const FREQUENCY_WEIGHT: f64 = 0.3;
    pub const AMPLITUDE_WEIGHT: f64 = 0.2;
    pub const HARMONIC_WEIGHT: f64 = 0.1;
}

/// Controller defaults.
pub mod control {
    pub const STABILITY_THRESHOLD: f64 = 0.8;
    pub const MAX_ITERATIONS: usize = 1000;
    pub const CONTROL_GAIN: f64 = 0.1;

    pub const EMERGENCE_TIMEOUT_MS: u64 = 10_000;
    /// Fraction of the requested strength a detection must reach.
    pub const SUCCESS_RATIO: f64 = 0.8;
    /// Fraction of the requested strength given to a timeout fallback.
    pub const FALLBACK_STRENGTH_RATIO: f64 = 0.5;
    pub const FALLBACK_STABILITY: f64 = 0.5;
    pub const INITIAL_PERTURBATION: f64 = 0.1;
    pub const ESCALATION_FACTOR: f64 = 1.5;
    pub const FINE_TUNE_FACTOR: f64 = 0.5;
    pub const MAX_PERTURBATION: f64 = 1.0;
    pub const MIN_PERTURBATION: f64 = 0.001;
}

/// Adaptive learner defaults.
pub mod learning {
    pub const INITIAL_GAIN: f64 = 0.1;
    pub const GAIN_MIN: f64 = 0.01;
    pub const GAIN_MAX: f64 = 0.5;
    pub const GAIN_GROWTH: f64 = 1.05;
    pub const GAIN_DECAY: f64 = 0.95;
    pub const HIGH_EFFECTIVENESS: f64 = 0.7;
    pub const LOW_EFFECTIVENESS: f64 = 0.4;
    pub const FEEDBACK_HISTORY_CAP: usize = 100;
    pub const TARGET_PERFORMANCE: f64 = 0.8;
    pub const TARGET_COHERENCE: f64 = 0.8;
    pub const TARGET_STABILITY: f64 = 0.8;
}
