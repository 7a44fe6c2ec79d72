//! Resonance Engine
//!
//! Dynamics, detection and control over [`resonance_core`] networks.
//!
//! # Architecture
//!
//! - [`integrator`]: Kuramoto-style phase and amplitude integration
//! - [`detector`]: resonance, synchronization, emergence and coherence
//! - [`control`]: stabilization and timeout-bounded emergence induction
//! - [`learner`]: feedback-driven adaptive gains
//! - [`handle`]: thread-shared network access
//! - [`engine`]: the [`ResonanceEngine`] facade owning all of the above
//!
//! # Example
//!
//! ```
//! use resonance_core::EngineConfig;
//! use resonance_engine::ResonanceEngine;
//!
//! let mut engine = ResonanceEngine::new(EngineConfig::default().with_seed(7)).unwrap();
//! engine.run(10);
//! let r = engine.network().global_coherence();
//! assert!((0.0..=1.0).contains(&r));
//! ```

pub mod control;
pub mod detector;
pub mod engine;
pub mod handle;
pub mod integrator;
pub mod learner;

pub use control::{
    CancelFlag, ControlState, EmergenceController, EmergencePreparation, EmergenceTarget,
    NoPreparation, StabilizationController, StabilizationOutcome,
};
pub use detector::{CoherenceMetrics, EmergenceDetector, EmergenceHistory, EmergenceTrend};
pub use engine::ResonanceEngine;
pub use handle::SharedNetwork;
pub use integrator::OscillatorIntegrator;
pub use learner::{AdaptiveFeedbackLearner, AdaptiveGains, LearnerSnapshot};
