//! Resonance Core Library
//!
//! Data model and construction for networks of coupled resonance fields.
//!
//! # Architecture
//!
//! - [`types`]: fields, connections, clusters, the network container, and
//!   the records produced by detection and control
//! - [`builder`]: seeded network construction
//! - [`metrics`]: derived-metric refresh run after each integration step
//! - [`config`]: layered configuration with named defaults
//! - [`constants`]: every calibrated threshold, by component
//! - [`numeric`]: finite-safe phase and ratio helpers
//! - [`error`]: error types and the result alias
//!
//! # Example
//!
//! ```
//! use resonance_core::{build_network, seeded_rng, EngineConfig};
//!
//! let config = EngineConfig::default();
//! let mut rng = seeded_rng(42);
//! let network = build_network(&config, &mut rng).unwrap();
//! assert_eq!(network.len(), config.network.size);
//! ```

pub mod builder;
pub mod config;
pub mod constants;
pub mod error;
pub mod metrics;
pub mod numeric;
pub mod types;

use rand::SeedableRng;

pub use builder::{build_network, form_clusters, NetworkBuilder};
pub use crate::config::{
    DetectorThresholds, EmergenceConfig, EngineConfig, IntegratorConfig, LearnerConfig,
    NetworkConfig, StabilizationConfig,
};
pub use error::{ResonanceError, ResonanceResult};
pub use metrics::{compute_scalars, initialize_metrics, refresh_metrics, stability_score};
pub use types::*;

/// Generator used throughout the engine.
pub type EngineRng = rand_chacha::ChaCha8Rng;

/// Deterministic generator for `seed`.
pub fn seeded_rng(seed: u64) -> EngineRng {
    EngineRng::seed_from_u64(seed)
}

/// Generator seeded from `seed`, or from OS entropy when `None`.
pub fn rng_from_seed(seed: Option<u64>) -> EngineRng {
    match seed {
        Some(seed) => seeded_rng(seed),
        None => EngineRng::from_entropy(),
    }
}
