//! Configuration management for the resonance engine.
//!
//! Every value has a named default in [`crate::constants`]; files and
//! environment variables only override what they mention.

mod sub_configs;

use serde::{Deserialize, Serialize};

use crate::error::{ResonanceError, ResonanceResult};

pub use sub_configs::{
    DetectorThresholds, EmergenceConfig, IntegratorConfig, LearnerConfig, NetworkConfig,
    StabilizationConfig,
};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for the engine's generator. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub network: NetworkConfig,
    pub integrator: IntegratorConfig,
    pub detector: DetectorThresholds,
    pub stabilization: StabilizationConfig,
    pub emergence: EmergenceConfig,
    pub learner: LearnerConfig,
}

impl EngineConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{RESONANCE_ENV}.toml (environment-specific)
    /// 3. Environment variables with RESONANCE_ prefix, `__` as separator
    pub fn load() -> ResonanceResult<Self> {
        let env = std::env::var("RESONANCE_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = ::config::Config::builder()
            .add_source(::config::File::with_name("config/default").required(false))
            .add_source(::config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(::config::Environment::with_prefix("RESONANCE").separator("__"));

        let config: EngineConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> ResonanceResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ResonanceError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: EngineConfig = toml::from_str(&content).map_err(|e| {
            ResonanceError::ConfigError(format!("Failed to parse config file: {}", e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Builder-style seed override.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate every sub-configuration.
    pub fn validate(&self) -> ResonanceResult<()> {
        self.network.validate()?;
        self.integrator.validate()?;
        self.detector.validate()?;
        self.stabilization.validate()?;
        self.emergence.validate()?;
        self.learner.validate()?;
        Ok(())
    }
}

/// Fail with `InvalidConfig` unless `value` is finite and within `[min, max]`.
pub(crate) fn check_range(field: &str, value: f64, min: f64, max: f64) -> ResonanceResult<()> {
    if !value.is_finite() || value < min || value > max {
        return Err(ResonanceError::invalid_config(
            field,
            format!("must be within [{}, {}], got {}", min, max, value),
        ));
    }
    Ok(())
}

/// Fail with `InvalidConfig` unless `value` is finite and strictly positive.
pub(crate) fn check_positive(field: &str, value: f64) -> ResonanceResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ResonanceError::invalid_config(
            field,
            format!("must be positive, got {}", value),
        ));
    }
    Ok(())
}
