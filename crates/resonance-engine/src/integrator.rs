//! Kuramoto-style oscillator integration over a network graph.
//!
//! ```text
//! dθᵢ/dt = ωᵢ + Σⱼ Kᵢⱼ · sin(θⱼ − θᵢ) + ηᵢ
//! ```
//!
//! Where:
//! - ωᵢ = 2π · frequency (frequencies are in cycles per time unit)
//! - Kᵢⱼ = connection strength between i and j
//! - ηᵢ = entropy-weighted zero-mean noise
//!
//! Amplitudes decay by the damping factor, take an entropy-weighted noise
//! increment, and are clamped to the field's bounds.

use std::f64::consts::TAU;

use chrono::Utc;
use rand::Rng;
use rayon::prelude::*;
use tracing::{trace, warn};

use resonance_core::numeric::finite_or;
use resonance_core::{Field, IntegratorConfig, Network, ResonanceResult};

/// Explicit Euler integrator for a [`Network`].
#[derive(Debug, Clone)]
pub struct OscillatorIntegrator {
    config: IntegratorConfig,
}

impl OscillatorIntegrator {
    pub fn new(config: IntegratorConfig) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &IntegratorConfig {
        &self.config
    }

    /// Default step size.
    #[inline]
    pub fn default_dt(&self) -> f64 {
        self.config.dt
    }

    /// Advance every field by `dt`.
    ///
    /// Noise is drawn sequentially from `rng` so a seeded run is
    /// reproducible; coupling forces are then computed in parallel over a
    /// snapshot of the phases and written back in one pass. Derived metrics
    /// are not touched.
    ///
    /// Returns `false` without changing anything when `dt` is not finite or
    /// not positive.
    pub fn step<R: Rng + ?Sized>(&self, network: &mut Network, dt: f64, rng: &mut R) -> bool {
        if !dt.is_finite() || dt <= 0.0 {
            warn!(dt, "Ignoring integrator step with invalid dt");
            return false;
        }

        let noise: Vec<(f64, f64)> = network
            .fields()
            .iter()
            .map(|field| {
                let entropy = field.entropy();
                let phase_noise =
                    entropy * self.config.phase_noise_scale * rng.gen_range(-1.0..=1.0);
                let amplitude_noise =
                    entropy * self.config.amplitude_noise_scale * rng.gen_range(-1.0..=1.0);
                (phase_noise, amplitude_noise)
            })
            .collect();

        let phases: Vec<f64> = network.fields().iter().map(Field::phase).collect();
        let view: &Network = network;
        let forces: Vec<f64> = (0..phases.len())
            .into_par_iter()
            .map(|i| coupling_force(&phases, view.neighbors(i), phases[i]))
            .collect();

        let retain = 1.0 - self.config.damping;
        let now = Utc::now();
        for ((field, force), (phase_noise, amplitude_noise)) in
            network.fields_mut().iter_mut().zip(forces).zip(noise)
        {
            let omega = TAU * field.frequency();
            let velocity = finite_or(omega + force + phase_noise, omega);
            let phase = finite_or(field.phase() + dt * velocity, field.phase());
            let amplitude = finite_or(
                field.amplitude() * retain + amplitude_noise,
                field.amplitude(),
            );
            field.advance(phase, amplitude, now);
        }

        network.advance_clock(dt);
        trace!(steps = network.steps(), elapsed = network.elapsed(), "Integrator step");
        true
    }
}

/// `Σ strength · sin(θⱼ − θᵢ)` over the given neighbors.
pub fn coupling_force(phases: &[f64], neighbors: &[(usize, f64)], phase: f64) -> f64 {
    let force: f64 = neighbors
        .iter()
        .filter_map(|&(j, strength)| phases.get(j).map(|pj| strength * (pj - phase).sin()))
        .sum();
    finite_or(force, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use resonance_core::{
        build_network, seeded_rng, EngineConfig, FieldCategory, FieldId, IntegratorConfig, Position,
    };
    use std::f64::consts::PI;

    fn network(size: usize, density: f64, noise: f64) -> (Network, OscillatorIntegrator) {
        let mut config = EngineConfig::default();
        config.network.size = size;
        config.network.density = density;
        config.network.noise_level = noise;
        let network = build_network(&config, &mut seeded_rng(3)).expect("build");
        let integrator = OscillatorIntegrator::new(config.integrator).expect("integrator");
        (network, integrator)
    }

    #[test]
    fn test_coupling_force_pulls_toward_neighbors() {
        let phases = [0.0, PI / 2.0];
        let force = coupling_force(&phases, &[(1, 2.0)], phases[0]);
        assert!((force - 2.0).abs() < 1e-12);
        assert_eq!(coupling_force(&phases, &[], 0.0), 0.0);
        assert_eq!(coupling_force(&phases, &[(9, 1.0)], 0.0), 0.0);
    }

    #[test]
    fn test_invalid_dt_is_noop() {
        let (mut network, integrator) = network(5, 0.5, 0.5);
        let before: Vec<f64> = network.fields().iter().map(Field::phase).collect();
        let mut rng = seeded_rng(1);
        for dt in [0.0, -0.01, f64::NAN, f64::INFINITY] {
            assert!(!integrator.step(&mut network, dt, &mut rng));
        }
        let after: Vec<f64> = network.fields().iter().map(Field::phase).collect();
        assert_eq!(before, after);
        assert_eq!(network.steps(), 0);
        println!("[PASS] invalid dt leaves the network untouched");
    }

    #[test]
    fn test_bounds_hold_under_heavy_noise() {
        let (mut network, integrator) = network(12, 0.6, 1.0);
        let mut rng = seeded_rng(11);
        for _ in 0..500 {
            assert!(integrator.step(&mut network, 0.05, &mut rng));
            for field in network.fields() {
                assert!((0.0..TAU).contains(&field.phase()));
                assert!((0.01..=2.0).contains(&field.amplitude()));
            }
        }
        assert_eq!(network.steps(), 500);
        println!("[PASS] phase and amplitude bounds hold over 500 noisy steps");
    }

    #[test]
    fn test_noise_free_step_is_deterministic() {
        let (mut a, integrator) = network(6, 1.0, 0.0);
        let mut b = a.clone();
        integrator.step(&mut a, 0.01, &mut seeded_rng(1));
        integrator.step(&mut b, 0.01, &mut seeded_rng(99));
        for (fa, fb) in a.fields().iter().zip(b.fields()) {
            assert_eq!(fa.phase(), fb.phase());
        }
    }

    #[test]
    fn test_frequency_is_cycles_per_time_unit() {
        let mut network = Network::new();
        let field = Field::new(
            FieldId::nil(),
            FieldCategory::Temporal,
            0.25,
            1.0,
            0.0,
            Position::new(0.0, 0.0),
        );
        network.insert_field(field).expect("insert");
        let integrator = OscillatorIntegrator::new(IntegratorConfig::default()).expect("integrator");

        assert!(integrator.step(&mut network, 0.1, &mut seeded_rng(1)));
        let phase = network.fields()[0].phase();
        assert!((phase - TAU * 0.25 * 0.1).abs() < 1e-12, "phase {}", phase);

        // four time units of a 0.25 Hz field is one full turn
        for _ in 1..40 {
            integrator.step(&mut network, 0.1, &mut seeded_rng(1));
        }
        let phase = network.fields()[0].phase();
        assert!(phase < 1e-9 || TAU - phase < 1e-9, "phase {}", phase);
        println!("[PASS] isolated field advances 2π·f per time unit");
    }

    #[test]
    fn test_empty_network_steps() {
        let (mut network, integrator) = network(0, 0.3, 0.05);
        assert!(integrator.step(&mut network, 0.01, &mut seeded_rng(1)));
        assert_eq!(network.steps(), 1);
    }
}
