//! Seeded network construction.

use std::f64::consts::TAU;

use rand::Rng;
use tracing::debug;

use crate::config::{EngineConfig, NetworkConfig};
use crate::constants::field::INITIAL_AMPLITUDE_RANGE;
use crate::error::ResonanceResult;
use crate::metrics::initialize_metrics;
use crate::types::{
    AmplitudeBounds, Cluster, Field, FieldCategory, FieldId, Network, Position,
};

/// Builds networks from a validated [`NetworkConfig`].
///
/// All randomness comes from the generator passed to [`NetworkBuilder::build`],
/// so the same seed always yields the same network, identifiers included.
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    config: NetworkConfig,
    amplitude_bounds: AmplitudeBounds,
}

impl NetworkBuilder {
    /// Fails fast with `InvalidConfig` on out-of-range values.
    pub fn new(config: NetworkConfig) -> ResonanceResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            amplitude_bounds: AmplitudeBounds::default(),
        })
    }

    pub fn with_amplitude_bounds(mut self, bounds: AmplitudeBounds) -> Self {
        self.amplitude_bounds = bounds;
        self
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn build<R: Rng + ?Sized>(&self, rng: &mut R) -> Network {
        let mut network = Network::new();

        for _ in 0..self.config.size {
            let field = self.random_field(rng);
            // Fresh 122-bit identifiers; a collision is not a realistic outcome.
            if let Err(err) = network.insert_field(field) {
                debug!(error = %err, "skipping duplicate field id");
            }
        }

        let ids = network.ids();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                if rng.gen::<f64>() >= self.config.density {
                    continue;
                }
                let distance = match (network.field(a), network.field(b)) {
                    (Ok(fa), Ok(fb)) => fa.position().distance(&fb.position()),
                    _ => continue,
                };
                let strength = self.config.coupling_strength / (1.0 + distance);
                if let Err(err) = network.connect(a, b, strength) {
                    debug!(error = %err, "skipping connection");
                }
            }
        }

        let clusters = form_clusters(network.fields(), self.config.cluster_radius);
        network.set_clusters(clusters);
        initialize_metrics(&mut network);

        debug!(
            fields = network.len(),
            connections = network.connection_count(),
            clusters = network.clusters().len(),
            global_coherence = network.global_coherence(),
            "Built resonance network"
        );
        network
    }

    fn random_field<R: Rng + ?Sized>(&self, rng: &mut R) -> Field {
        let id = FieldId::from_rng(rng);
        let category = FieldCategory::random(rng);
        let frequency =
            self.config.base_frequency + self.config.frequency_spread * rng.gen_range(-1.0..=1.0);
        let phase = rng.gen_range(0.0..TAU);
        let (amp_lo, amp_hi) = INITIAL_AMPLITUDE_RANGE;
        let amplitude = rng.gen_range(amp_lo..=amp_hi);
        let angle = rng.gen_range(0.0..TAU);

        Field::new(
            id,
            category,
            frequency,
            amplitude,
            phase,
            Position::on_unit_circle(angle),
        )
        .with_amplitude_bounds(self.amplitude_bounds)
        .with_entropy(self.config.noise_level)
    }
}

/// Greedy spatial clustering in creation order.
///
/// Each unvisited field seeds a cluster and absorbs every unvisited field
/// within `radius` of it. Single-member clusters are discarded.
pub fn form_clusters(fields: &[Field], radius: f64) -> Vec<Cluster> {
    let mut visited = vec![false; fields.len()];
    let mut clusters = Vec::new();

    for (i, center) in fields.iter().enumerate() {
        if visited[i] {
            continue;
        }
        visited[i] = true;
        let mut members = vec![center.id()];
        for (j, candidate) in fields.iter().enumerate().skip(i + 1) {
            if !visited[j] && center.position().distance(&candidate.position()) <= radius {
                visited[j] = true;
                members.push(candidate.id());
            }
        }
        if members.len() > 1 {
            clusters.push(Cluster::new(clusters.len(), center.id(), members));
        }
    }
    clusters
}

/// Validate `config` and build its network with `rng`.
pub fn build_network<R: Rng + ?Sized>(
    config: &EngineConfig,
    rng: &mut R,
) -> ResonanceResult<Network> {
    config.integrator.validate()?;
    let bounds = AmplitudeBounds::new(config.integrator.amplitude_min, config.integrator.amplitude_max);
    let builder = NetworkBuilder::new(config.network.clone())?.with_amplitude_bounds(bounds);
    Ok(builder.build(rng))
}
