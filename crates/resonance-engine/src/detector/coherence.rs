//! Network coherence metrics.

use serde::{Deserialize, Serialize};

use resonance_core::constants::detection::{
    AMPLITUDE_WEIGHT, FREQUENCY_WEIGHT, HARMONIC_WEIGHT, PHASE_WEIGHT,
};
use resonance_core::numeric::{clamp_unit, mean, order_parameter};
use resonance_core::{Field, Network};

/// Coherence breakdown for a network.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CoherenceMetrics {
    /// `exp(−circular variance)` of the connection phase relations.
    pub phase_coherence: f64,
    /// 1.0 when the network is frequency-locked, else 0.0.
    pub frequency_coherence: f64,
    /// 1.0 when amplitudes are synchronized, else 0.0.
    pub amplitude_coherence: f64,
    /// Mean local field coherence.
    pub harmonic_coherence: f64,
    /// Weighted sum of the four components.
    pub overall_coherence: f64,
    /// `sqrt(overall × (1 − stability) × emergence level)`.
    pub emergence_potential: f64,
}

impl CoherenceMetrics {
    pub fn compute(network: &Network) -> Self {
        if network.is_empty() {
            return Self::default();
        }
        let scalars = network.scalars();

        // Circular variance is maximal (1) when there are no connections.
        let (resultant, _) = order_parameter(network.connections().map(|c| c.phase_relation));
        let phase_coherence = clamp_unit((-(1.0 - resultant)).exp());

        let frequency_coherence = if scalars.frequency_locked { 1.0 } else { 0.0 };
        let amplitude_coherence = if scalars.amplitude_synchronized { 1.0 } else { 0.0 };
        let harmonic_coherence = mean(
            &network
                .fields()
                .iter()
                .map(Field::coherence)
                .collect::<Vec<_>>(),
        );

        let overall_coherence = clamp_unit(
            PHASE_WEIGHT * phase_coherence
                + FREQUENCY_WEIGHT * frequency_coherence
                + AMPLITUDE_WEIGHT * amplitude_coherence
                + HARMONIC_WEIGHT * harmonic_coherence,
        );
        let emergence_potential = clamp_unit(
            (overall_coherence * (1.0 - network.mean_stability()) * network.emergence_level())
                .max(0.0)
                .sqrt(),
        );

        Self {
            phase_coherence,
            frequency_coherence,
            amplitude_coherence,
            harmonic_coherence,
            overall_coherence,
            emergence_potential,
        }
    }
}
