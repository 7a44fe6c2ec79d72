//! Derived-metric refresh for a network.
//!
//! Runs after every full integrator step. Per-field local coherence is
//! computed in parallel over a read-only view; every write happens after
//! that pass completes, followed by connections, clusters and finally the
//! network scalars.

use rayon::prelude::*;

use crate::constants::detection::{AMPLITUDE_TOLERANCE, FREQUENCY_TOLERANCE};
use crate::constants::field::STABILITY_RELAXATION;
use crate::constants::network::PHASE_HISTOGRAM_BINS;
use crate::numeric::{clamp_unit, mean, order_parameter, phase_distance, safe_div};
use crate::types::{Field, Network, NetworkScalars};

/// Recompute every derived value in place, remembering the previous global
/// coherence for transition detection.
pub fn refresh_metrics(network: &mut Network) {
    refresh_local(network);
    let scalars = compute_scalars(network);
    network.update_scalars(scalars);
}

/// Same as [`refresh_metrics`] but without a transition baseline. Used once
/// when a network is built.
pub fn initialize_metrics(network: &mut Network) {
    refresh_local(network);
    let scalars = compute_scalars(network);
    network.initialize_scalars(scalars);
}

fn refresh_local(network: &mut Network) {
    let view: &Network = network;
    let local: Vec<Option<f64>> = (0..view.len())
        .into_par_iter()
        .map(|idx| local_coherence(view, idx))
        .collect();

    for (field, coherence) in network.fields_mut().iter_mut().zip(local) {
        if let Some(coherence) = coherence {
            field.set_coherence(coherence);
        }
        let target = field.coherence() * (1.0 - field.entropy());
        let stability = field.stability() + STABILITY_RELAXATION * (target - field.stability());
        field.set_stability(stability);
        field.record_stability_sample();
        field.touch();
    }

    network.refresh_connections();
    refresh_clusters(network);
}

/// Strength-weighted phase alignment with neighbors, in [0, 1].
///
/// `None` for isolated fields, which keep their current coherence.
fn local_coherence(network: &Network, idx: usize) -> Option<f64> {
    let neighbors = network.neighbors(idx);
    if neighbors.is_empty() {
        return None;
    }
    let fields = network.fields();
    let phase = fields[idx].phase();
    let mut weighted = 0.0;
    let mut total = 0.0;
    for &(j, strength) in neighbors {
        let alignment = (1.0 + (fields[j].phase() - phase).cos()) / 2.0;
        weighted += strength * alignment;
        total += strength;
    }
    if total <= 0.0 {
        let plain: Vec<f64> = neighbors
            .iter()
            .map(|&(j, _)| (1.0 + (fields[j].phase() - phase).cos()) / 2.0)
            .collect();
        return Some(clamp_unit(mean(&plain)));
    }
    Some(clamp_unit(safe_div(weighted, total)))
}

fn refresh_clusters(network: &mut Network) {
    let updates: Vec<(f64, f64, f64, f64, f64)> = network
        .clusters()
        .iter()
        .map(|cluster| {
            let members: Vec<&Field> = cluster
                .members
                .iter()
                .filter_map(|id| network.field(*id).ok())
                .collect();
            let coherence = mean(&members.iter().map(|f| f.coherence()).collect::<Vec<_>>());
            let stability = mean(&members.iter().map(|f| f.stability()).collect::<Vec<_>>());
            let (sync, _) = order_parameter(members.iter().map(|f| f.phase()));

            let radius = match network.field(cluster.center) {
                Ok(center) => members
                    .iter()
                    .map(|f| f.position().distance(&center.position()))
                    .fold(0.0, f64::max),
                Err(_) => 0.0,
            };

            let n = cluster.members.len();
            let possible = n * n.saturating_sub(1) / 2;
            let mut connected = 0usize;
            for (i, a) in cluster.members.iter().enumerate() {
                for b in &cluster.members[i + 1..] {
                    if network.connection_between(*a, *b).is_ok() {
                        connected += 1;
                    }
                }
            }
            let density = if possible == 0 {
                0.0
            } else {
                connected as f64 / possible as f64
            };

            (coherence, sync, stability, radius, density)
        })
        .collect();

    for (cluster, (coherence, sync, stability, radius, density)) in
        network.clusters_mut().iter_mut().zip(updates)
    {
        cluster.update_metrics(coherence, sync, stability, radius, density);
    }
}

/// Compute network scalars from current field and cluster state.
pub fn compute_scalars(network: &Network) -> NetworkScalars {
    let fields = network.fields();
    if fields.is_empty() {
        return NetworkScalars::default();
    }

    let (r, _) = network.order_parameter();
    let network_entropy = (network.mean_entropy() + phase_distribution_entropy(fields)) / 2.0;

    let emergence_level = if network.clusters().is_empty() {
        r
    } else {
        let levels: Vec<f64> = network
            .clusters()
            .iter()
            .map(|c| c.synchronization_level)
            .collect();
        mean(&levels)
    };

    NetworkScalars {
        global_coherence: r,
        network_entropy: clamp_unit(network_entropy),
        emergence_level: clamp_unit(emergence_level),
        frequency_locked: within_spread(fields.iter().map(Field::frequency), FREQUENCY_TOLERANCE),
        amplitude_synchronized: within_spread(
            fields.iter().map(Field::amplitude),
            AMPLITUDE_TOLERANCE,
        ),
    }
}

/// Mean of (mean field stability, global coherence, 1 − network entropy).
///
/// Shared by both controllers; 0 for an empty network.
pub fn stability_score(network: &Network) -> f64 {
    if network.is_empty() {
        return 0.0;
    }
    clamp_unit(
        (network.mean_stability() + network.global_coherence() + (1.0 - network.network_entropy()))
            / 3.0,
    )
}

/// Shannon entropy of the phase histogram, normalized to [0, 1].
pub fn phase_distribution_entropy(fields: &[Field]) -> f64 {
    if fields.is_empty() {
        return 0.0;
    }
    let bin_width = std::f64::consts::TAU / PHASE_HISTOGRAM_BINS as f64;
    let mut bins = [0usize; PHASE_HISTOGRAM_BINS];
    for field in fields {
        let bin = ((field.phase() / bin_width) as usize).min(PHASE_HISTOGRAM_BINS - 1);
        bins[bin] += 1;
    }
    let n = fields.len() as f64;
    let entropy: f64 = bins
        .iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = count as f64 / n;
            -p * p.ln()
        })
        .sum();
    clamp_unit(entropy / (PHASE_HISTOGRAM_BINS as f64).ln())
}

/// Whether every value lies within `tolerance` of the mean.
fn within_spread<I: Iterator<Item = f64>>(values: I, tolerance: f64) -> bool {
    let values: Vec<f64> = values.collect();
    if values.is_empty() {
        return false;
    }
    let centre = mean(&values);
    values.iter().all(|v| (v - centre).abs() <= tolerance)
}

/// Largest pairwise phase distance, in [0, π].
pub fn phase_spread(fields: &[&Field]) -> f64 {
    let mut spread: f64 = 0.0;
    for (i, a) in fields.iter().enumerate() {
        for b in &fields[i + 1..] {
            spread = spread.max(phase_distance(a.phase(), b.phase()));
        }
    }
    spread
}
