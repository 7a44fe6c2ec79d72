//! Emergence event detection over a refreshed network.
//!
//! Each event type maps to one network-level metric. Threshold-gated types
//! emit an event when their metric exceeds the emergence threshold; phase
//! transitions are gated by the order-parameter change itself.
//! Distributed computation has no observable signature here and is only
//! ever produced by the emergence controller.

use std::collections::BTreeSet;

use resonance_core::constants::detection::{
    AMPLIFICATION_ONSET, CRITICAL_ORDER_PARAMETER, TRANSITION_JUMP,
};
use resonance_core::numeric::{clamp_unit, mean, safe_div};
use resonance_core::{
    stability_score, ConnectionKind, DetectorThresholds, EmergenceEvent, EmergenceType, Field,
    FieldId, Network, ResonancePattern,
};

/// Detect every emergence event the current state supports.
///
/// `patterns` are the resonance patterns already detected on the same
/// state, used for pattern formation.
pub fn detect_events(
    network: &Network,
    patterns: &[ResonancePattern],
    thresholds: &DetectorThresholds,
) -> Vec<EmergenceEvent> {
    if network.is_empty() {
        return Vec::new();
    }
    let stability = stability_score(network);
    let mut events = Vec::new();

    events.extend(spontaneous_synchronization(network, thresholds));
    events.extend(phase_transition(network, stability));
    events.extend(pattern_formation(network, patterns, thresholds, stability));
    events.extend(collective_oscillation(network, thresholds, stability));
    events.extend(information_cascade(network, thresholds, stability));
    events.extend(adaptive_restructuring(network, thresholds, stability));
    events.extend(coherent_amplification(network, thresholds, stability));
    events
}

/// One event per cluster whose synchronization level exceeds the threshold.
fn spontaneous_synchronization(
    network: &Network,
    thresholds: &DetectorThresholds,
) -> Vec<EmergenceEvent> {
    network
        .clusters()
        .iter()
        .filter(|c| c.size() >= thresholds.min_group_size)
        .filter(|c| c.synchronization_level > thresholds.emergence_threshold)
        .map(|c| {
            EmergenceEvent::detected(
                EmergenceType::SpontaneousSynchronization,
                c.synchronization_level,
                c.members.clone(),
                c.stability,
            )
        })
        .collect()
}

/// The order parameter crossed the critical value or jumped by at least
/// [`TRANSITION_JUMP`] since the previous refresh.
fn phase_transition(network: &Network, stability: f64) -> Option<EmergenceEvent> {
    let previous = network.previous_global_coherence()?;
    let current = network.global_coherence();
    let delta = (current - previous).abs();
    let crossed = (previous < CRITICAL_ORDER_PARAMETER) != (current < CRITICAL_ORDER_PARAMETER);
    if !crossed && delta < TRANSITION_JUMP {
        return None;
    }
    let strength = clamp_unit(safe_div(delta, TRANSITION_JUMP));
    Some(EmergenceEvent::detected(
        EmergenceType::PhaseTransition,
        strength,
        network.ids(),
        stability,
    ))
}

/// Coverage of resonance patterns times their mean strength.
fn pattern_formation(
    network: &Network,
    patterns: &[ResonancePattern],
    thresholds: &DetectorThresholds,
    stability: f64,
) -> Option<EmergenceEvent> {
    if patterns.is_empty() {
        return None;
    }
    let participants: BTreeSet<FieldId> = patterns
        .iter()
        .flat_map(|p| p.participants.iter().copied())
        .collect();
    let coverage = participants.len() as f64 / network.len() as f64;
    let strength = mean(&patterns.iter().map(|p| p.strength).collect::<Vec<_>>());
    let metric = clamp_unit(coverage * strength);
    (metric > thresholds.emergence_threshold).then(|| {
        EmergenceEvent::detected(
            EmergenceType::PatternFormation,
            metric,
            participants.into_iter().collect(),
            stability,
        )
    })
}

/// Phase coherence of a frequency-concentrated network.
fn collective_oscillation(
    network: &Network,
    thresholds: &DetectorThresholds,
    stability: f64,
) -> Option<EmergenceEvent> {
    let frequencies: Vec<f64> = network.fields().iter().map(Field::frequency).collect();
    let concentration = if network.scalars().frequency_locked {
        1.0
    } else {
        let centre = mean(&frequencies);
        let spread = mean(
            &frequencies
                .iter()
                .map(|f| (f - centre).abs())
                .collect::<Vec<_>>(),
        );
        clamp_unit(1.0 - safe_div(spread, centre.abs()))
    };
    let metric = clamp_unit(network.global_coherence() * concentration);
    (metric > thresholds.emergence_threshold).then(|| {
        EmergenceEvent::detected(
            EmergenceType::CollectiveOscillation,
            metric,
            network.ids(),
            stability,
        )
    })
}

/// Share of the network in the largest constructively coupled component.
fn information_cascade(
    network: &Network,
    thresholds: &DetectorThresholds,
    stability: f64,
) -> Option<EmergenceEvent> {
    let component = largest_constructive_component(network);
    if component.len() < thresholds.min_group_size {
        return None;
    }
    let metric = component.len() as f64 / network.len() as f64;
    (metric > thresholds.emergence_threshold).then(|| {
        EmergenceEvent::detected(
            EmergenceType::InformationCascade,
            metric,
            component,
            stability,
        )
    })
}

fn largest_constructive_component(network: &Network) -> Vec<FieldId> {
    let n = network.len();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for connection in network.connections() {
        if connection.kind != ConnectionKind::Constructive {
            continue;
        }
        let key = connection.key();
        if let (Ok(a), Ok(b)) = (network.index_of(key.low()), network.index_of(key.high())) {
            adjacency[a].push(b);
            adjacency[b].push(a);
        }
    }

    let mut seen = vec![false; n];
    let mut best: Vec<usize> = Vec::new();
    for start in 0..n {
        if seen[start] || adjacency[start].is_empty() {
            continue;
        }
        seen[start] = true;
        let mut component = vec![start];
        let mut cursor = 0;
        while cursor < component.len() {
            let node = component[cursor];
            cursor += 1;
            for &next in &adjacency[node] {
                if !seen[next] {
                    seen[next] = true;
                    component.push(next);
                }
            }
        }
        if component.len() > best.len() {
            best = component;
        }
    }

    let fields = network.fields();
    let mut ids: Vec<FieldId> = best.into_iter().map(|i| fields[i].id()).collect();
    ids.sort();
    ids
}

/// Share of connections whose classification differs from construction.
fn adaptive_restructuring(
    network: &Network,
    thresholds: &DetectorThresholds,
    stability: f64,
) -> Option<EmergenceEvent> {
    if network.connection_count() == 0 {
        return None;
    }
    let metric = network.reclassified_count() as f64 / network.connection_count() as f64;
    if metric <= thresholds.emergence_threshold {
        return None;
    }
    let participants: BTreeSet<FieldId> = network
        .connections()
        .filter(|c| c.has_reclassified())
        .flat_map(|c| [c.key().low(), c.key().high()])
        .collect();
    Some(EmergenceEvent::detected(
        EmergenceType::AdaptiveRestructuring,
        metric,
        participants.into_iter().collect(),
        stability,
    ))
}

/// Coherent fields whose mean amplitude is past the amplification onset.
fn coherent_amplification(
    network: &Network,
    thresholds: &DetectorThresholds,
    stability: f64,
) -> Option<EmergenceEvent> {
    let amplitudes: Vec<f64> = network.fields().iter().map(Field::amplitude).collect();
    let mean_amplitude = mean(&amplitudes);
    if mean_amplitude <= AMPLIFICATION_ONSET {
        return None;
    }
    let metric = clamp_unit(network.global_coherence() * mean_amplitude / AMPLIFICATION_ONSET);
    (metric > thresholds.emergence_threshold).then(|| {
        EmergenceEvent::detected(
            EmergenceType::CoherentAmplification,
            metric,
            network.ids(),
            stability,
        )
    })
}
