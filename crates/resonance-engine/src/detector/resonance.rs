//! Pairwise and grouped resonance pattern detection.

use std::cmp::Ordering;

use chrono::Utc;

use resonance_core::constants::detection::{
    CHAOS_ENTROPY, CHAOS_FREQUENCY_DIFFERENCE, HARMONIC_RATIOS, PHASE_ALIGNMENT,
};
use resonance_core::metrics::phase_spread;
use resonance_core::numeric::{
    amplitude_ratio, canonical_ratio, clamp_unit, mean, order_parameter, phase_distance, safe_div,
};
use resonance_core::{is_resonant_ratio, DetectorThresholds, Field, PatternType, ResonancePattern};

/// Largest integer multiple considered when grouping a harmonic series.
const MAX_HARMONIC: f64 = 6.0;

/// Sort fields by id so every result is independent of input order.
pub(crate) fn sorted_by_id(fields: &[Field]) -> Vec<&Field> {
    let mut sorted: Vec<&Field> = fields.iter().collect();
    sorted.sort_by_key(|f| f.id());
    sorted
}

fn is_harmonic_ratio(ratio: f64, tolerance: f64) -> bool {
    HARMONIC_RATIOS
        .iter()
        .any(|target| (ratio - target).abs() <= tolerance)
}

/// Classify one pair; first match wins in the order resonance, beating,
/// harmonics, chaos.
pub fn classify_pair(
    a: &Field,
    b: &Field,
    thresholds: &DetectorThresholds,
) -> Option<(PatternType, f64)> {
    let ratio = canonical_ratio(a.frequency(), b.frequency());
    let distance = phase_distance(a.phase(), b.phase());
    let amplitude = amplitude_ratio(a.amplitude(), b.amplitude());
    let coherent = 0.5 * amplitude + 0.25 * a.coherence() + 0.25 * b.coherence();

    let pattern_type = if is_resonant_ratio(ratio, thresholds.resonance_tolerance) {
        if distance <= PHASE_ALIGNMENT {
            PatternType::Resonance
        } else {
            PatternType::Beating
        }
    } else if is_harmonic_ratio(ratio, thresholds.harmonic_tolerance) {
        PatternType::Harmonics
    } else if a.entropy() > CHAOS_ENTROPY
        && b.entropy() > CHAOS_ENTROPY
        && (a.frequency() - b.frequency()).abs() > CHAOS_FREQUENCY_DIFFERENCE
    {
        let strength = 0.5 * amplitude + 0.25 * a.entropy() + 0.25 * b.entropy();
        return Some((PatternType::Chaos, clamp_unit(strength)));
    } else {
        return None;
    };

    Some((pattern_type, clamp_unit(coherent)))
}

/// Pairwise patterns at or above the pattern threshold.
pub fn pairwise_patterns(fields: &[&Field], thresholds: &DetectorThresholds) -> Vec<ResonancePattern> {
    let now = Utc::now();
    let mut patterns = Vec::new();
    for (i, a) in fields.iter().enumerate() {
        for b in &fields[i + 1..] {
            let Some((pattern_type, strength)) = classify_pair(a, b, thresholds) else {
                continue;
            };
            if strength < thresholds.pattern_threshold {
                continue;
            }
            let (low, high) = if a.id() <= b.id() { (a, b) } else { (b, a) };
            patterns.push(ResonancePattern {
                pattern_type,
                participants: vec![low.id(), high.id()],
                strength,
                frequency_ratio: canonical_ratio(a.frequency(), b.frequency()),
                phase_difference: phase_distance(a.phase(), b.phase()),
                detected_at: now,
            });
        }
    }
    patterns
}

/// Multi-field (near-equal frequency) and harmonic-series groups.
///
/// Each pass walks fields in id order; the first unassigned field becomes
/// the base of a group, and groups smaller than the minimum are dropped.
pub fn group_patterns(fields: &[&Field], thresholds: &DetectorThresholds) -> Vec<ResonancePattern> {
    let mut patterns = Vec::new();

    let equal = greedy_groups(fields, |base, candidate| {
        (candidate.frequency() - base.frequency()).abs() <= thresholds.frequency_tolerance
    });
    let harmonic = greedy_groups(fields, |base, candidate| {
        let ratio = safe_div(candidate.frequency(), base.frequency());
        let multiple = ratio.round();
        base.frequency() > 0.0
            && (2.0..=MAX_HARMONIC).contains(&multiple)
            && (ratio - multiple).abs() <= thresholds.harmonic_tolerance
    });

    for (pattern_type, groups) in [
        (PatternType::MultiField, equal),
        (PatternType::HarmonicSeries, harmonic),
    ] {
        for group in groups {
            if group.len() < thresholds.min_group_size {
                continue;
            }
            if let Some(pattern) = group_pattern(pattern_type, &group) {
                if pattern.strength >= thresholds.pattern_threshold {
                    patterns.push(pattern);
                }
            }
        }
    }
    patterns
}

/// Greedy grouping: each unassigned field, in order, seeds a group with
/// every later unassigned field `related` to it.
fn greedy_groups<'a, F>(fields: &[&'a Field], related: F) -> Vec<Vec<&'a Field>>
where
    F: Fn(&Field, &Field) -> bool,
{
    let mut assigned = vec![false; fields.len()];
    let mut groups = Vec::new();
    for (i, base) in fields.iter().enumerate() {
        if assigned[i] {
            continue;
        }
        let mut group = vec![*base];
        for (j, candidate) in fields.iter().enumerate().skip(i + 1) {
            if !assigned[j] && related(*base, *candidate) {
                group.push(*candidate);
                assigned[j] = true;
            }
        }
        if group.len() > 1 {
            assigned[i] = true;
            groups.push(group);
        }
    }
    groups
}

fn group_pattern(pattern_type: PatternType, group: &[&Field]) -> Option<ResonancePattern> {
    let base = group.first()?;
    let coherence = mean(&group.iter().map(|f| f.coherence()).collect::<Vec<_>>());
    let (sync, _) = order_parameter(group.iter().map(|f| f.phase()));
    let frequency_ratio = group
        .iter()
        .map(|f| canonical_ratio(f.frequency(), base.frequency()))
        .fold(1.0, f64::max);

    let mut participants: Vec<_> = group.iter().map(|f| f.id()).collect();
    participants.sort();

    Some(ResonancePattern {
        pattern_type,
        participants,
        strength: clamp_unit(0.5 * coherence + 0.5 * sync),
        frequency_ratio,
        phase_difference: phase_spread(group),
        detected_at: Utc::now(),
    })
}

/// Strength descending; ties broken by type then participants.
pub(crate) fn by_strength_desc(a: &ResonancePattern, b: &ResonancePattern) -> Ordering {
    b.strength
        .total_cmp(&a.strength)
        .then_with(|| a.pattern_type.cmp(&b.pattern_type))
        .then_with(|| a.participants.cmp(&b.participants))
}
