//! Synchronization group detection.

use std::cmp::Ordering;

use chrono::Utc;

use resonance_core::numeric::{clamp_unit, mean, order_parameter, phase_distance, safe_div};
use resonance_core::{DetectorThresholds, Field, SyncType, SynchronizationPattern};

/// Phase-locked, frequency-matched and amplitude-synchronized groups, plus a
/// network-wide emergent-coherence pattern, at or above the sync threshold.
///
/// `fields` must already be in id order.
pub fn sync_patterns(fields: &[&Field], thresholds: &DetectorThresholds) -> Vec<SynchronizationPattern> {
    let mut patterns = Vec::new();

    let phase_groups = greedy_groups(fields, |base, candidate| {
        phase_distance(base.phase(), candidate.phase()) <= thresholds.phase_tolerance
    });
    let frequency_groups = greedy_groups(fields, |base, candidate| {
        (base.frequency() - candidate.frequency()).abs() <= thresholds.frequency_tolerance
    });
    let amplitude_groups = greedy_groups(fields, |base, candidate| {
        (base.amplitude() - candidate.amplitude()).abs() <= thresholds.amplitude_tolerance
    });

    for group in phase_groups {
        if group.len() >= thresholds.min_group_size {
            let (r, _) = order_parameter(group.iter().map(|f| f.phase()));
            patterns.push(pattern(SyncType::PhaseLock, &group, r));
        }
    }
    for group in frequency_groups {
        if group.len() >= thresholds.min_group_size {
            let tightness = tightness(&group, Field::frequency, thresholds.frequency_tolerance);
            let (r, _) = order_parameter(group.iter().map(|f| f.phase()));
            patterns.push(pattern(SyncType::FrequencyMatch, &group, 0.5 * tightness + 0.5 * r));
        }
    }
    for group in amplitude_groups {
        if group.len() >= thresholds.min_group_size {
            let tightness = tightness(&group, Field::amplitude, thresholds.amplitude_tolerance);
            let (r, _) = order_parameter(group.iter().map(|f| f.phase()));
            patterns.push(pattern(SyncType::AmplitudeSync, &group, 0.5 * tightness + 0.5 * r));
        }
    }

    if fields.len() >= thresholds.min_group_size {
        let (r, _) = order_parameter(fields.iter().map(|f| f.phase()));
        if r > thresholds.coherence_threshold {
            patterns.push(pattern(SyncType::EmergentCoherence, fields, r));
        }
    }

    patterns.retain(|p| p.strength >= thresholds.sync_threshold);
    patterns.sort_by(by_strength_desc);
    patterns
}

fn greedy_groups<'a, F>(fields: &[&'a Field], related: F) -> Vec<Vec<&'a Field>>
where
    F: Fn(&Field, &Field) -> bool,
{
    let mut assigned = vec![false; fields.len()];
    let mut groups = Vec::new();
    for i in 0..fields.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;
        let base = fields[i];
        let mut group = vec![base];
        for j in (i + 1)..fields.len() {
            if !assigned[j] && related(base, fields[j]) {
                assigned[j] = true;
                group.push(fields[j]);
            }
        }
        groups.push(group);
    }
    groups
}

/// `1 − mean |x − mean x| / tolerance`, in [0, 1].
fn tightness(group: &[&Field], value: fn(&Field) -> f64, tolerance: f64) -> f64 {
    let values: Vec<f64> = group.iter().map(|f| value(f)).collect();
    let centre = mean(&values);
    let deviation = mean(&values.iter().map(|v| (v - centre).abs()).collect::<Vec<_>>());
    clamp_unit(1.0 - safe_div(deviation, tolerance))
}

fn pattern(sync_type: SyncType, group: &[&Field], strength: f64) -> SynchronizationPattern {
    let mut participants: Vec<_> = group.iter().map(|f| f.id()).collect();
    participants.sort();
    let (phase_coherence, _) = order_parameter(group.iter().map(|f| f.phase()));
    SynchronizationPattern {
        sync_type,
        participants,
        strength: clamp_unit(strength),
        phase_coherence,
        mean_frequency: mean(&group.iter().map(|f| f.frequency()).collect::<Vec<_>>()),
        detected_at: Utc::now(),
    }
}

fn by_strength_desc(a: &SynchronizationPattern, b: &SynchronizationPattern) -> Ordering {
    b.strength
        .total_cmp(&a.strength)
        .then_with(|| a.sync_type.cmp(&b.sync_type))
        .then_with(|| a.participants.cmp(&b.participants))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::resonance::sorted_by_id;
    use resonance_core::{FieldCategory, FieldId, Position};
    use std::f64::consts::TAU;
    use uuid::Uuid;

    fn field(n: u128, frequency: f64, amplitude: f64, phase: f64) -> Field {
        Field::new(
            FieldId::from_uuid(Uuid::from_u128(n)),
            FieldCategory::Cognitive,
            frequency,
            amplitude,
            phase,
            Position::default(),
        )
    }

    #[test]
    fn test_phase_lock_wraps_around_zero() {
        let fields = vec![
            field(1, 1.0, 0.5, 0.05),
            field(2, 2.0, 1.0, TAU - 0.05),
            field(3, 3.0, 1.5, 0.1),
            field(4, 4.0, 1.9, 3.0),
        ];
        let patterns = sync_patterns(&sorted_by_id(&fields), &DetectorThresholds::default());
        let lock = patterns
            .iter()
            .find(|p| p.sync_type == SyncType::PhaseLock)
            .expect("phase lock across wraparound");
        assert_eq!(lock.size(), 3);
        assert!(lock.strength > 0.9);
        println!("[PASS] phase lock detected across 0/2π");
    }

    #[test]
    fn test_fully_synchronized_network_reports_all_kinds() {
        let fields: Vec<Field> = (1..=5).map(|n| field(n, 1.0, 1.0, 0.3)).collect();
        let patterns = sync_patterns(&sorted_by_id(&fields), &DetectorThresholds::default());
        for kind in [
            SyncType::PhaseLock,
            SyncType::FrequencyMatch,
            SyncType::AmplitudeSync,
            SyncType::EmergentCoherence,
        ] {
            assert!(patterns.iter().any(|p| p.sync_type == kind), "missing {:?}", kind);
        }
        assert!(patterns.windows(2).all(|w| w[0].strength >= w[1].strength));
    }

    #[test]
    fn test_small_or_scattered_sets_yield_nothing() {
        let pair = vec![field(1, 1.0, 1.0, 0.0), field(2, 1.0, 1.0, 0.0)];
        assert!(sync_patterns(&sorted_by_id(&pair), &DetectorThresholds::default()).is_empty());

        let scattered: Vec<Field> = (0..6)
            .map(|n| field(n as u128 + 1, 1.0 + n as f64, 0.2 + 0.3 * n as f64, n as f64))
            .collect();
        assert!(sync_patterns(&sorted_by_id(&scattered), &DetectorThresholds::default()).is_empty());
    }
}
