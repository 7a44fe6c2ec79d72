//! Connections between fields and the classification rule that types them.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::field::{Field, FieldId};
use crate::constants::detection::{
    PHASE_ALIGNMENT, PHASE_OPPOSITION, RESONANCE_TOLERANCE, RESONANT_RATIOS,
};
use crate::numeric::{
    canonical_ratio, clamp_unit, finite_or, phase_distance, safe_div, signed_phase_difference,
};

/// Order-independent connection identifier.
///
/// The endpoints are stored sorted, so `new(a, b) == new(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionKey {
    low: FieldId,
    high: FieldId,
}

impl ConnectionKey {
    pub fn new(a: FieldId, b: FieldId) -> Self {
        if a <= b {
            Self { low: a, high: b }
        } else {
            Self { low: b, high: a }
        }
    }

    #[inline]
    pub fn low(&self) -> FieldId {
        self.low
    }

    #[inline]
    pub fn high(&self) -> FieldId {
        self.high
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.low == id || self.high == id
    }

    /// The endpoint opposite `id`, if `id` is an endpoint.
    pub fn other(&self, id: FieldId) -> Option<FieldId> {
        if self.low == id {
            Some(self.high)
        } else if self.high == id {
            Some(self.low)
        } else {
            None
        }
    }
}

impl fmt::Display for ConnectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}--{}", self.low, self.high)
    }
}

/// Interaction type of a connection, derived from its endpoints' state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionKind {
    /// Resonant frequency ratio with aligned phases.
    Constructive,
    /// Phases in opposition.
    Destructive,
    /// Resonant frequency ratio, phases neither aligned nor opposed.
    Adaptive,
    /// No resonant relation.
    Neutral,
}

/// Whether `ratio` (canonical, ≥ 1) is within `tolerance` of a resonant ratio.
pub fn is_resonant_ratio(ratio: f64, tolerance: f64) -> bool {
    RESONANT_RATIOS
        .iter()
        .any(|target| (ratio - target).abs() <= tolerance)
}

/// Classify the relation between two fields.
///
/// ```text
/// phase distance ≥ 3π/4                  → Destructive
/// resonant ratio and distance ≤ π/4      → Constructive
/// resonant ratio                          → Adaptive
/// otherwise                               → Neutral
/// ```
///
/// Pure and symmetric in its arguments: the same rule is used when a
/// connection is created and every time it is refreshed.
pub fn classify(a: &Field, b: &Field) -> ConnectionKind {
    let distance = phase_distance(a.phase(), b.phase());
    let ratio = canonical_ratio(a.frequency(), b.frequency());

    if distance >= PHASE_OPPOSITION {
        ConnectionKind::Destructive
    } else if is_resonant_ratio(ratio, RESONANCE_TOLERANCE) {
        if distance <= PHASE_ALIGNMENT {
            ConnectionKind::Constructive
        } else {
            ConnectionKind::Adaptive
        }
    } else {
        ConnectionKind::Neutral
    }
}

/// Weighted, typed edge between two fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    key: ConnectionKey,
    /// Coupling strength, `coupling / (1 + distance)`.
    pub strength: f64,
    /// Current classification.
    pub kind: ConnectionKind,
    /// Classification before the most recent refresh.
    pub previous_kind: ConnectionKind,
    /// Classification assigned at construction.
    pub initial_kind: ConnectionKind,
    /// Signed phase difference `low − high`, in (−π, π].
    pub phase_relation: f64,
    /// Frequency ratio `low / high`.
    pub frequency_ratio: f64,
    /// Strength-weighted phase alignment, in [0, strength].
    pub coherence_contribution: f64,
    /// Alignment weighted by endpoint amplitudes, in [0, strength].
    pub emergence_contribution: f64,
}

impl Connection {
    /// Create a connection between `low` and `high`, classified from their
    /// current state.
    ///
    /// Callers pass the endpoints in key order (see [`ConnectionKey`]).
    pub fn new(low: &Field, high: &Field, strength: f64) -> Self {
        let key = ConnectionKey::new(low.id(), high.id());
        let kind = classify(low, high);
        let mut connection = Self {
            key,
            strength: finite_or(strength, 0.0).max(0.0),
            kind,
            previous_kind: kind,
            initial_kind: kind,
            phase_relation: 0.0,
            frequency_ratio: 1.0,
            coherence_contribution: 0.0,
            emergence_contribution: 0.0,
        };
        connection.update_relation(low, high);
        connection
    }

    #[inline]
    pub fn key(&self) -> ConnectionKey {
        self.key
    }

    /// Recompute relation values and classification from the endpoints.
    ///
    /// `low` and `high` must be the fields named by the key's `low()` and
    /// `high()` respectively.
    pub fn refresh(&mut self, low: &Field, high: &Field) {
        self.previous_kind = self.kind;
        self.kind = classify(low, high);
        self.update_relation(low, high);
    }

    /// Whether the classification changed since construction.
    pub fn has_reclassified(&self) -> bool {
        self.kind != self.initial_kind
    }

    fn update_relation(&mut self, low: &Field, high: &Field) {
        self.phase_relation = signed_phase_difference(low.phase(), high.phase());
        self.frequency_ratio = safe_div(low.frequency(), high.frequency());
        let alignment = (1.0 + self.phase_relation.cos()) / 2.0;
        self.coherence_contribution = self.strength * clamp_unit(alignment);
        let drive = clamp_unit((low.amplitude() * high.amplitude()).sqrt());
        self.emergence_contribution = self.coherence_contribution * drive;
    }
}
