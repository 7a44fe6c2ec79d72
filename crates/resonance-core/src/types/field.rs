//! Field: one coupled oscillator and its local state.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::field::{
    AMPLITUDE_MAX, AMPLITUDE_MIN, INITIAL_COHERENCE, INITIAL_STABILITY, PATTERN_HISTORY_CAP,
    STABILITY_HISTORY_CAP,
};
use crate::numeric::{clamp_range, clamp_unit, finite_or, wrap_phase};

/// Identifier of a field within a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldId(Uuid);

impl FieldId {
    /// Draw a v4-shaped identifier from the supplied generator.
    ///
    /// Identifiers come from the injected generator so seeded builds are
    /// reproducible down to their IDs.
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let bytes: [u8; 16] = rng.gen();
        Self(uuid::Builder::from_random_bytes(bytes).into_uuid())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    #[inline]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Reporting category of a field. Has no effect on dynamics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldCategory {
    Cognitive,
    Semantic,
    Structural,
    Temporal,
    Emergent,
}

impl FieldCategory {
    pub const ALL: [FieldCategory; 5] = [
        FieldCategory::Cognitive,
        FieldCategory::Semantic,
        FieldCategory::Structural,
        FieldCategory::Temporal,
        FieldCategory::Emergent,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cognitive => "cognitive",
            Self::Semantic => "semantic",
            Self::Structural => "structural",
            Self::Temporal => "temporal",
            Self::Emergent => "emergent",
        }
    }
}

/// Planar position used for distances and spatial clustering.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: finite_or(x, 0.0),
            y: finite_or(y, 0.0),
        }
    }

    /// Point on the unit circle at `angle` radians.
    pub fn on_unit_circle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(&self, other: &Position) -> f64 {
        finite_or((self.x - other.x).hypot(self.y - other.y), 0.0)
    }
}

/// Inclusive amplitude clamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmplitudeBounds {
    pub min: f64,
    pub max: f64,
}

impl AmplitudeBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn clamp(&self, amplitude: f64) -> f64 {
        clamp_range(amplitude, self.min, self.max)
    }
}

impl Default for AmplitudeBounds {
    fn default() -> Self {
        Self::new(AMPLITUDE_MIN, AMPLITUDE_MAX)
    }
}

/// A single resonance field.
///
/// Every mutator re-establishes the invariants: amplitude within its
/// bounds, phase in [0, 2π), coherence / entropy / stability in [0, 1],
/// and all of them finite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    id: FieldId,
    category: FieldCategory,
    frequency: f64,
    amplitude: f64,
    phase: f64,
    coherence: f64,
    entropy: f64,
    stability: f64,
    position: Position,
    amplitude_bounds: AmplitudeBounds,
    stability_history: VecDeque<f64>,
    emergence_patterns: VecDeque<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Field {
    /// Create a field with default coherence and stability and zero entropy.
    pub fn new(
        id: FieldId,
        category: FieldCategory,
        frequency: f64,
        amplitude: f64,
        phase: f64,
        position: Position,
    ) -> Self {
        let now = Utc::now();
        let amplitude_bounds = AmplitudeBounds::default();
        Self {
            id,
            category,
            frequency: finite_or(frequency, 0.0),
            amplitude: amplitude_bounds.clamp(amplitude),
            phase: wrap_phase(phase),
            coherence: INITIAL_COHERENCE,
            entropy: 0.0,
            stability: INITIAL_STABILITY,
            position,
            amplitude_bounds,
            stability_history: VecDeque::with_capacity(STABILITY_HISTORY_CAP),
            emergence_patterns: VecDeque::with_capacity(PATTERN_HISTORY_CAP),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_amplitude_bounds(mut self, bounds: AmplitudeBounds) -> Self {
        self.amplitude_bounds = bounds;
        self.amplitude = bounds.clamp(self.amplitude);
        self
    }

    pub fn with_entropy(mut self, entropy: f64) -> Self {
        self.entropy = clamp_unit(entropy);
        self
    }

    pub fn with_coherence(mut self, coherence: f64) -> Self {
        self.coherence = clamp_unit(coherence);
        self
    }

    pub fn with_stability(mut self, stability: f64) -> Self {
        self.stability = clamp_unit(stability);
        self
    }

    #[inline]
    pub fn id(&self) -> FieldId {
        self.id
    }

    #[inline]
    pub fn category(&self) -> FieldCategory {
        self.category
    }

    #[inline]
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    #[inline]
    pub fn amplitude(&self) -> f64 {
        self.amplitude
    }

    #[inline]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    #[inline]
    pub fn coherence(&self) -> f64 {
        self.coherence
    }

    #[inline]
    pub fn entropy(&self) -> f64 {
        self.entropy
    }

    #[inline]
    pub fn stability(&self) -> f64 {
        self.stability
    }

    #[inline]
    pub fn position(&self) -> Position {
        self.position
    }

    #[inline]
    pub fn amplitude_bounds(&self) -> AmplitudeBounds {
        self.amplitude_bounds
    }

    pub fn stability_history(&self) -> &VecDeque<f64> {
        &self.stability_history
    }

    pub fn emergence_patterns(&self) -> &VecDeque<String> {
        &self.emergence_patterns
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Non-finite frequencies are ignored.
    pub fn set_frequency(&mut self, frequency: f64) {
        if frequency.is_finite() {
            self.frequency = frequency;
        }
    }

    pub fn set_amplitude(&mut self, amplitude: f64) {
        self.amplitude = self.amplitude_bounds.clamp(amplitude);
    }

    pub fn set_phase(&mut self, phase: f64) {
        self.phase = wrap_phase(phase);
    }

    pub fn set_coherence(&mut self, coherence: f64) {
        self.coherence = clamp_unit(coherence);
    }

    pub fn set_entropy(&mut self, entropy: f64) {
        self.entropy = clamp_unit(entropy);
    }

    pub fn set_stability(&mut self, stability: f64) {
        self.stability = clamp_unit(stability);
    }

    /// Apply one integration result in a single write.
    pub fn advance(&mut self, phase: f64, amplitude: f64, now: DateTime<Utc>) {
        self.phase = wrap_phase(phase);
        self.amplitude = self.amplitude_bounds.clamp(amplitude);
        self.updated_at = now;
    }

    /// Append the current stability to the bounded sample log.
    pub fn record_stability_sample(&mut self) {
        if self.stability_history.len() == STABILITY_HISTORY_CAP {
            self.stability_history.pop_front();
        }
        self.stability_history.push_back(self.stability);
    }

    /// Append an observed emergence pattern tag to the bounded log.
    pub fn record_pattern(&mut self, tag: impl Into<String>) {
        if self.emergence_patterns.len() == PATTERN_HISTORY_CAP {
            self.emergence_patterns.pop_front();
        }
        self.emergence_patterns.push_back(tag.into());
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
