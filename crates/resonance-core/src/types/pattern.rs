//! Detection result records: pairwise/grouped resonance patterns and
//! synchronization patterns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::FieldId;

/// Kind of resonance relation found between fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// Resonant frequency ratio with aligned phases.
    Resonance,
    /// Resonant frequency ratio, misaligned phases.
    Beating,
    /// Integer frequency ratio.
    Harmonics,
    /// Two high-entropy fields with distinct frequencies.
    Chaos,
    /// Three or more fields at near-equal frequency.
    MultiField,
    /// Three or more fields at integer multiples of a base frequency.
    HarmonicSeries,
}

/// A resonance relation between two or more fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResonancePattern {
    pub pattern_type: PatternType,
    /// Participants in ascending id order.
    pub participants: Vec<FieldId>,
    /// Pattern strength, in [0, 1].
    pub strength: f64,
    /// Canonical (≥ 1) frequency ratio; for groups, the largest ratio to the base.
    pub frequency_ratio: f64,
    /// Minimal phase distance in [0, π]; for groups, the largest pairwise distance.
    pub phase_difference: f64,
    pub detected_at: DateTime<Utc>,
}

/// Kind of synchronization among a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncType {
    PhaseLock,
    FrequencyMatch,
    AmplitudeSync,
    /// Network-wide phase coherence.
    EmergentCoherence,
}

/// A group of fields sharing phase, frequency or amplitude.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynchronizationPattern {
    pub sync_type: SyncType,
    /// Participants in ascending id order.
    pub participants: Vec<FieldId>,
    /// Strength in [0, 1].
    pub strength: f64,
    /// Order parameter of the participants' phases.
    pub phase_coherence: f64,
    pub mean_frequency: f64,
    pub detected_at: DateTime<Utc>,
}

impl SynchronizationPattern {
    #[inline]
    pub fn size(&self) -> usize {
        self.participants.len()
    }
}
