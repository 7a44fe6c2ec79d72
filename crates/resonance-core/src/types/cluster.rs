//! Spatial cluster of fields formed at construction time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::FieldId;
use crate::numeric::clamp_unit;

/// Synchronization level above which a cluster is labelled synchronized.
pub const SYNCHRONIZED_LEVEL: f64 = 0.8;

/// Synchronization level above which a cluster is labelled partially synchronized.
pub const PARTIAL_LEVEL: f64 = 0.5;

/// A group of spatially close fields around a designated center.
///
/// Membership is fixed once the network is built; only the derived metrics
/// are refreshed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster index within its network.
    pub id: usize,

    /// The field the cluster was grown from.
    pub center: FieldId,

    /// Member fields, center first.
    pub members: Vec<FieldId>,

    /// Mean member coherence, in [0, 1].
    pub coherence: f64,

    /// Order parameter of member phases, in [0, 1].
    pub synchronization_level: f64,

    /// Mean member stability, in [0, 1].
    pub stability: f64,

    /// Largest member distance from the center.
    pub radius: f64,

    /// Fraction of member pairs that are connected, in [0, 1].
    pub density: f64,

    /// Free-text label describing the cluster's current behaviour.
    pub emergence_pattern: String,

    /// When the derived metrics were last refreshed.
    pub updated_at: DateTime<Utc>,
}

impl Cluster {
    pub fn new(id: usize, center: FieldId, members: Vec<FieldId>) -> Self {
        Self {
            id,
            center,
            members,
            coherence: 0.0,
            synchronization_level: 0.0,
            stability: 0.0,
            radius: 0.0,
            density: 0.0,
            emergence_pattern: "forming".to_string(),
            updated_at: Utc::now(),
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.members.contains(&id)
    }

    /// Store freshly computed metrics and relabel.
    pub fn update_metrics(
        &mut self,
        coherence: f64,
        synchronization_level: f64,
        stability: f64,
        radius: f64,
        density: f64,
    ) {
        self.coherence = clamp_unit(coherence);
        self.synchronization_level = clamp_unit(synchronization_level);
        self.stability = clamp_unit(stability);
        self.radius = if radius.is_finite() { radius.max(0.0) } else { 0.0 };
        self.density = clamp_unit(density);
        self.emergence_pattern = Self::label_for(self.synchronization_level).to_string();
        self.updated_at = Utc::now();
    }

    fn label_for(level: f64) -> &'static str {
        if level >= SYNCHRONIZED_LEVEL {
            "synchronized"
        } else if level >= PARTIAL_LEVEL {
            "partially_synchronized"
        } else {
            "incoherent"
        }
    }
}
