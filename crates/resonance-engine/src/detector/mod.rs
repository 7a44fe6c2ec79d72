//! Pattern and emergence detection.
//!
//! Every detection is a function of the current state; the only state the
//! detector keeps is the rolling event history used for trend reporting.
//!
//! # Components
//!
//! - [`resonance`]: pairwise and grouped resonance patterns
//! - [`synchronization`]: phase / frequency / amplitude groups
//! - [`emergence`]: network-level emergence events
//! - [`coherence`]: coherence breakdown
//! - [`history`]: bounded event history and trend summary

pub mod coherence;
pub mod emergence;
pub mod history;
pub mod resonance;
pub mod synchronization;

use tracing::debug;

use resonance_core::{
    DetectorThresholds, EmergenceEvent, Field, Network, ResonancePattern, ResonanceResult,
    SynchronizationPattern,
};

pub use coherence::CoherenceMetrics;
pub use history::{EmergenceHistory, EmergenceTrend};

/// Detector with configurable thresholds and a bounded event history.
#[derive(Debug, Clone)]
pub struct EmergenceDetector {
    thresholds: DetectorThresholds,
    history: EmergenceHistory,
}

impl EmergenceDetector {
    pub fn new(thresholds: DetectorThresholds) -> ResonanceResult<Self> {
        thresholds.validate()?;
        let history = EmergenceHistory::new(thresholds.history_cap);
        Ok(Self {
            thresholds,
            history,
        })
    }

    pub fn thresholds(&self) -> &DetectorThresholds {
        &self.thresholds
    }

    /// Resonance patterns at or above the pattern threshold, strongest first.
    ///
    /// Input order does not affect the result.
    pub fn detect_patterns(&self, fields: &[Field]) -> Vec<ResonancePattern> {
        let sorted = resonance::sorted_by_id(fields);
        let mut patterns = resonance::pairwise_patterns(&sorted, &self.thresholds);
        patterns.extend(resonance::group_patterns(&sorted, &self.thresholds));
        patterns.sort_by(resonance::by_strength_desc);
        debug!(fields = fields.len(), patterns = patterns.len(), "Detected resonance patterns");
        patterns
    }

    /// Synchronization groups at or above the sync threshold, strongest first.
    pub fn detect_synchronization(&self, fields: &[Field]) -> Vec<SynchronizationPattern> {
        let sorted = resonance::sorted_by_id(fields);
        let patterns = synchronization::sync_patterns(&sorted, &self.thresholds);
        debug!(fields = fields.len(), patterns = patterns.len(), "Detected synchronization");
        patterns
    }

    /// Detect synchronization and append the results to the network's
    /// chronological log.
    pub fn record_synchronization(&self, network: &mut Network) -> Vec<SynchronizationPattern> {
        let patterns = self.detect_synchronization(network.fields());
        for pattern in &patterns {
            network.record_sync_pattern(pattern.clone());
        }
        patterns
    }

    /// Emergence events supported by the current state, strongest first.
    /// Each event is also appended to the rolling history.
    pub fn detect_emergence(&mut self, network: &Network) -> Vec<EmergenceEvent> {
        let patterns = self.detect_patterns(network.fields());
        let mut events = emergence::detect_events(network, &patterns, &self.thresholds);
        events.sort_by(|a, b| {
            b.strength()
                .total_cmp(&a.strength())
                .then_with(|| a.event_type().cmp(&b.event_type()))
        });
        self.history.extend(events.iter().cloned());
        debug!(
            events = events.len(),
            history = self.history.len(),
            "Detected emergence"
        );
        events
    }

    pub fn detect_coherence(&self, network: &Network) -> CoherenceMetrics {
        CoherenceMetrics::compute(network)
    }

    /// Append an externally produced event, such as a controller fallback.
    pub fn record_event(&mut self, event: EmergenceEvent) {
        self.history.record(event);
    }

    pub fn history(&self) -> &EmergenceHistory {
        &self.history
    }

    pub fn trend(&self) -> EmergenceTrend {
        self.history.trend()
    }
}

/// Tag each participant field with the types of the events it took part in.
pub fn annotate_participants(network: &mut Network, events: &[EmergenceEvent]) {
    for event in events {
        for id in event.participants() {
            if let Ok(field) = network.field_mut(*id) {
                field.record_pattern(event.event_type().name());
            }
        }
    }
}
