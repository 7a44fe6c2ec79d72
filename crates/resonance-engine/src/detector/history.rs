//! Bounded rolling record of emergence events.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use resonance_core::numeric::mean;
use resonance_core::{EmergenceEvent, EmergenceType};

/// Summary of the rolling event history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergenceTrend {
    pub total: usize,
    pub counts: BTreeMap<EmergenceType, usize>,
    pub mean_strength: f64,
    /// Fraction of events synthesized by a controller.
    pub control_induced_fraction: f64,
    pub most_frequent: Option<EmergenceType>,
}

/// FIFO event log; the oldest event is evicted once `cap` is reached.
#[derive(Debug, Clone)]
pub struct EmergenceHistory {
    events: VecDeque<EmergenceEvent>,
    cap: usize,
}

impl EmergenceHistory {
    pub fn new(cap: usize) -> Self {
        let cap = cap.max(1);
        Self {
            events: VecDeque::with_capacity(cap.min(1024)),
            cap,
        }
    }

    pub fn record(&mut self, event: EmergenceEvent) {
        while self.events.len() >= self.cap {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }

    pub fn extend<I: IntoIterator<Item = EmergenceEvent>>(&mut self, events: I) {
        for event in events {
            self.record(event);
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn events(&self) -> &VecDeque<EmergenceEvent> {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn trend(&self) -> EmergenceTrend {
        if self.events.is_empty() {
            return EmergenceTrend::default();
        }
        let mut counts: BTreeMap<EmergenceType, usize> = BTreeMap::new();
        for event in &self.events {
            *counts.entry(event.event_type()).or_insert(0) += 1;
        }
        let strengths: Vec<f64> = self.events.iter().map(EmergenceEvent::strength).collect();
        let induced = self
            .events
            .iter()
            .filter(|e| e.is_control_induced())
            .count();
        // Ties resolve to the earliest type in declaration order.
        let most_frequent = counts
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(t, _)| *t);

        EmergenceTrend {
            total: self.events.len(),
            counts,
            mean_strength: mean(&strengths),
            control_induced_fraction: induced as f64 / self.events.len() as f64,
            most_frequent,
        }
    }
}
