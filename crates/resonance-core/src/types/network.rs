//! The resonance network: fields, connections, clusters and summaries.

use std::collections::{BTreeMap, HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use super::cluster::Cluster;
use super::connection::{classify, Connection, ConnectionKey, ConnectionKind};
use super::field::{Field, FieldId};
use super::pattern::SynchronizationPattern;
use crate::constants::network::SYNC_PATTERN_LOG_CAP;
use crate::error::{ResonanceError, ResonanceResult};
use crate::numeric::{clamp_unit, finite_or, mean, order_parameter};

/// Network-wide summary values, refreshed after each full step.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NetworkScalars {
    /// Kuramoto order parameter r over all fields.
    pub global_coherence: f64,
    pub network_entropy: f64,
    pub emergence_level: f64,
    /// Every field frequency within tolerance of the mean.
    pub frequency_locked: bool,
    /// Every field amplitude within tolerance of the mean.
    pub amplitude_synchronized: bool,
}

impl NetworkScalars {
    fn sanitized(self) -> Self {
        Self {
            global_coherence: clamp_unit(self.global_coherence),
            network_entropy: clamp_unit(self.network_entropy),
            emergence_level: clamp_unit(self.emergence_level),
            ..self
        }
    }
}

/// Serializable overview of a network's state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkSummary {
    pub field_count: usize,
    pub connection_count: usize,
    pub cluster_count: usize,
    pub steps: u64,
    pub elapsed: f64,
    pub scalars: NetworkScalars,
    pub mean_stability: f64,
    pub reclassified_connections: usize,
    pub sync_patterns_logged: usize,
}

/// A graph of coupled fields.
///
/// Owns every field and connection. Connections are keyed by
/// [`ConnectionKey`], so lookups do not depend on endpoint order, and are
/// stored in key order so iteration is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Network {
    fields: Vec<Field>,
    index: HashMap<FieldId, usize>,
    connections: BTreeMap<ConnectionKey, Connection>,
    adjacency: Vec<Vec<(usize, f64)>>,
    clusters: Vec<Cluster>,
    scalars: NetworkScalars,
    previous_global_coherence: Option<f64>,
    sync_patterns: VecDeque<SynchronizationPattern>,
    elapsed: f64,
    steps: u64,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Identifiers must be unique.
    pub fn insert_field(&mut self, field: Field) -> ResonanceResult<()> {
        if self.index.contains_key(&field.id()) {
            return Err(ResonanceError::invalid_parameter(format!(
                "duplicate field id {}",
                field.id()
            )));
        }
        self.index.insert(field.id(), self.fields.len());
        self.fields.push(field);
        self.adjacency.push(Vec::new());
        Ok(())
    }

    /// Connect two existing fields, classifying the edge from their current
    /// state. Reconnecting an existing pair replaces the edge.
    pub fn connect(&mut self, a: FieldId, b: FieldId, strength: f64) -> ResonanceResult<ConnectionKey> {
        if a == b {
            return Err(ResonanceError::invalid_parameter(format!(
                "cannot connect field {} to itself",
                a
            )));
        }
        let key = ConnectionKey::new(a, b);
        let low_idx = self.index_of(key.low())?;
        let high_idx = self.index_of(key.high())?;

        let connection = Connection::new(&self.fields[low_idx], &self.fields[high_idx], strength);
        let strength = connection.strength;

        self.adjacency[low_idx].retain(|(n, _)| *n != high_idx);
        self.adjacency[high_idx].retain(|(n, _)| *n != low_idx);
        self.adjacency[low_idx].push((high_idx, strength));
        self.adjacency[high_idx].push((low_idx, strength));
        self.connections.insert(key, connection);
        Ok(key)
    }

    pub fn set_clusters(&mut self, clusters: Vec<Cluster>) {
        self.clusters = clusters;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in creation order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Mutable fields in creation order. Field setters keep every field
    /// invariant; the set of fields itself cannot change through this.
    pub fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    pub fn ids(&self) -> Vec<FieldId> {
        self.fields.iter().map(Field::id).collect()
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.index.contains_key(&id)
    }

    /// Position of `id` in [`Network::fields`].
    pub fn index_of(&self, id: FieldId) -> ResonanceResult<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(ResonanceError::UnknownField { id })
    }

    pub fn field(&self, id: FieldId) -> ResonanceResult<&Field> {
        let idx = self.index_of(id)?;
        Ok(&self.fields[idx])
    }

    pub fn field_mut(&mut self, id: FieldId) -> ResonanceResult<&mut Field> {
        let idx = self.index_of(id)?;
        Ok(&mut self.fields[idx])
    }

    /// Connections in key order.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn connection(&self, key: ConnectionKey) -> ResonanceResult<&Connection> {
        self.connections
            .get(&key)
            .ok_or(ResonanceError::UnknownConnection { key })
    }

    pub fn connection_between(&self, a: FieldId, b: FieldId) -> ResonanceResult<&Connection> {
        self.connection(ConnectionKey::new(a, b))
    }

    /// Classify a connection from its endpoints' current state, without
    /// storing the result.
    pub fn classify_connection(&self, key: ConnectionKey) -> ResonanceResult<ConnectionKind> {
        if !self.connections.contains_key(&key) {
            return Err(ResonanceError::UnknownConnection { key });
        }
        let low = self.field(key.low())?;
        let high = self.field(key.high())?;
        Ok(classify(low, high))
    }

    /// `(neighbor index, strength)` pairs for the field at `idx`.
    pub fn neighbors(&self, idx: usize) -> &[(usize, f64)] {
        self.adjacency.get(idx).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Re-derive every connection's relation values and classification.
    pub fn refresh_connections(&mut self) {
        let fields = &self.fields;
        let index = &self.index;
        for (key, connection) in self.connections.iter_mut() {
            if let (Some(&low), Some(&high)) = (index.get(&key.low()), index.get(&key.high())) {
                connection.refresh(&fields[low], &fields[high]);
            }
        }
    }

    /// Number of connections whose classification differs from the one
    /// assigned at construction.
    pub fn reclassified_count(&self) -> usize {
        self.connections
            .values()
            .filter(|c| c.has_reclassified())
            .count()
    }

    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn clusters_mut(&mut self) -> &mut [Cluster] {
        &mut self.clusters
    }

    #[inline]
    pub fn scalars(&self) -> NetworkScalars {
        self.scalars
    }

    #[inline]
    pub fn global_coherence(&self) -> f64 {
        self.scalars.global_coherence
    }

    #[inline]
    pub fn network_entropy(&self) -> f64 {
        self.scalars.network_entropy
    }

    #[inline]
    pub fn emergence_level(&self) -> f64 {
        self.scalars.emergence_level
    }

    /// Global coherence as of the refresh before the latest one.
    pub fn previous_global_coherence(&self) -> Option<f64> {
        self.previous_global_coherence
    }

    /// Store freshly computed summaries, remembering the prior coherence.
    pub fn update_scalars(&mut self, scalars: NetworkScalars) {
        self.previous_global_coherence = Some(self.scalars.global_coherence);
        self.scalars = scalars.sanitized();
    }

    /// Seed the summaries without recording a transition baseline.
    pub fn initialize_scalars(&mut self, scalars: NetworkScalars) {
        self.previous_global_coherence = None;
        self.scalars = scalars.sanitized();
    }

    /// Kuramoto order parameter `(r, ψ)` over all fields.
    pub fn order_parameter(&self) -> (f64, f64) {
        order_parameter(self.fields.iter().map(Field::phase))
    }

    pub fn mean_stability(&self) -> f64 {
        let values: Vec<f64> = self.fields.iter().map(Field::stability).collect();
        mean(&values)
    }

    pub fn mean_entropy(&self) -> f64 {
        let values: Vec<f64> = self.fields.iter().map(Field::entropy).collect();
        mean(&values)
    }

    /// Append to the chronological synchronization-pattern log, evicting the
    /// oldest entries past the cap.
    pub fn record_sync_pattern(&mut self, pattern: SynchronizationPattern) {
        if self.sync_patterns.len() == SYNC_PATTERN_LOG_CAP {
            self.sync_patterns.pop_front();
        }
        self.sync_patterns.push_back(pattern);
    }

    pub fn sync_patterns(&self) -> &VecDeque<SynchronizationPattern> {
        &self.sync_patterns
    }

    /// Advance the simulated clock by one step of `dt`.
    pub fn advance_clock(&mut self, dt: f64) {
        self.elapsed = finite_or(self.elapsed + dt, self.elapsed);
        self.steps += 1;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn summary(&self) -> NetworkSummary {
        NetworkSummary {
            field_count: self.fields.len(),
            connection_count: self.connections.len(),
            cluster_count: self.clusters.len(),
            steps: self.steps,
            elapsed: self.elapsed,
            scalars: self.scalars,
            mean_stability: self.mean_stability(),
            reclassified_connections: self.reclassified_count(),
            sync_patterns_logged: self.sync_patterns.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::field::{FieldCategory, Position};
    use crate::types::pattern::SyncType;
    use chrono::Utc;
    use std::f64::consts::PI;
    use uuid::Uuid;

    fn id(n: u128) -> FieldId {
        FieldId::from_uuid(Uuid::from_u128(n))
    }

    fn network_of(phases: &[f64]) -> Network {
        let mut network = Network::new();
        for (i, phase) in phases.iter().enumerate() {
            let field = Field::new(
                id(i as u128 + 1),
                FieldCategory::Structural,
                1.0,
                1.0,
                *phase,
                Position::default(),
            );
            network.insert_field(field).expect("unique id");
        }
        network
    }

    #[test]
    fn test_connection_lookup_is_order_independent() {
        let mut network = network_of(&[0.0, 0.1]);
        network.connect(id(2), id(1), 0.4).expect("connect");

        let forward = network.connection_between(id(1), id(2)).expect("forward");
        let backward = network.connection_between(id(2), id(1)).expect("backward");
        assert_eq!(forward.key(), backward.key());
        assert_eq!(network.neighbors(0), &[(1, 0.4)]);
        assert_eq!(network.neighbors(1), &[(0, 0.4)]);
        println!("[PASS] connection lookup is order independent");
    }

    #[test]
    fn test_unknown_ids_are_distinct_errors() {
        let network = network_of(&[0.0, 0.1]);
        assert!(matches!(
            network.field(id(99)),
            Err(ResonanceError::UnknownField { .. })
        ));
        assert!(matches!(
            network.classify_connection(ConnectionKey::new(id(1), id(2))),
            Err(ResonanceError::UnknownConnection { .. })
        ));
        println!("[PASS] unknown field and connection are distinct errors");
    }

    #[test]
    fn test_duplicate_and_self_connections_rejected() {
        let mut network = network_of(&[0.0]);
        let duplicate = Field::new(
            id(1),
            FieldCategory::Cognitive,
            1.0,
            1.0,
            0.0,
            Position::default(),
        );
        assert!(network.insert_field(duplicate).is_err());
        assert!(network.connect(id(1), id(1), 0.5).is_err());
        assert!(matches!(
            network.connect(id(1), id(7), 0.5),
            Err(ResonanceError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_refresh_reclassifies_from_current_state() {
        let mut network = network_of(&[0.0, 0.1]);
        let key = network.connect(id(1), id(2), 0.5).expect("connect");
        assert_eq!(network.connection(key).expect("edge").kind, ConnectionKind::Constructive);

        network.field_mut(id(2)).expect("field").set_phase(PI);
        assert_eq!(
            network.classify_connection(key).expect("classify"),
            ConnectionKind::Destructive
        );
        assert_eq!(network.reclassified_count(), 0);

        network.refresh_connections();
        assert_eq!(network.reclassified_count(), 1);
        println!("[PASS] refresh re-derives classification");
    }

    #[test]
    fn test_scalars_track_previous_coherence() {
        let mut network = network_of(&[0.0, 0.0]);
        assert_eq!(network.previous_global_coherence(), None);
        network.initialize_scalars(NetworkScalars {
            global_coherence: 0.4,
            ..Default::default()
        });
        network.update_scalars(NetworkScalars {
            global_coherence: 1.7,
            network_entropy: f64::NAN,
            ..Default::default()
        });
        assert_eq!(network.previous_global_coherence(), Some(0.4));
        assert_eq!(network.global_coherence(), 1.0);
        assert_eq!(network.network_entropy(), 0.0);
        let (r, _) = network.order_parameter();
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_sync_pattern_log_is_bounded() {
        let mut network = network_of(&[0.0]);
        for _ in 0..(SYNC_PATTERN_LOG_CAP + 10) {
            network.record_sync_pattern(SynchronizationPattern {
                sync_type: SyncType::PhaseLock,
                participants: vec![id(1)],
                strength: 0.9,
                phase_coherence: 1.0,
                mean_frequency: 1.0,
                detected_at: Utc::now(),
            });
        }
        assert_eq!(network.sync_patterns().len(), SYNC_PATTERN_LOG_CAP);
    }

    #[test]
    fn test_empty_network_is_valid() {
        let network = Network::new();
        assert!(network.is_empty());
        assert_eq!(network.order_parameter(), (0.0, 0.0));
        assert_eq!(network.mean_stability(), 0.0);
        assert!(network.neighbors(3).is_empty());
        let summary = network.summary();
        assert_eq!(summary.field_count, 0);
    }
}
