//! Core data model.

pub mod cluster;
pub mod connection;
pub mod event;
pub mod feedback;
pub mod field;
pub mod network;
pub mod pattern;

pub use cluster::Cluster;
pub use connection::{classify, is_resonant_ratio, Connection, ConnectionKey, ConnectionKind};
pub use event::{
    EmergenceEvent, EmergenceType, EventOrigin, Propagation, PropagationDirection, Waveform,
    TAG_CONTROL_INDUCED, TAG_DETECTED, TAG_PARTIAL, TAG_TIMEOUT,
};
pub use feedback::ControlFeedback;
pub use field::{AmplitudeBounds, Field, FieldCategory, FieldId, Position};
pub use network::{Network, NetworkScalars, NetworkSummary};
pub use pattern::{PatternType, ResonancePattern, SyncType, SynchronizationPattern};
