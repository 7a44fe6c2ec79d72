//! Emergence events and their propagation descriptors.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::field::FieldId;
use crate::error::ResonanceError;
use crate::numeric::clamp_unit;

/// Precursor tag carried by events synthesized by a controller.
pub const TAG_CONTROL_INDUCED: &str = "control_induced";
/// Outcome tag carried by partial (fallback) events.
pub const TAG_PARTIAL: &str = "partial_emergence";
/// Outcome tag carried by events produced because a deadline elapsed.
pub const TAG_TIMEOUT: &str = "timeout";
/// Precursor tag carried by detector-produced events.
pub const TAG_DETECTED: &str = "detected";

/// Kind of collective behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmergenceType {
    SpontaneousSynchronization,
    PhaseTransition,
    PatternFormation,
    CollectiveOscillation,
    InformationCascade,
    AdaptiveRestructuring,
    CoherentAmplification,
    DistributedComputation,
}

impl EmergenceType {
    pub const ALL: [EmergenceType; 8] = [
        EmergenceType::SpontaneousSynchronization,
        EmergenceType::PhaseTransition,
        EmergenceType::PatternFormation,
        EmergenceType::CollectiveOscillation,
        EmergenceType::InformationCascade,
        EmergenceType::AdaptiveRestructuring,
        EmergenceType::CoherentAmplification,
        EmergenceType::DistributedComputation,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::SpontaneousSynchronization => "spontaneous_synchronization",
            Self::PhaseTransition => "phase_transition",
            Self::PatternFormation => "pattern_formation",
            Self::CollectiveOscillation => "collective_oscillation",
            Self::InformationCascade => "information_cascade",
            Self::AdaptiveRestructuring => "adaptive_restructuring",
            Self::CoherentAmplification => "coherent_amplification",
            Self::DistributedComputation => "distributed_computation",
        }
    }
}

impl FromStr for EmergenceType {
    type Err = ResonanceError;

    /// Parse the snake_case name returned by [`EmergenceType::name`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name() == s)
            .ok_or_else(|| ResonanceError::invalid_parameter(format!("unknown emergence type '{}'", s)))
    }
}

/// Shape of the propagating wave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Pulse,
    Spiral,
    Linear,
}

/// Direction in which an event spreads through the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropagationDirection {
    Radial,
    Outward,
    Inward,
    Bidirectional,
    Global,
}

/// How an event propagates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Propagation {
    pub speed: f64,
    pub direction: PropagationDirection,
    pub decay: f64,
    pub amplification: f64,
    pub interference: f64,
    pub waveform: Waveform,
}

impl Propagation {
    /// Fixed defaults for events of the given type.
    pub fn for_type(emergence_type: EmergenceType) -> Self {
        use PropagationDirection as D;
        use Waveform as W;

        let (speed, direction, decay, amplification, interference, waveform) =
            match emergence_type {
                EmergenceType::SpontaneousSynchronization => (1.0, D::Radial, 0.1, 1.2, 0.1, W::Sine),
                EmergenceType::PhaseTransition => (2.0, D::Global, 0.05, 1.5, 0.2, W::Square),
                EmergenceType::PatternFormation => (0.5, D::Outward, 0.2, 1.1, 0.3, W::Spiral),
                EmergenceType::CollectiveOscillation => (1.5, D::Global, 0.05, 1.3, 0.1, W::Sine),
                EmergenceType::InformationCascade => (3.0, D::Outward, 0.3, 1.4, 0.2, W::Pulse),
                EmergenceType::AdaptiveRestructuring => {
                    (0.3, D::Bidirectional, 0.15, 1.0, 0.4, W::Sawtooth)
                }
                EmergenceType::CoherentAmplification => (1.2, D::Inward, 0.05, 1.8, 0.05, W::Sine),
                EmergenceType::DistributedComputation => {
                    (0.8, D::Bidirectional, 0.1, 1.0, 0.25, W::Pulse)
                }
            };

        Self {
            speed,
            direction,
            decay,
            amplification,
            interference,
            waveform,
        }
    }

    /// Neutral linear propagation used for controller fallbacks.
    pub fn linear() -> Self {
        Self {
            speed: 1.0,
            direction: PropagationDirection::Bidirectional,
            decay: 0.1,
            amplification: 1.0,
            interference: 0.0,
            waveform: Waveform::Linear,
        }
    }
}

/// Where an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum EventOrigin {
    /// Observed by the detector.
    Detected,
    /// Synthesized by a controller. `partial` marks reduced-strength fallbacks.
    ControlInduced { partial: bool },
}

/// Immutable record of a collective behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergenceEvent {
    event_type: EmergenceType,
    timestamp: DateTime<Utc>,
    duration: Duration,
    strength: f64,
    participants: Vec<FieldId>,
    stability: f64,
    propagation: Propagation,
    origin: EventOrigin,
    precursors: Vec<String>,
    outcomes: Vec<String>,
}

impl EmergenceEvent {
    /// Event observed by the detector, with the type's default propagation.
    pub fn detected(
        event_type: EmergenceType,
        strength: f64,
        participants: Vec<FieldId>,
        stability: f64,
    ) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            duration: Duration::ZERO,
            strength: clamp_unit(strength),
            participants,
            stability: clamp_unit(stability),
            propagation: Propagation::for_type(event_type),
            origin: EventOrigin::Detected,
            precursors: vec![TAG_DETECTED.to_string()],
            outcomes: Vec::new(),
        }
    }

    /// Reduced-strength event synthesized when a controller gives up.
    ///
    /// Carries only the `partial_emergence` outcome; the caller appends the
    /// reason (`timeout` or `cancelled`) with [`with_outcome`](Self::with_outcome).
    pub fn control_fallback(
        event_type: EmergenceType,
        strength: f64,
        participants: Vec<FieldId>,
        duration: Duration,
        stability: f64,
    ) -> Self {
        Self {
            event_type,
            timestamp: Utc::now(),
            duration,
            strength: clamp_unit(strength),
            participants,
            stability: clamp_unit(stability),
            propagation: Propagation::linear(),
            origin: EventOrigin::ControlInduced { partial: true },
            precursors: vec![TAG_CONTROL_INDUCED.to_string()],
            outcomes: vec![TAG_PARTIAL.to_string()],
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_outcome(mut self, tag: impl Into<String>) -> Self {
        self.outcomes.push(tag.into());
        self
    }

    #[inline]
    pub fn event_type(&self) -> EmergenceType {
        self.event_type
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    #[inline]
    pub fn strength(&self) -> f64 {
        self.strength
    }

    pub fn participants(&self) -> &[FieldId] {
        &self.participants
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }

    pub fn propagation(&self) -> &Propagation {
        &self.propagation
    }

    pub fn origin(&self) -> EventOrigin {
        self.origin
    }

    pub fn precursors(&self) -> &[String] {
        &self.precursors
    }

    pub fn outcomes(&self) -> &[String] {
        &self.outcomes
    }

    /// Whether a controller synthesized this event instead of detecting it.
    pub fn is_control_induced(&self) -> bool {
        matches!(self.origin, EventOrigin::ControlInduced { .. })
    }

    pub fn is_partial(&self) -> bool {
        matches!(self.origin, EventOrigin::ControlInduced { partial: true })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names_parse_back() {
        for t in EmergenceType::ALL {
            assert_eq!(t.name().parse::<EmergenceType>().expect("known name"), t);
        }
        assert!("resonance".parse::<EmergenceType>().is_err());
    }

    #[test]
    fn test_detected_event_uses_type_defaults() {
        let event = EmergenceEvent::detected(
            EmergenceType::InformationCascade,
            1.3,
            vec![FieldId::nil()],
            0.7,
        );
        assert_eq!(event.strength(), 1.0);
        assert_eq!(event.origin(), EventOrigin::Detected);
        assert_eq!(event.propagation().waveform, Waveform::Pulse);
        assert!(!event.is_control_induced());
        println!("[PASS] test_detected_event_uses_type_defaults");
    }

    #[test]
    fn test_fallback_event_is_tagged() {
        let event = EmergenceEvent::control_fallback(
            EmergenceType::CollectiveOscillation,
            0.45,
            Vec::new(),
            Duration::from_millis(200),
            0.5,
        );
        assert!(event.is_control_induced());
        assert!(event.is_partial());
        assert_eq!(event.propagation().waveform, Waveform::Linear);
        assert!(event.precursors().iter().any(|t| t == TAG_CONTROL_INDUCED));
        assert_eq!(event.outcomes(), [TAG_PARTIAL.to_string()]);
        assert_eq!(event.duration(), Duration::from_millis(200));

        let timed_out = event.with_outcome(TAG_TIMEOUT);
        assert_eq!(
            timed_out.outcomes(),
            [TAG_PARTIAL.to_string(), TAG_TIMEOUT.to_string()]
        );
        println!("[PASS] test_fallback_event_is_tagged");
    }

    #[test]
    fn test_every_type_has_propagation_defaults() {
        for t in EmergenceType::ALL {
            let p = Propagation::for_type(t);
            assert!(p.speed > 0.0 && p.decay >= 0.0, "{} has invalid defaults", t.name());
        }
    }

    #[test]
    fn test_serialization_roundtrip() {
        let event =
            EmergenceEvent::detected(EmergenceType::PhaseTransition, 0.9, Vec::new(), 0.4);
        let json = serde_json::to_string(&event).expect("serialize");
        let restored: EmergenceEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(restored.event_type(), EmergenceType::PhaseTransition);
        assert_eq!(restored.origin(), EventOrigin::Detected);
        assert!((restored.strength() - 0.9).abs() < f64::EPSILON);
    }
}
