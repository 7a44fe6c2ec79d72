//! Tests for the adaptive feedback learner.

use resonance_core::{
    build_network, seeded_rng, ControlFeedback, EngineConfig, FieldId, LearnerConfig, Network,
    ResonanceError,
};

use super::learner::AdaptiveFeedbackLearner;
use super::types::AdaptiveGains;

fn small_network() -> Network {
    let mut config = EngineConfig::default();
    config.network.size = 3;
    build_network(&config, &mut seeded_rng(8)).expect("build")
}

fn learner() -> AdaptiveFeedbackLearner {
    AdaptiveFeedbackLearner::new(LearnerConfig::default()).expect("learner")
}

#[test]
fn test_initial_gains_match_config() {
    let learner = learner();
    assert_eq!(learner.gains(), AdaptiveGains::uniform(0.1));
    assert_eq!(learner.total_processed(), 0);
}

#[test]
fn test_invalid_config_rejected() {
    let config = LearnerConfig {
        gain_min: 0.5,
        gain_max: 0.1,
        ..LearnerConfig::default()
    };
    assert!(matches!(
        AdaptiveFeedbackLearner::new(config),
        Err(ResonanceError::InvalidConfig { .. })
    ));
}

#[test]
fn test_unknown_field_rejects_whole_batch() {
    let mut network = small_network();
    let mut learner = learner();
    let known = network.fields()[0].id();
    let before = network.fields()[0].amplitude();

    let batch = vec![
        ControlFeedback::new(known, 0.0, 0.0, 0.0, 0.0),
        ControlFeedback::new(FieldId::nil(), 0.5, 0.5, 0.5, 0.5),
    ];
    let result = learner.apply_feedback(&mut network, &batch);

    assert!(matches!(result, Err(ResonanceError::UnknownField { .. })));
    assert_eq!(network.fields()[0].amplitude(), before);
    assert!(learner.history(known).is_none());
    assert_eq!(learner.total_processed(), 0);
    println!("[PASS] unknown id leaves network and learner untouched");
}

#[test]
fn test_low_scores_push_field_toward_targets() {
    let mut network = small_network();
    let id = network.fields()[1].id();
    {
        let field = network.field_mut(id).expect("field");
        field.set_entropy(0.5);
        field.set_stability(0.2);
    }
    let (amplitude, entropy, stability) = {
        let f = network.field(id).expect("field");
        (f.amplitude(), f.entropy(), f.stability())
    };

    let mut learner = learner();
    learner
        .apply_feedback(&mut network, &[ControlFeedback::new(id, 0.0, 0.0, 0.0, 0.0)])
        .expect("apply");

    let field = network.field(id).expect("field");
    assert!(field.amplitude() > amplitude);
    assert!((field.entropy() - (entropy - 0.1 * 0.8)).abs() < 1e-12);
    assert!((field.stability() - (stability + 0.1 * 0.8)).abs() < 1e-12);
    println!(
        "[VERIFIED] amplitude {:.3} -> {:.3}, entropy {:.3} -> {:.3}",
        amplitude,
        field.amplitude(),
        entropy,
        field.entropy()
    );
}

#[test]
fn test_gains_grow_and_cap_on_effective_feedback() {
    let mut network = small_network();
    let id = network.fields()[0].id();
    let mut learner = learner();
    let config = learner.config().clone();

    for _ in 0..100 {
        let gains = learner
            .apply_feedback(&mut network, &[ControlFeedback::new(id, 1.0, 1.0, 1.0, 1.0)])
            .expect("apply");
        assert!(gains.within(config.gain_min, config.gain_max));
    }
    assert_eq!(learner.gains(), AdaptiveGains::uniform(config.gain_max));
    println!("[PASS] gains capped at {}", config.gain_max);
}

#[test]
fn test_gains_decay_and_floor_on_ineffective_feedback() {
    let mut network = small_network();
    let id = network.fields()[0].id();
    let mut learner = learner();
    let config = learner.config().clone();

    for _ in 0..100 {
        let gains = learner
            .apply_feedback(&mut network, &[ControlFeedback::new(id, 0.0, 0.0, 0.0, 0.0)])
            .expect("apply");
        assert!(gains.within(config.gain_min, config.gain_max));
    }
    assert_eq!(learner.gains(), AdaptiveGains::uniform(config.gain_min));
    for field in network.fields() {
        assert!(field.amplitude() <= 2.0);
        assert!((0.0..=1.0).contains(&field.entropy()));
        assert!((0.0..=1.0).contains(&field.stability()));
    }
}

#[test]
fn test_middling_feedback_leaves_gains_unchanged() {
    let mut network = small_network();
    let id = network.fields()[0].id();
    let mut learner = learner();
    learner
        .apply_feedback(&mut network, &[ControlFeedback::new(id, 0.5, 0.5, 0.5, 0.5)])
        .expect("apply");
    assert_eq!(learner.gains(), AdaptiveGains::uniform(0.1));
    assert_eq!(learner.snapshot().last_effectiveness, Some(0.5));
}

#[test]
fn test_history_keeps_newest_entries() {
    let mut network = small_network();
    let id = network.fields()[2].id();
    let mut learner = learner();

    let batch: Vec<ControlFeedback> = (0..150)
        .map(|i| ControlFeedback::new(id, 0.5, 0.5, 0.5, 0.5).with_recommendation(i.to_string()))
        .collect();
    learner.apply_feedback(&mut network, &batch).expect("apply");

    let history = learner.history(id).expect("history");
    assert_eq!(history.len(), 100);
    assert_eq!(history.front().map(|f| f.recommendation.as_str()), Some("50"));
    assert_eq!(history.back().map(|f| f.recommendation.as_str()), Some("149"));
    assert_eq!(learner.total_processed(), 150);
    println!("[PASS] history capped at 100, oldest evicted first");
}

#[test]
fn test_empty_batch_is_noop() {
    let mut network = small_network();
    let mut learner = learner();
    let gains = learner.apply_feedback(&mut network, &[]).expect("apply");
    assert_eq!(gains, AdaptiveGains::uniform(0.1));
    assert_eq!(learner.snapshot().batches, 0);
}

#[test]
fn test_reset_restores_initial_state() {
    let mut network = small_network();
    let id = network.fields()[0].id();
    let mut learner = learner();
    for _ in 0..10 {
        learner
            .apply_feedback(&mut network, &[ControlFeedback::new(id, 1.0, 1.0, 1.0, 1.0)])
            .expect("apply");
    }
    learner.reset();
    assert_eq!(learner.gains(), AdaptiveGains::uniform(0.1));
    assert!(learner.history(id).is_none());
    let snapshot = learner.snapshot();
    let json = serde_json::to_string(&snapshot).expect("serialize");
    assert!(json.contains("total_processed"));
}

#[test]
fn test_unbounded_history_cap_allocates_on_demand() {
    let config = LearnerConfig {
        history_cap: usize::MAX,
        ..LearnerConfig::default()
    };
    let mut learner = AdaptiveFeedbackLearner::new(config).expect("learner");
    let mut network = small_network();
    let id = network.fields()[0].id();

    for _ in 0..3 {
        learner
            .apply_feedback(&mut network, &[ControlFeedback::new(id, 0.5, 0.5, 0.5, 0.5)])
            .expect("apply");
    }

    let history = learner.history(id).expect("history");
    assert_eq!(history.len(), 3);
    assert!(history.capacity() < 1024, "capacity {}", history.capacity());
    println!("[PASS] usize::MAX history cap keeps 3 items without preallocating");
}
