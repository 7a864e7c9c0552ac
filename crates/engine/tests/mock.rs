use engine::mock::{MockEngine, MockScene, Scripted};
use engine::{EngineBackend, EngineError, EngineHandle, Frame};

/// Loading the one scene the mock serves succeeds and is counted;
/// anything else is a load failure and leaves no handle behind.
#[test]
fn load_accepts_only_the_served_scene() {
    let backend = MockEngine::new("mock://reacher");
    let log = backend.call_log();

    assert!(backend.load("mock://reacher", 0).is_ok());
    assert_eq!(log.loads(), 1);

    let err = backend.load("mock://walker", 0).unwrap_err();
    assert!(
        matches!(err, EngineError::Load { ref locator, .. } if locator == "mock://walker"),
        "expected a load failure, got {err:?}"
    );
    assert_eq!(log.loads(), 1, "failed loads must not be counted");
}

/// Two handles loaded with the same seed replay the same state vectors
/// and frames for the same call sequence.
#[test]
fn same_seed_same_trajectory() {
    let backend = MockEngine::new("mock://reacher");
    let mut a = backend.load("mock://reacher", 7).unwrap();
    let mut b = backend.load("mock://reacher", 7).unwrap();

    assert_eq!(a.reset().unwrap(), b.reset().unwrap());
    let action = [0.25, -0.5, 1.0];
    assert_eq!(a.step(&action).unwrap(), b.step(&action).unwrap());
    assert_eq!(a.render(0).unwrap(), b.render(0).unwrap());
}

/// Scripted replies come back in order, then the handle falls back to
/// its fixed-horizon behavior.
#[test]
fn script_is_consumed_in_order() {
    let backend = MockEngine::new("mock://reacher")
        .with_scene(MockScene {
            horizon: 2,
            ..MockScene::default()
        })
        .with_script(vec![Scripted::step(0.5), Scripted::last(2.0)]);
    let mut handle = backend.load("mock://reacher", 0).unwrap();

    let first = handle.step(&[0.0]).unwrap();
    assert!((first.reward - 0.5).abs() < 1e-6);
    assert!(!first.done);

    let second = handle.step(&[0.0]).unwrap();
    assert!((second.reward - 2.0).abs() < 1e-6);
    assert!(second.done);

    // Script exhausted: unscripted fallback, already past the horizon.
    let third = handle.step(&[0.0]).unwrap();
    assert!(third.done, "past the horizon the fallback keeps reporting done");
}

/// A scripted fault surfaces as `EngineError::Fault` from `step`.
#[test]
fn scripted_fault_is_returned() {
    let backend = MockEngine::new("mock://reacher")
        .with_script(vec![Scripted::Fault("link dropped".into())]);
    let mut handle = backend.load("mock://reacher", 0).unwrap();

    let err = handle.step(&[0.0]).unwrap_err();
    assert!(matches!(err, EngineError::Fault(ref reason) if reason == "link dropped"));
}

/// The call log sees every step, reset and render, and remembers the
/// camera of the most recent render.
#[test]
fn call_log_counts_engine_traffic() {
    let backend = MockEngine::new("mock://reacher");
    let log = backend.call_log();
    let mut handle = backend.load("mock://reacher", 0).unwrap();

    assert_eq!(log.last_camera(), None);
    handle.reset().unwrap();
    handle.step(&[0.1]).unwrap();
    handle.step(&[0.1]).unwrap();
    handle.render(3).unwrap();

    assert_eq!(log.resets(), 1);
    assert_eq!(log.steps(), 2);
    assert_eq!(log.renders(), 1);
    assert_eq!(log.last_camera(), Some(3));
}

/// Frames match the scene dimensions and the RGB byte layout.
#[test]
fn frames_have_scene_dimensions() {
    let backend = MockEngine::new("mock://reacher").with_scene(MockScene {
        width: 32,
        height: 16,
        ..MockScene::default()
    });
    let mut handle = backend.load("mock://reacher", 0).unwrap();

    let frame = handle.render(0).unwrap();
    assert_eq!(frame.width, 32);
    assert_eq!(frame.height, 16);
    assert_eq!(frame.len(), 32 * 16 * Frame::CHANNELS);
}

/// `describe` reports the configured scene dimensions, and state
/// vectors actually have that length.
#[test]
fn describe_matches_emitted_state() {
    let backend = MockEngine::new("mock://reacher").with_scene(MockScene {
        vector_dim: 7,
        action_dim: 4,
        ..MockScene::default()
    });
    let mut handle = backend.load("mock://reacher", 1).unwrap();

    let desc = handle.describe();
    assert_eq!(desc.vector_dim, 7);
    assert_eq!(desc.action_dim, 4);
    assert_eq!(handle.reset().unwrap().vector.len(), 7);
    assert_eq!(handle.step(&[0.0; 4]).unwrap().state.vector.len(), 7);
}

/// Unscripted episodes end exactly at the configured horizon.
#[test]
fn fallback_episode_ends_at_horizon() {
    let backend = MockEngine::new("mock://reacher").with_scene(MockScene {
        horizon: 5,
        ..MockScene::default()
    });
    let mut handle = backend.load("mock://reacher", 0).unwrap();
    handle.reset().unwrap();

    for expected_done in [false, false, false, false, true] {
        let outcome = handle.step(&[0.0]).unwrap();
        assert_eq!(outcome.done, expected_done);
        assert!(outcome.reward.is_finite());
    }
}
