use engine::mock::MockEngine;
use env::EnvConfig;

pub const SCENE: &str = "mock://cartpole";

/// A mock engine serving the shared test scene.
pub fn backend() -> MockEngine {
    MockEngine::new(SCENE)
}

/// Adapter settings for the shared test scene.
pub fn config(action_repeat: u32) -> EnvConfig {
    EnvConfig {
        locator: SCENE.into(),
        action_repeat,
        ..EnvConfig::default()
    }
}
