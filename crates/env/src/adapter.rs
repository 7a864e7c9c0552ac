//! The environment adapter: one engine handle behind the [`Env`] trait.

use engine::{EngineBackend, EngineHandle, Frame, RawState};

use crate::spaces::{BoxSpace, Dtype, ObsSpace};
use crate::{Env, EnvError, Info, Observation, Transition};

/// Construction-time settings, fixed for the adapter's lifetime.
///
/// Defaults mirror the conventional wrapper construction: a single
/// sub-step per action, 64x64 frames, the engine's default camera and
/// seed zero.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvConfig {
    /// Scene locator handed to the engine's load call.
    pub locator: String,
    /// Consecutive identical-action engine sub-steps folded into one
    /// reported transition. Must be at least 1.
    pub action_repeat: u32,
    /// Observation image width in pixels. Must be positive.
    pub width: u32,
    /// Observation image height in pixels. Must be positive.
    pub height: u32,
    /// Camera id used for every rendered observation.
    pub camera: u32,
    /// Seed handed to the engine's load call, once.
    pub seed: u64,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            locator: String::new(),
            action_repeat: 1,
            width: 64,
            height: 64,
            camera: 0,
            seed: 0,
        }
    }
}

/// Adapter presenting one engine scene as an [`Env`].
///
/// Owns its [`EngineHandle`] exclusively; no episode state lives here.
/// Dropping the adapter drops the handle, which releases the engine
/// instance.
pub struct SimEnv {
    config: EnvConfig,
    handle: Box<dyn EngineHandle>,
}

impl std::fmt::Debug for SimEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimEnv")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl SimEnv {
    /// Loads the configured scene and wraps the resulting handle.
    ///
    /// Blocks for as long as engine startup takes; there is no timeout
    /// and no retry. On failure the error propagates and no handle is
    /// retained.
    ///
    /// # Errors
    ///
    /// [`engine::EngineError::Load`] (as [`EnvError::Engine`]) when the
    /// locator is invalid or the engine is unavailable.
    ///
    /// # Panics
    ///
    /// Panics when `action_repeat` is zero or an image dimension is
    /// zero; both are caller bugs, not runtime conditions.
    pub fn launch(backend: &dyn EngineBackend, config: EnvConfig) -> Result<Self, EnvError> {
        assert!(config.action_repeat >= 1, "action_repeat must be at least 1");
        assert!(
            config.width > 0 && config.height > 0,
            "image dimensions must be positive"
        );
        tracing::info!(
            locator = %config.locator,
            seed = config.seed,
            action_repeat = config.action_repeat,
            "loading simulation environment"
        );
        let handle = backend.load(&config.locator, config.seed)?;
        Ok(Self { config, handle })
    }

    /// The immutable settings this adapter was built with.
    #[must_use]
    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    /// Builds the agent-facing observation for a raw engine state:
    /// a fresh render through the configured camera plus the state's
    /// reported vector.
    fn observe(&mut self, state: RawState) -> Result<Observation, EnvError> {
        let image = self.handle.render(self.config.camera)?;
        Ok(Observation {
            image,
            vector: state.vector,
        })
    }
}

impl Env for SimEnv {
    fn reset(&mut self) -> Result<Observation, EnvError> {
        let state = self.handle.reset()?;
        self.observe(state)
    }

    fn step(&mut self, action: &[f32]) -> Result<Transition, EnvError> {
        if let Some((index, value)) = action.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(EnvError::InvalidAction {
                index,
                value: *value,
            });
        }

        // The action goes through unchanged on every sub-step. A
        // sub-step reporting done ends the loop at once; the remaining
        // repeats are skipped and the partial sum stands.
        let mut outcome = self.handle.step(action)?;
        let mut reward = outcome.reward;
        for _ in 1..self.config.action_repeat {
            if outcome.done {
                break;
            }
            let sub = self.handle.step(action)?;
            reward += sub.reward;
            outcome = sub;
        }
        if outcome.done {
            tracing::debug!(reward, "episode terminated");
        }

        let obs = self.observe(outcome.state)?;
        Ok(Transition {
            obs,
            reward,
            done: outcome.done,
            info: Info::new(),
        })
    }

    fn render(&mut self) -> Result<Frame, EnvError> {
        Ok(self.handle.render(self.config.camera)?)
    }

    fn observation_space(&self) -> ObsSpace {
        // The vector dimension belongs to the engine and is read off
        // the live handle on every access.
        let desc = self.handle.describe();
        ObsSpace {
            image: BoxSpace::new(
                0.0,
                255.0,
                vec![
                    self.config.height as usize,
                    self.config.width as usize,
                    Frame::CHANNELS,
                ],
                Dtype::U8,
            ),
            vector: BoxSpace::new(
                f32::NEG_INFINITY,
                f32::INFINITY,
                vec![desc.vector_dim],
                Dtype::F32,
            ),
        }
    }

    fn action_space(&self) -> BoxSpace {
        BoxSpace::new(
            -1.0,
            1.0,
            vec![self.handle.describe().action_dim],
            Dtype::F32,
        )
    }
}
