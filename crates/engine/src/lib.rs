#![deny(clippy::all, clippy::pedantic)]
//! # Simulation Engine Contract
//!
//! The capability set this workspace requires from an external 3D
//! simulation engine, expressed as injected traits instead of a global
//! engine binding. An engine is anything that can load a scene and hand
//! back an [`EngineHandle`]: one running simulation instance that can be
//! stepped, reset and rendered.
//!
//! Everything here is synchronous and blocking. A handle is exclusively
//! owned by whoever loaded it and is not thread-safe by contract; the
//! traits deliberately carry no `Send`/`Sync` bounds so that sharing one
//! across threads requires explicit synchronization by the caller. The
//! underlying engine instance is released when the handle is dropped.
//!
//! The `mock` cargo feature adds [`mock::MockEngine`], a deterministic
//! in-process stand-in used by tests and the demo binary.

use thiserror::Error;

#[cfg(feature = "mock")]
pub mod mock;

/// Failures surfaced by an engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine could not load the requested scene. Fatal to
    /// construction of anything that wanted the handle; never retried.
    #[error("failed to load environment `{locator}`: {reason}")]
    Load { locator: String, reason: String },

    /// Unclassified engine-side failure during step, reset or render.
    /// Surfaces to the caller unmodified; there is no local recovery.
    #[error("engine fault: {0}")]
    Fault(String),
}

/// Engine-native per-step data, before translation into an observation.
///
/// `vector` is the engine-reported numeric state (joint angles, sensor
/// readouts and the like). Its dimension is scene-dependent and is
/// reported by [`EngineHandle::describe`], never assumed.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawState {
    pub vector: Vec<f32>,
}

/// The engine's reply to one sub-step: new state, scalar reward and
/// whether the episode ended on this sub-step.
#[derive(Clone, Debug, PartialEq)]
pub struct StepOutcome {
    pub state: RawState,
    pub reward: f32,
    pub done: bool,
}

/// Scene dimensionality report, queried from a live handle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// Length of [`RawState::vector`] for this scene.
    pub vector_dim: usize,
    /// Length of the action vectors the scene expects.
    pub action_dim: usize,
}

/// One rendered camera image: row-major RGB, one byte per channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// RGB channel count; every frame is exactly three bytes per pixel.
    pub const CHANNELS: usize = 3;

    /// Wraps raw pixel bytes.
    ///
    /// # Panics
    ///
    /// Panics when `data.len()` is not `width * height * 3`.
    #[must_use]
    pub fn rgb(width: u32, height: u32, data: Vec<u8>) -> Self {
        assert_eq!(
            data.len(),
            width as usize * height as usize * Self::CHANNELS,
            "frame byte length must be width * height * 3"
        );
        Self { width, height, data }
    }

    /// Number of bytes in the pixel buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// A simulation engine: the loader side of the contract.
pub trait EngineBackend {
    /// Loads the scene named by `locator` and seeds the engine's own
    /// randomness with `seed`. Blocks for as long as engine startup
    /// takes; there is no timeout and no retry.
    ///
    /// # Errors
    ///
    /// [`EngineError::Load`] when the locator names nothing the engine
    /// can load or the engine is unavailable.
    fn load(&self, locator: &str, seed: u64) -> Result<Box<dyn EngineHandle>, EngineError>;
}

/// One running simulation instance.
///
/// All methods block until the engine replies. Errors from the engine
/// propagate unmodified; callers are expected to treat them as fatal for
/// the current episode at least.
pub trait EngineHandle {
    /// Submits one action vector and advances the simulation one step.
    ///
    /// # Errors
    ///
    /// [`EngineError::Fault`] on any engine-side failure.
    fn step(&mut self, action: &[f32]) -> Result<StepOutcome, EngineError>;

    /// Starts a fresh episode and returns its initial state.
    ///
    /// # Errors
    ///
    /// [`EngineError::Fault`] on any engine-side failure.
    fn reset(&mut self) -> Result<RawState, EngineError>;

    /// Renders the current state through the given camera.
    ///
    /// # Errors
    ///
    /// [`EngineError::Fault`] on any engine-side failure.
    fn render(&mut self, camera: u32) -> Result<Frame, EngineError>;

    /// Reports the scene's observation and action dimensionality.
    #[must_use]
    fn describe(&self) -> Descriptor;
}

impl std::fmt::Debug for dyn EngineHandle + '_ {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("descriptor", &self.describe())
            .finish_non_exhaustive()
    }
}
