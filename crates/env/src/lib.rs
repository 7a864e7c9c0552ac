//! # Gym-Style Adapter Over an External Simulation Engine
//!
//! This crate is a translation shim: it wraps one running instance of
//! an external 3D simulation engine (anything implementing the traits
//! in the [`engine`] crate) and presents it through the standard
//! agent-environment interface of reset, step, render and space
//! introspection. It contains no simulation logic and no learning
//! algorithm of its own.
//!
//! ## Key pieces
//!
//! -   **[`Env`]:** the agent-facing trait. One episode at a time,
//!     observations in, actions out.
//! -   **[`SimEnv`]:** the adapter. Owns the engine handle exclusively,
//!     folds `action_repeat` consecutive engine sub-steps into one
//!     reported transition, and synthesizes an [`Observation`] (camera
//!     image plus engine state vector) after every reset and step.
//! -   **[`spaces`]:** structural descriptions of the observation and
//!     action shapes. Engine-dependent dimensions are queried from the
//!     live handle, never hard-coded.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use env::{Env, EnvConfig, SimEnv};
//!
//! let config = EnvConfig {
//!     locator: "scenes/reacher".into(),
//!     action_repeat: 2,
//!     ..EnvConfig::default()
//! };
//! let mut sim = SimEnv::launch(&backend, config)?;
//! let obs = sim.reset()?;
//! let transition = sim.step(&[0.1, -0.3, 0.0])?;
//! ```
//!
//! Everything is synchronous and blocking, mirroring the engine
//! contract: no timeouts, no retries, no concurrency. The handle is
//! exclusively owned and episode state lives entirely engine-side.

pub mod adapter;
pub mod spaces;

use engine::{EngineError, Frame};
use thiserror::Error;

pub use adapter::{EnvConfig, SimEnv};
pub use spaces::{BoxSpace, Dtype, ObsSpace};

/// Failures surfaced to the agent.
#[derive(Error, Debug)]
pub enum EnvError {
    /// The step precondition was violated: an action component is NaN
    /// or infinite. Rejected before any engine call; a caller bug, not
    /// something to repair.
    #[error("non-finite action component {value} at index {index}")]
    InvalidAction { index: usize, value: f32 },

    /// Anything the engine reported, load failures included. Propagated
    /// unmodified; there is no local state to roll back.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// What the agent sees after a reset or step.
///
/// Built fresh on every call from a new render and the latest raw
/// state; the caller owns it outright and nothing mutates it afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    /// Camera image, RGB bytes at the configured size.
    pub image: Frame,
    /// Engine-reported numeric state, dimension per
    /// [`engine::Descriptor::vector_dim`].
    pub vector: Vec<f32>,
}

/// Auxiliary string map attached to transitions.
///
/// The adapter always returns it empty; the type exists so the
/// transition shape matches the usual agent-environment contract.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Info {
    entries: Vec<(String, String)>,
}

impl Info {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some((_, existing)) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            *existing = value;
        } else {
            self.entries.push((key, value));
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// One reported environment transition.
///
/// `reward` is the exact sum of the per-sub-step rewards inside the
/// repeat loop; `done` is true iff some sub-step reported termination,
/// in which case the loop stopped early.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub obs: Observation,
    pub reward: f32,
    pub done: bool,
    /// Always empty in this design.
    pub info: Info,
}

/// The agent-environment interface.
///
/// Inspired by the classic gym contract. Implementations advance one
/// underlying episode at a time; every method blocks until the backing
/// simulation replies.
pub trait Env {
    /// Starts a fresh episode and returns its first observation.
    ///
    /// # Errors
    ///
    /// Any engine-side failure, unmodified.
    fn reset(&mut self) -> Result<Observation, EnvError>;

    /// Applies one action vector and returns the resulting transition.
    ///
    /// # Errors
    ///
    /// [`EnvError::InvalidAction`] when a component is non-finite
    /// (checked before any engine traffic), otherwise any engine-side
    /// failure, unmodified.
    fn step(&mut self, action: &[f32]) -> Result<Transition, EnvError>;

    /// Renders the current state through the environment's camera.
    ///
    /// # Errors
    ///
    /// Any engine-side failure, unmodified.
    fn render(&mut self) -> Result<Frame, EnvError>;

    /// Structural description of the observations this environment
    /// produces.
    fn observation_space(&self) -> ObsSpace;

    /// Structural description of the actions this environment accepts.
    fn action_space(&self) -> BoxSpace;

    /// Bounds on a single reported reward. Unbounded unless an
    /// implementation says otherwise.
    fn reward_range(&self) -> (f32, f32) {
        (f32::NEG_INFINITY, f32::INFINITY)
    }
}
