//! Deterministic in-process engine for tests and demos.
//!
//! [`MockEngine`] serves exactly one scene locator. Handles it loads
//! synthesize observations and frames from the load seed, follow an
//! optional step script, and report every call into a shared
//! [`CallLog`] so tests can assert exact engine-call counts from the
//! outside.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::Arc;

use crate::{Descriptor, EngineBackend, EngineError, EngineHandle, Frame, RawState, StepOutcome};

/// Shape of the scene a [`MockEngine`] pretends to run.
#[derive(Clone, Debug)]
pub struct MockScene {
    /// Rendered frame width in pixels.
    pub width: u32,
    /// Rendered frame height in pixels.
    pub height: u32,
    /// Length of the reported state vector.
    pub vector_dim: usize,
    /// Length of the expected action vector.
    pub action_dim: usize,
    /// Unscripted episodes terminate after this many sub-steps.
    pub horizon: u32,
}

impl Default for MockScene {
    fn default() -> Self {
        Self {
            width: 64,
            height: 64,
            vector_dim: 11,
            action_dim: 3,
            horizon: 250,
        }
    }
}

/// One pre-arranged engine reply, consumed per sub-step in order.
#[derive(Clone, Debug)]
pub enum Scripted {
    /// Reply with this reward and termination flag.
    Step { reward: f32, done: bool },
    /// Fail the sub-step with [`EngineError::Fault`].
    Fault(String),
}

impl Scripted {
    /// A non-terminal sub-step worth `reward`.
    #[must_use]
    pub fn step(reward: f32) -> Self {
        Self::Step { reward, done: false }
    }

    /// A terminal sub-step worth `reward`.
    #[must_use]
    pub fn last(reward: f32) -> Self {
        Self::Step { reward, done: true }
    }
}

/// Call counters shared between a test and every handle the engine
/// loads. Clones observe the same counters.
#[derive(Clone, Debug, Default)]
pub struct CallLog(Arc<Counters>);

#[derive(Debug)]
struct Counters {
    loads: AtomicU32,
    steps: AtomicU32,
    resets: AtomicU32,
    renders: AtomicU32,
    // Camera id of the most recent render, -1 before the first one.
    last_camera: AtomicI64,
}

impl Default for Counters {
    fn default() -> Self {
        Self {
            loads: AtomicU32::new(0),
            steps: AtomicU32::new(0),
            resets: AtomicU32::new(0),
            renders: AtomicU32::new(0),
            last_camera: AtomicI64::new(-1),
        }
    }
}

impl CallLog {
    /// Successful scene loads.
    #[must_use]
    pub fn loads(&self) -> u32 {
        self.0.loads.load(Ordering::Relaxed)
    }

    /// Engine sub-steps issued across all handles.
    #[must_use]
    pub fn steps(&self) -> u32 {
        self.0.steps.load(Ordering::Relaxed)
    }

    /// Episode resets issued across all handles.
    #[must_use]
    pub fn resets(&self) -> u32 {
        self.0.resets.load(Ordering::Relaxed)
    }

    /// Render calls issued across all handles.
    #[must_use]
    pub fn renders(&self) -> u32 {
        self.0.renders.load(Ordering::Relaxed)
    }

    /// Camera id of the most recent render call, if any happened.
    #[must_use]
    pub fn last_camera(&self) -> Option<u32> {
        let raw = self.0.last_camera.load(Ordering::Relaxed);
        u32::try_from(raw).ok()
    }
}

/// An [`EngineBackend`] that runs entirely in-process.
pub struct MockEngine {
    scene: MockScene,
    accept: String,
    script: Vec<Scripted>,
    log: CallLog,
}

impl MockEngine {
    /// An engine that can load exactly the scene named `accept`.
    #[must_use]
    pub fn new(accept: impl Into<String>) -> Self {
        Self {
            scene: MockScene::default(),
            accept: accept.into(),
            script: Vec::new(),
            log: CallLog::default(),
        }
    }

    /// Replaces the served scene shape.
    #[must_use]
    pub fn with_scene(mut self, scene: MockScene) -> Self {
        self.scene = scene;
        self
    }

    /// Pre-arranges step replies. Each loaded handle gets its own copy
    /// of the script; once a handle exhausts it, the handle falls back
    /// to fixed-horizon episodes with deterministic rewards.
    #[must_use]
    pub fn with_script(mut self, script: Vec<Scripted>) -> Self {
        self.script = script;
        self
    }

    /// The shared call counters, for asserting engine traffic.
    #[must_use]
    pub fn call_log(&self) -> CallLog {
        self.log.clone()
    }
}

impl EngineBackend for MockEngine {
    fn load(&self, locator: &str, seed: u64) -> Result<Box<dyn EngineHandle>, EngineError> {
        if locator != self.accept {
            return Err(EngineError::Load {
                locator: locator.to_string(),
                reason: format!("mock engine only serves `{}`", self.accept),
            });
        }
        self.log.0.loads.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(locator, seed, "mock engine loaded scene");
        Ok(Box::new(MockHandle {
            scene: self.scene.clone(),
            rng: fastrand::Rng::with_seed(seed),
            t: 0,
            script: self.script.clone().into(),
            log: self.log.clone(),
        }))
    }
}

struct MockHandle {
    scene: MockScene,
    rng: fastrand::Rng,
    t: u32,
    script: VecDeque<Scripted>,
    log: CallLog,
}

impl MockHandle {
    fn sample_state(&mut self) -> RawState {
        let vector = (0..self.scene.vector_dim)
            .map(|_| self.rng.f32() * 2.0 - 1.0)
            .collect();
        RawState { vector }
    }
}

impl EngineHandle for MockHandle {
    fn step(&mut self, action: &[f32]) -> Result<StepOutcome, EngineError> {
        self.log.0.steps.fetch_add(1, Ordering::Relaxed);
        self.t += 1;
        let (reward, done) = match self.script.pop_front() {
            Some(Scripted::Step { reward, done }) => (reward, done),
            Some(Scripted::Fault(reason)) => return Err(EngineError::Fault(reason)),
            None => {
                // Unscripted fallback: reward leans on the action so
                // random policies produce varied returns.
                let drive = action.iter().sum::<f32>().tanh();
                (1.0 + 0.1 * drive, self.t >= self.scene.horizon)
            }
        };
        Ok(StepOutcome {
            state: self.sample_state(),
            reward,
            done,
        })
    }

    fn reset(&mut self) -> Result<RawState, EngineError> {
        self.log.0.resets.fetch_add(1, Ordering::Relaxed);
        self.t = 0;
        Ok(self.sample_state())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, camera: u32) -> Result<Frame, EngineError> {
        self.log.0.renders.fetch_add(1, Ordering::Relaxed);
        self.log
            .0
            .last_camera
            .store(i64::from(camera), Ordering::Relaxed);
        let (w, h) = (self.scene.width, self.scene.height);
        // Gradient pattern tinted by camera and step count, so frames
        // from different cameras or different steps never collide.
        let tint = camera.wrapping_mul(97).wrapping_add(self.t.wrapping_mul(29));
        let mut data = Vec::with_capacity(w as usize * h as usize * Frame::CHANNELS);
        for y in 0..h {
            for x in 0..w {
                data.push((x * 255 / w.max(1)) as u8);
                data.push((y * 255 / h.max(1)) as u8);
                data.push((tint & 0xFF) as u8);
            }
        }
        Ok(Frame::rgb(w, h, data))
    }

    fn describe(&self) -> Descriptor {
        Descriptor {
            vector_dim: self.scene.vector_dim,
            action_dim: self.scene.action_dim,
        }
    }
}
